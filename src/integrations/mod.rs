// src/integrations/mod.rs
//
// External provider integrations
//
// ARCHITECTURE:
// - Clients map external wire data → internal DTOs (NO domain mutation)
// - Services depend on the provider traits, never on concrete clients
// - All external API concerns (auth, rate limiting, response shape)
//   stay behind this boundary

pub mod image_fetcher;
pub mod omdb;
pub mod tmdb;

pub use image_fetcher::HttpImageFetcher;
pub use omdb::OmdbClient;
pub use tmdb::TmdbClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::domain::movie::Movie;
use crate::error::AppResult;

// ============================================================================
// INTERNAL DTOs
// ============================================================================

/// Canonical detail record as returned by the metadata provider,
/// before it becomes a domain `Movie`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderMovie {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub rated: String,
    pub runtime: String,
    pub genre: String,
    pub plot: String,
    pub language: String,
    pub country: String,
    pub awards: String,
    pub poster_url: String,
    pub metascore: String,
    pub imdb_rating: String,
    pub imdb_votes: String,
    pub kind: String,
}

impl From<ProviderMovie> for Movie {
    fn from(detail: ProviderMovie) -> Self {
        Movie {
            imdb_id: detail.imdb_id,
            title: detail.title,
            year: detail.year,
            rated: detail.rated,
            runtime: detail.runtime,
            genre: detail.genre,
            plot: detail.plot,
            language: detail.language,
            country: detail.country,
            awards: detail.awards,
            poster_url: detail.poster_url,
            metascore: detail.metascore,
            imdb_rating: detail.imdb_rating,
            imdb_votes: detail.imdb_votes,
            kind: detail.kind,
            created_at: chrono::Utc::now(),
        }
    }
}

/// One ranked result from the discovery provider's free-text search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCandidate {
    /// Discovery-provider id; resolve to an imdb id before detail lookup
    pub id: i64,
    pub title: String,
    pub poster_thumb_url: Option<String>,
    pub release_date: Option<String>,
}

/// Reference to a trailer video on an external video site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrailerRef {
    pub site: String,
    pub key: String,
    pub official: bool,
}

/// Raw image bytes with the declared content type.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub mime: String,
}

// ============================================================================
// PROVIDER TRAITS
// ============================================================================

/// Detail lookup (Provider A).
///
/// `Ok(None)` is the provider's explicit "no match", distinct from a
/// transport or provider error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn find_by_title<'a>(
        &self,
        title: &str,
        year: Option<&'a str>,
    ) -> AppResult<Option<ProviderMovie>>;

    async fn find_by_imdb_id(&self, imdb_id: &str) -> AppResult<Option<ProviderMovie>>;
}

/// Search and enrichment (Provider B).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiscoveryProvider: Send + Sync {
    async fn search(&self, query: &str) -> AppResult<Vec<SearchCandidate>>;

    async fn resolve_imdb_id(&self, candidate_id: i64) -> AppResult<Option<String>>;

    async fn find_trailer(&self, candidate_id: i64) -> AppResult<Option<TrailerRef>>;
}

/// Poster image download.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> AppResult<FetchedImage>;
}

// ============================================================================
// RATE LIMITING
// ============================================================================

/// Minimum-interval rate limiter shared by the provider clients.
///
/// `next_delay` is computed under the lock; the caller awaits outside it
/// so a slow provider never blocks the runtime thread.
pub(crate) struct RateLimiter {
    state: Mutex<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    pub(crate) fn new(min_interval: Duration) -> Self {
        Self {
            state: Mutex::new(Instant::now() - min_interval),
            min_interval,
        }
    }

    /// How long the caller must wait before issuing its request.
    /// Claims the slot immediately so concurrent callers space out.
    pub(crate) fn next_delay(&self) -> Duration {
        let mut last = self.state.lock().unwrap();
        let now = Instant::now();
        let earliest = *last + self.min_interval;
        if earliest <= now {
            *last = now;
            Duration::ZERO
        } else {
            *last = earliest;
            earliest - now
        }
    }
}
