// src/integrations/omdb/client.rs
//
// OMDb API integration (detail lookup provider)
//
// ARCHITECTURE:
// - REST client for the OMDb JSON API
// - Maps wire data → ProviderMovie (NO domain mutation)
// - "Movie not found" is a value (Ok(None)), never an error
//
// The API reports failures in-band: every response carries
// `Response: "True" | "False"`, and failed responses add an `Error`
// message. Only "not found" messages map to Ok(None); anything else
// (bad key, quota) is a provider error.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::integrations::{MetadataProvider, ProviderMovie, RateLimiter};

const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Wire shape of an OMDb detail response.
///
/// Absent fields default to "N/A", matching what the API itself returns
/// for unknown values.
#[derive(Debug, Deserialize)]
struct OmdbDetailResponse {
    #[serde(rename = "Response")]
    response: String,

    #[serde(rename = "Error")]
    error: Option<String>,

    #[serde(rename = "imdbID")]
    imdb_id: Option<String>,

    #[serde(rename = "Title", default = "na")]
    title: String,

    #[serde(rename = "Year", default = "na")]
    year: String,

    #[serde(rename = "Rated", default = "na")]
    rated: String,

    #[serde(rename = "Runtime", default = "na")]
    runtime: String,

    #[serde(rename = "Genre", default = "na")]
    genre: String,

    #[serde(rename = "Plot", default = "na")]
    plot: String,

    #[serde(rename = "Language", default = "na")]
    language: String,

    #[serde(rename = "Country", default = "na")]
    country: String,

    #[serde(rename = "Awards", default = "na")]
    awards: String,

    #[serde(rename = "Poster", default = "na")]
    poster: String,

    #[serde(rename = "Metascore", default = "na")]
    metascore: String,

    #[serde(rename = "imdbRating", default = "na")]
    imdb_rating: String,

    #[serde(rename = "imdbVotes", default = "na")]
    imdb_votes: String,

    #[serde(rename = "Type", default = "na")]
    kind: String,
}

fn na() -> String {
    "N/A".to_string()
}

/// OMDb API client
pub struct OmdbClient {
    base_url: String,
    api_key: String,
    http_client: Client,
    rate_limiter: Arc<RateLimiter>,
}

impl OmdbClient {
    /// Create a new OMDb client
    pub fn new(api_key: String) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(AppError::Http)?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(Duration::from_millis(250))),
        })
    }

    /// Point the client at a different endpoint (tests, proxies)
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    // ========================================================================
    // INTERNAL: REQUEST EXECUTION
    // ========================================================================

    async fn execute_lookup(&self, query: &[(&str, &str)]) -> AppResult<Option<ProviderMovie>> {
        let delay = self.rate_limiter.next_delay();
        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }

        let mut params: Vec<(&str, &str)> = vec![("apikey", self.api_key.as_str())];
        params.extend_from_slice(query);

        let response = self
            .http_client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Provider(format!(
                "OMDb returned status: {}",
                response.status()
            )));
        }

        let detail: OmdbDetailResponse = response.json().await?;

        if detail.response != "True" {
            let message = detail.error.unwrap_or_else(|| "unknown error".to_string());
            // "Movie not found!" (and variants) are a value, not a failure
            if message.to_lowercase().contains("not found") {
                return Ok(None);
            }
            return Err(AppError::Provider(format!("OMDb error: {}", message)));
        }

        let imdb_id = detail
            .imdb_id
            .ok_or_else(|| AppError::Provider("OMDb response missing imdbID".to_string()))?;

        Ok(Some(ProviderMovie {
            imdb_id,
            title: detail.title,
            year: detail.year,
            rated: detail.rated,
            runtime: detail.runtime,
            genre: detail.genre,
            plot: detail.plot,
            language: detail.language,
            country: detail.country,
            awards: detail.awards,
            poster_url: detail.poster,
            metascore: detail.metascore,
            imdb_rating: detail.imdb_rating,
            imdb_votes: detail.imdb_votes,
            kind: detail.kind,
        }))
    }
}

#[async_trait]
impl MetadataProvider for OmdbClient {
    async fn find_by_title<'a>(
        &self,
        title: &str,
        year: Option<&'a str>,
    ) -> AppResult<Option<ProviderMovie>> {
        let mut query = vec![("t", title)];
        if let Some(year) = year {
            query.push(("y", year));
        }
        self.execute_lookup(&query).await
    }

    async fn find_by_imdb_id(&self, imdb_id: &str) -> AppResult<Option<ProviderMovie>> {
        self.execute_lookup(&[("i", imdb_id)]).await
    }
}
