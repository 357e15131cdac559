// src/services/search_service.rs
//
// Search & enrichment flow
//
// The discovery provider supplies ranked candidates for a free-text
// query; adding a candidate resolves its canonical imdb id, fetches the
// detail record from the metadata provider, persists detail + poster,
// and tags the movie into the Searched system category.

use std::sync::Arc;

use crate::domain::category::SYSTEM_CATEGORY_SEARCHED;
use crate::domain::movie::{validate_movie, Movie};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, MovieTagged};
use crate::integrations::{DiscoveryProvider, MetadataProvider, SearchCandidate, TrailerRef};
use crate::repositories::{CategoryRepository, MovieRepository};
use crate::services::poster_service::PosterService;

pub struct SearchService {
    discovery_provider: Arc<dyn DiscoveryProvider>,
    metadata_provider: Arc<dyn MetadataProvider>,
    movie_repo: Arc<dyn MovieRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    poster_service: Arc<PosterService>,
    event_bus: Arc<EventBus>,
}

impl SearchService {
    pub fn new(
        discovery_provider: Arc<dyn DiscoveryProvider>,
        metadata_provider: Arc<dyn MetadataProvider>,
        movie_repo: Arc<dyn MovieRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        poster_service: Arc<PosterService>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            discovery_provider,
            metadata_provider,
            movie_repo,
            category_repo,
            poster_service,
            event_bus,
        }
    }

    /// Ranked candidates for a free-text query.
    pub async fn search(&self, query: &str) -> AppResult<Vec<SearchCandidate>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.discovery_provider.search(query).await
    }

    /// Add a search candidate to the library.
    ///
    /// Resolves the candidate to its imdb id, fetches and persists the
    /// detail record and poster, and tags the movie as Searched. Adding
    /// a movie that is already in the library only (re-)applies the tag.
    pub async fn add_from_search(&self, candidate_id: i64) -> AppResult<Movie> {
        let imdb_id = self
            .discovery_provider
            .resolve_imdb_id(candidate_id)
            .await?
            .ok_or_else(|| {
                AppError::Provider(format!(
                    "no imdb id known for search candidate {}",
                    candidate_id
                ))
            })?;

        let movie = match self.movie_repo.get(&imdb_id)? {
            Some(existing) => existing,
            None => {
                let detail = self
                    .metadata_provider
                    .find_by_imdb_id(&imdb_id)
                    .await?
                    .ok_or(AppError::NotFound)?;

                let movie: Movie = detail.into();
                validate_movie(&movie).map_err(AppError::Domain)?;
                self.movie_repo.save(&movie)?;

                // Best effort: a poster failure never loses the movie
                if let Err(e) = self.poster_service.ensure_poster(&movie).await {
                    log::warn!("poster pipeline failed for {}: {}", movie.imdb_id, e);
                }

                movie
            }
        };

        match self.category_repo.get_by_name(SYSTEM_CATEGORY_SEARCHED)? {
            Some(searched) => {
                self.category_repo.link_movie(&movie.imdb_id, searched.id)?;
                self.event_bus
                    .emit(MovieTagged::new(movie.imdb_id.clone(), searched.id));
            }
            None => log::warn!("system category '{}' missing", SYSTEM_CATEGORY_SEARCHED),
        }

        Ok(movie)
    }

    /// Trailer reference for a search candidate, when one exists.
    pub async fn find_trailer(&self, candidate_id: i64) -> AppResult<Option<TrailerRef>> {
        self.discovery_provider.find_trailer(candidate_id).await
    }
}
