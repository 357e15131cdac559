// src/application/state.rs

use std::path::PathBuf;
use std::sync::Arc;

use crate::db::{create_connection_pool, create_connection_pool_at, initialize_database};
use crate::error::AppResult;
use crate::events::{create_event_bus, EventBus};
use crate::integrations::{HttpImageFetcher, OmdbClient, TmdbClient};
use crate::repositories::*;
use crate::services::{
    CategoryService, LibraryService, PosterService, ResolutionService, SearchService,
};

/// Everything the embedding shell must supply.
///
/// No ambient configuration: API keys and the optional database
/// location are injected here and nowhere else.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub omdb_api_key: String,
    pub tmdb_api_key: String,

    /// Defaults to the platform data directory when unset
    pub database_path: Option<PathBuf>,
}

/// Application state handed to the UI shell.
/// All fields are Arc-wrapped for thread-safe sharing across commands.
pub struct AppState {
    pub event_bus: Arc<EventBus>,
    pub resolution_service: Arc<ResolutionService>,
    pub library_service: Arc<LibraryService>,
    pub category_service: Arc<CategoryService>,
    pub search_service: Arc<SearchService>,
}

impl AppState {
    /// Wire the full service graph over a freshly opened database.
    ///
    /// Initialization order: infrastructure, repositories, services,
    /// event handler registration, system-category bootstrap, initial
    /// library load.
    pub fn initialize(config: AppConfig) -> AppResult<Self> {
        // 1. INFRASTRUCTURE
        let event_bus = create_event_bus();
        let pool = Arc::new(match &config.database_path {
            Some(path) => create_connection_pool_at(path)?,
            None => create_connection_pool()?,
        });

        // Initialize schema (idempotent)
        {
            let conn = pool.get()?;
            initialize_database(&conn)?;
        }

        let omdb_client = Arc::new(OmdbClient::new(config.omdb_api_key)?);
        let tmdb_client = Arc::new(TmdbClient::new(config.tmdb_api_key)?);
        let image_fetcher = Arc::new(HttpImageFetcher::new()?);

        // 2. REPOSITORIES
        let file_repo: Arc<dyn FileRecordRepository> =
            Arc::new(SqliteFileRecordRepository::new(pool.clone()));
        let movie_repo: Arc<dyn MovieRepository> = Arc::new(SqliteMovieRepository::new(pool.clone()));
        let poster_repo: Arc<dyn PosterRepository> =
            Arc::new(SqlitePosterRepository::new(pool.clone()));
        let status_repo: Arc<dyn UserStatusRepository> =
            Arc::new(SqliteUserStatusRepository::new(pool.clone()));
        let category_repo: Arc<dyn CategoryRepository> =
            Arc::new(SqliteCategoryRepository::new(pool.clone()));

        // 3. SERVICES
        let poster_service = Arc::new(PosterService::new(poster_repo.clone(), image_fetcher));
        let resolution_service = Arc::new(ResolutionService::new(
            file_repo.clone(),
            movie_repo.clone(),
            category_repo.clone(),
            omdb_client.clone(),
            poster_service.clone(),
            event_bus.clone(),
        ));
        let library_service = Arc::new(LibraryService::new(
            movie_repo.clone(),
            poster_repo,
            status_repo,
            category_repo.clone(),
            file_repo,
            event_bus.clone(),
        ));
        let category_service = Arc::new(CategoryService::new(
            category_repo.clone(),
            event_bus.clone(),
        ));
        let search_service = Arc::new(SearchService::new(
            tmdb_client,
            omdb_client,
            movie_repo,
            category_repo,
            poster_service,
            event_bus.clone(),
        ));

        // 4. EVENT HANDLER REGISTRATION (WIRING)
        library_service.register_event_handlers();

        // 5. STARTUP STATE
        category_service.ensure_system_categories()?;
        library_service.reload()?;

        Ok(Self {
            event_bus,
            resolution_service,
            library_service,
            category_service,
            search_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_bootstraps_system_categories() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            omdb_api_key: "test_key".to_string(),
            tmdb_api_key: "test_key".to_string(),
            database_path: Some(dir.path().join("app.db")),
        };

        let state = AppState::initialize(config).unwrap();

        let categories = state.category_service.list_categories().unwrap();
        assert_eq!(categories.len(), 2);
        assert!(categories.iter().all(|c| c.is_system));
        assert!(state.library_service.all_movies().is_empty());
    }

    #[test]
    fn test_initialize_twice_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.db");

        for _ in 0..2 {
            let state = AppState::initialize(AppConfig {
                omdb_api_key: "test_key".to_string(),
                tmdb_api_key: "test_key".to_string(),
                database_path: Some(path.clone()),
            })
            .unwrap();

            // System categories are created exactly once
            assert_eq!(state.category_service.list_categories().unwrap().len(), 2);
        }
    }
}
