// src/services/library_service.rs
//
// Library State
//
// In-memory aggregate of all persisted records, rebuilt by reloading
// from the store and joining movies, posters, statuses and category
// links into one denormalized view keyed by imdb id.
//
// RULES:
// - The index has a single writer: reload and the mutation methods here
// - Filtering is pure and lives in library_filter
// - Toggles update the view optimistically, then persist; a failed
//   persist rolls the in-memory flag back and surfaces the error
// - Deletes and clears are eager store operations followed by an
//   in-memory update; a failed delete leaves prior state intact

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::domain::movie::Movie;
use crate::domain::poster::Poster;
use crate::domain::user_status::UserStatus;
use crate::error::AppResult;
use crate::events::{EventBus, LibraryCleared, MovieDeleted, ResolutionBatchCompleted, StatusToggled};
use crate::repositories::{
    CategoryRepository, FileRecordRepository, MovieRepository, PosterRepository,
    UserStatusRepository,
};
use crate::services::library_filter::{self, FilterCriteria};

/// Denormalized per-movie view: detail record joined with its poster,
/// user flags and category memberships.
#[derive(Debug, Clone, Serialize)]
pub struct MovieInfo {
    pub movie: Movie,
    pub poster: Option<Poster>,
    pub is_favorite: bool,
    pub is_watched: bool,
    pub category_ids: Vec<Uuid>,
}

/// Distinct values per facet, for the UI's filter controls.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FacetOptions {
    pub genres: Vec<String>,
    pub years: Vec<String>,
    pub languages: Vec<String>,
    pub countries: Vec<String>,
    pub rating_bands: Vec<u8>,
}

pub struct LibraryService {
    movie_repo: Arc<dyn MovieRepository>,
    poster_repo: Arc<dyn PosterRepository>,
    status_repo: Arc<dyn UserStatusRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    file_repo: Arc<dyn FileRecordRepository>,
    event_bus: Arc<EventBus>,

    /// The denormalized view; rebuilt by reload, adjusted in place by
    /// the mutation methods
    index: RwLock<Vec<MovieInfo>>,

    /// Set when a completed batch invalidated the view
    stale: Arc<AtomicBool>,
}

impl LibraryService {
    pub fn new(
        movie_repo: Arc<dyn MovieRepository>,
        poster_repo: Arc<dyn PosterRepository>,
        status_repo: Arc<dyn UserStatusRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        file_repo: Arc<dyn FileRecordRepository>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            movie_repo,
            poster_repo,
            status_repo,
            category_repo,
            file_repo,
            event_bus,
            index: RwLock::new(Vec::new()),
            stale: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Mark the view stale whenever a batch completes.
    pub fn register_event_handlers(&self) {
        let stale = Arc::clone(&self.stale);
        self.event_bus
            .subscribe::<ResolutionBatchCompleted, _>(move |event| {
                log::debug!(
                    "batch completed ({} succeeded), marking library view stale",
                    event.succeeded
                );
                stale.store(true, Ordering::SeqCst);
            });
    }

    /// True when the view no longer reflects the store.
    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::SeqCst)
    }

    // ========================================================================
    // RELOAD (THE JOIN)
    // ========================================================================

    /// Rebuild the view from the store. Returns the number of movies.
    pub fn reload(&self) -> AppResult<usize> {
        let movies = self.movie_repo.list_all()?;
        let posters = self.poster_repo.list_all()?;
        let statuses = self.status_repo.list_all()?;
        let links = self.category_repo.list_links()?;

        let mut posters: HashMap<String, Poster> = posters
            .into_iter()
            .map(|p| (p.imdb_id.clone(), p))
            .collect();
        let statuses: HashMap<String, UserStatus> = statuses
            .into_iter()
            .map(|s| (s.imdb_id.clone(), s))
            .collect();
        let mut categories_by_movie: HashMap<String, Vec<Uuid>> = HashMap::new();
        for (imdb_id, category_id) in links {
            categories_by_movie
                .entry(imdb_id)
                .or_default()
                .push(category_id);
        }

        let mut joined: Vec<MovieInfo> = movies
            .into_iter()
            .map(|movie| {
                let poster = posters.remove(&movie.imdb_id);
                let status = statuses.get(&movie.imdb_id);
                let category_ids = categories_by_movie
                    .remove(&movie.imdb_id)
                    .unwrap_or_default();
                MovieInfo {
                    is_favorite: status.map(|s| s.is_favorite).unwrap_or(false),
                    is_watched: status.map(|s| s.is_watched).unwrap_or(false),
                    poster,
                    category_ids,
                    movie,
                }
            })
            .collect();

        library_filter::sort_by_title(&mut joined);
        let count = joined.len();

        *self.index.write().unwrap() = joined;
        self.stale.store(false, Ordering::SeqCst);

        log::info!("library reloaded: {} movies", count);
        Ok(count)
    }

    // ========================================================================
    // VIEWS
    // ========================================================================

    /// Every movie, ordered by title.
    pub fn all_movies(&self) -> Vec<MovieInfo> {
        self.index.read().unwrap().clone()
    }

    pub fn get(&self, imdb_id: &str) -> Option<MovieInfo> {
        self.index
            .read()
            .unwrap()
            .iter()
            .find(|info| info.movie.imdb_id == imdb_id)
            .cloned()
    }

    /// Pure filtering over the current view.
    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<MovieInfo> {
        library_filter::filter_movies(&self.index.read().unwrap(), criteria)
    }

    /// Distinct facet values across the current view.
    pub fn facet_options(&self) -> FacetOptions {
        let index = self.index.read().unwrap();

        let mut genres = BTreeSet::new();
        let mut years = BTreeSet::new();
        let mut languages = BTreeSet::new();
        let mut countries = BTreeSet::new();
        let mut rating_bands = BTreeSet::new();

        for info in index.iter() {
            genres.extend(info.movie.genres());
            if !info.movie.year.is_empty() && info.movie.year != "N/A" {
                years.insert(info.movie.year.clone());
            }
            languages.extend(info.movie.languages());
            countries.extend(info.movie.countries());
            if let Some(rating) = info.movie.numeric_rating() {
                rating_bands.insert(rating.floor() as u8);
            }
        }

        FacetOptions {
            genres: genres.into_iter().collect(),
            years: years.into_iter().collect(),
            languages: languages.into_iter().collect(),
            countries: countries.into_iter().collect(),
            rating_bands: rating_bands.into_iter().collect(),
        }
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Flip the favorite flag: optimistic in-memory update, then
    /// persist. Rolls the flag back when the write fails.
    pub fn toggle_favorite(&self, imdb_id: &str) -> AppResult<bool> {
        self.toggle_flag(imdb_id, "favorite")
    }

    /// Flip the watched flag; same semantics as toggle_favorite.
    pub fn toggle_watched(&self, imdb_id: &str) -> AppResult<bool> {
        self.toggle_flag(imdb_id, "watched")
    }

    fn toggle_flag(&self, imdb_id: &str, flag: &str) -> AppResult<bool> {
        // Optimistic update under the write lock
        let new_value = {
            let mut index = self.index.write().unwrap();
            let info = index
                .iter_mut()
                .find(|info| info.movie.imdb_id == imdb_id)
                .ok_or(crate::error::AppError::NotFound)?;

            match flag {
                "favorite" => {
                    info.is_favorite = !info.is_favorite;
                    info.is_favorite
                }
                _ => {
                    info.is_watched = !info.is_watched;
                    info.is_watched
                }
            }
        };

        let persisted = self.persist_status(imdb_id);
        if let Err(e) = persisted {
            // Roll the optimistic update back before surfacing the error
            let mut index = self.index.write().unwrap();
            if let Some(info) = index.iter_mut().find(|info| info.movie.imdb_id == imdb_id) {
                match flag {
                    "favorite" => info.is_favorite = !new_value,
                    _ => info.is_watched = !new_value,
                }
            }
            return Err(e);
        }

        self.event_bus
            .emit(StatusToggled::new(imdb_id.to_string(), flag, new_value));
        Ok(new_value)
    }

    fn persist_status(&self, imdb_id: &str) -> AppResult<()> {
        let (is_favorite, is_watched) = {
            let index = self.index.read().unwrap();
            let info = index
                .iter()
                .find(|info| info.movie.imdb_id == imdb_id)
                .ok_or(crate::error::AppError::NotFound)?;
            (info.is_favorite, info.is_watched)
        };

        let mut status = UserStatus::new(imdb_id.to_string());
        status.is_favorite = is_favorite;
        status.is_watched = is_watched;
        self.status_repo.upsert(&status)
    }

    /// Delete one movie and its dependent records. The file record (if
    /// any) stays; only a full clear removes those.
    pub fn delete_movie(&self, imdb_id: &str) -> AppResult<()> {
        // Cascades remove the poster, status and category links
        self.movie_repo.delete(imdb_id)?;

        self.index
            .write()
            .unwrap()
            .retain(|info| info.movie.imdb_id != imdb_id);

        self.event_bus.emit(MovieDeleted::new(imdb_id.to_string()));
        Ok(())
    }

    /// Remove every movie, poster, status, link and file record.
    /// User categories go too when `delete_categories` is set; system
    /// categories always survive.
    pub fn clear_library(&self, delete_categories: bool) -> AppResult<()> {
        self.movie_repo.delete_all()?;
        self.file_repo.delete_all()?;

        if delete_categories {
            self.category_repo.delete_user_categories()?;
        }

        self.index.write().unwrap().clear();

        self.event_bus.emit(LibraryCleared::new(delete_categories));
        log::info!(
            "library cleared (user categories {})",
            if delete_categories { "removed" } else { "kept" }
        );
        Ok(())
    }
}
