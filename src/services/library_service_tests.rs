// src/services/library_service_tests.rs
//
// Library state tests
//
// Covered here:
// - reload joins movies, posters, statuses and links into one view
// - a resolved movie round-trips into the view exactly once and is
//   found by its exact genre value
// - toggles persist, and roll back when the store rejects the write
// - delete and clear semantics, including the keep-categories option
// - the stale flag follows batch completion events

use std::sync::Arc;

use crate::db::test_support::create_test_pool;
use crate::db::ConnectionPool;
use crate::domain::category::Category;
use crate::domain::file_record::FileRecord;
use crate::domain::movie::Movie;
use crate::domain::poster::Poster;
use crate::domain::user_status::UserStatus;
use crate::error::{AppError, AppResult};
use crate::events::{create_event_bus, EventBus, ResolutionBatchCompleted};
use crate::repositories::{
    CategoryRepository, FileRecordRepository, MovieRepository, PosterRepository,
    SqliteCategoryRepository, SqliteFileRecordRepository, SqliteMovieRepository,
    SqlitePosterRepository, SqliteUserStatusRepository, UserStatusRepository,
};
use crate::services::category_service::CategoryService;
use crate::services::library_filter::FilterCriteria;
use crate::services::library_service::LibraryService;
use chrono::Utc;

fn sample_movie(imdb_id: &str, title: &str, genre: &str, year: &str) -> Movie {
    Movie {
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        year: year.to_string(),
        rated: "R".to_string(),
        runtime: "120 min".to_string(),
        genre: genre.to_string(),
        plot: "N/A".to_string(),
        language: "English".to_string(),
        country: "United States".to_string(),
        awards: "N/A".to_string(),
        poster_url: "N/A".to_string(),
        metascore: "70".to_string(),
        imdb_rating: "7.5".to_string(),
        imdb_votes: "10,000".to_string(),
        kind: "movie".to_string(),
        created_at: Utc::now(),
    }
}

struct Fixture {
    pool: Arc<ConnectionPool>,
    event_bus: Arc<EventBus>,
    library: LibraryService,
    _dir: tempfile::TempDir,
}

fn fixture() -> Fixture {
    let (pool, dir) = create_test_pool();
    let event_bus = create_event_bus();

    let library = LibraryService::new(
        Arc::new(SqliteMovieRepository::new(pool.clone())),
        Arc::new(SqlitePosterRepository::new(pool.clone())),
        Arc::new(SqliteUserStatusRepository::new(pool.clone())),
        Arc::new(SqliteCategoryRepository::new(pool.clone())),
        Arc::new(SqliteFileRecordRepository::new(pool.clone())),
        event_bus.clone(),
    );

    Fixture {
        pool,
        event_bus,
        library,
        _dir: dir,
    }
}

#[test]
fn test_reload_joins_all_tables() {
    let fx = fixture();

    let movie_repo = SqliteMovieRepository::new(fx.pool.clone());
    movie_repo
        .save(&sample_movie("tt0000001", "Alpha", "Drama", "2001"))
        .unwrap();

    let poster_repo = SqlitePosterRepository::new(fx.pool.clone());
    poster_repo
        .save(&Poster::new(
            "tt0000001".to_string(),
            "Alpha".to_string(),
            "http://img.example/a.jpg".to_string(),
            "image/jpeg".to_string(),
            vec![1, 2, 3],
        ))
        .unwrap();

    let status_repo = SqliteUserStatusRepository::new(fx.pool.clone());
    let mut status = UserStatus::new("tt0000001".to_string());
    status.toggle_favorite();
    status_repo.upsert(&status).unwrap();

    let category_repo = SqliteCategoryRepository::new(fx.pool.clone());
    let category = Category::new("Picks".to_string());
    category_repo.save(&category).unwrap();
    category_repo.link_movie("tt0000001", category.id).unwrap();

    assert_eq!(fx.library.reload().unwrap(), 1);

    let info = fx.library.get("tt0000001").unwrap();
    assert!(info.poster.is_some());
    assert!(info.is_favorite);
    assert!(!info.is_watched);
    assert_eq!(info.category_ids, vec![category.id]);
}

#[test]
fn test_round_trip_movie_appears_once_and_filters_by_genre() {
    let fx = fixture();

    let movie_repo = SqliteMovieRepository::new(fx.pool.clone());
    movie_repo
        .save(&sample_movie("tt0000001", "Alpha", "Action, Sci-Fi", "2001"))
        .unwrap();
    // Saving the same record again must not duplicate it
    movie_repo
        .save(&sample_movie("tt0000001", "Alpha", "Action, Sci-Fi", "2001"))
        .unwrap();

    fx.library.reload().unwrap();

    let all = fx.library.all_movies();
    assert_eq!(all.len(), 1);

    let by_genre = fx.library.filter(&FilterCriteria {
        genres: vec!["Sci-Fi".to_string()],
        ..Default::default()
    });
    assert_eq!(by_genre.len(), 1);
    assert_eq!(by_genre[0].movie.imdb_id, "tt0000001");
}

#[test]
fn test_filter_union_within_facet_intersection_across() {
    let fx = fixture();

    let movie_repo = SqliteMovieRepository::new(fx.pool.clone());
    movie_repo
        .save(&sample_movie("tt0000001", "Alpha", "Drama", "2001"))
        .unwrap();
    movie_repo
        .save(&sample_movie("tt0000002", "Beta", "Comedy", "2001"))
        .unwrap();
    movie_repo
        .save(&sample_movie("tt0000003", "Gamma", "Drama", "2002"))
        .unwrap();

    fx.library.reload().unwrap();

    // OR within the genre facet: union of Drama and Comedy
    let union = fx.library.filter(&FilterCriteria {
        genres: vec!["Drama".to_string(), "Comedy".to_string()],
        ..Default::default()
    });
    assert_eq!(union.len(), 3);

    // AND with the year facet: intersection
    let intersection = fx.library.filter(&FilterCriteria {
        genres: vec!["Drama".to_string(), "Comedy".to_string()],
        years: vec!["2001".to_string()],
        ..Default::default()
    });
    let titles: Vec<&str> = intersection
        .iter()
        .map(|m| m.movie.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Alpha", "Beta"]);
}

#[test]
fn test_toggle_favorite_persists_lazily_created_status() {
    let fx = fixture();

    SqliteMovieRepository::new(fx.pool.clone())
        .save(&sample_movie("tt0000001", "Alpha", "Drama", "2001"))
        .unwrap();
    fx.library.reload().unwrap();

    assert!(fx.library.toggle_favorite("tt0000001").unwrap());
    assert!(fx.library.get("tt0000001").unwrap().is_favorite);

    // Created lazily on first toggle, persisted immediately
    let status_repo = SqliteUserStatusRepository::new(fx.pool.clone());
    let stored = status_repo.get("tt0000001").unwrap().unwrap();
    assert!(stored.is_favorite);
    assert!(!stored.is_watched);

    // Second toggle flips it back
    assert!(!fx.library.toggle_favorite("tt0000001").unwrap());
    assert!(!status_repo.get("tt0000001").unwrap().unwrap().is_favorite);
}

#[test]
fn test_toggle_unknown_movie_is_not_found() {
    let fx = fixture();
    fx.library.reload().unwrap();

    assert!(matches!(
        fx.library.toggle_favorite("tt9999999"),
        Err(AppError::NotFound)
    ));
}

/// Status store that rejects every write, for rollback tests.
struct FailingStatusRepo;

impl UserStatusRepository for FailingStatusRepo {
    fn get(&self, _imdb_id: &str) -> AppResult<Option<UserStatus>> {
        Ok(None)
    }
    fn upsert(&self, _status: &UserStatus) -> AppResult<()> {
        Err(AppError::Pool("store unavailable".to_string()))
    }
    fn list_all(&self) -> AppResult<Vec<UserStatus>> {
        Ok(Vec::new())
    }
    fn delete(&self, _imdb_id: &str) -> AppResult<()> {
        Ok(())
    }
    fn delete_all(&self) -> AppResult<()> {
        Ok(())
    }
}

#[test]
fn test_failed_toggle_rolls_back_optimistic_update() {
    let (pool, _dir) = create_test_pool();
    let event_bus = create_event_bus();

    SqliteMovieRepository::new(pool.clone())
        .save(&sample_movie("tt0000001", "Alpha", "Drama", "2001"))
        .unwrap();

    let library = LibraryService::new(
        Arc::new(SqliteMovieRepository::new(pool.clone())),
        Arc::new(SqlitePosterRepository::new(pool.clone())),
        Arc::new(FailingStatusRepo),
        Arc::new(SqliteCategoryRepository::new(pool.clone())),
        Arc::new(SqliteFileRecordRepository::new(pool.clone())),
        event_bus,
    );
    library.reload().unwrap();

    assert!(library.toggle_favorite("tt0000001").is_err());

    // The optimistic flag was rolled back
    assert!(!library.get("tt0000001").unwrap().is_favorite);
}

#[test]
fn test_delete_movie_keeps_file_record() {
    let fx = fixture();

    SqliteMovieRepository::new(fx.pool.clone())
        .save(&sample_movie("tt0000001", "Alpha", "Drama", "2001"))
        .unwrap();
    let file_repo = SqliteFileRecordRepository::new(fx.pool.clone());
    file_repo
        .save(&FileRecord::new(
            "Alpha.2001.mkv".to_string(),
            "Alpha".to_string(),
            Some("2001".to_string()),
        ))
        .unwrap();

    fx.library.reload().unwrap();
    fx.library.delete_movie("tt0000001").unwrap();

    assert!(fx.library.get("tt0000001").is_none());
    assert!(!SqliteMovieRepository::new(fx.pool.clone())
        .exists("tt0000001")
        .unwrap());

    // File records only go away on a full clear
    assert!(file_repo.exists("Alpha.2001.mkv").unwrap());
}

#[test]
fn test_clear_library_keeping_categories() {
    let fx = fixture();

    let category_repo = SqliteCategoryRepository::new(fx.pool.clone());
    CategoryService::new(Arc::new(SqliteCategoryRepository::new(fx.pool.clone())), fx.event_bus.clone())
        .ensure_system_categories()
        .unwrap();
    let user_category = Category::new("Keep me".to_string());
    category_repo.save(&user_category).unwrap();

    SqliteMovieRepository::new(fx.pool.clone())
        .save(&sample_movie("tt0000001", "Alpha", "Drama", "2001"))
        .unwrap();
    SqliteFileRecordRepository::new(fx.pool.clone())
        .save(&FileRecord::new(
            "Alpha.2001.mkv".to_string(),
            "Alpha".to_string(),
            None,
        ))
        .unwrap();

    fx.library.reload().unwrap();
    fx.library.clear_library(false).unwrap();

    assert!(fx.library.all_movies().is_empty());
    assert!(SqliteMovieRepository::new(fx.pool.clone())
        .list_all()
        .unwrap()
        .is_empty());
    assert!(SqliteFileRecordRepository::new(fx.pool.clone())
        .list_all()
        .unwrap()
        .is_empty());

    // Both system categories and the user category survive
    let names: Vec<String> = category_repo
        .list_all()
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names.len(), 3);
    assert!(names.contains(&"Keep me".to_string()));
}

#[test]
fn test_clear_library_deleting_categories_spares_system_ones() {
    let fx = fixture();

    let category_repo = SqliteCategoryRepository::new(fx.pool.clone());
    CategoryService::new(Arc::new(SqliteCategoryRepository::new(fx.pool.clone())), fx.event_bus.clone())
        .ensure_system_categories()
        .unwrap();
    category_repo
        .save(&Category::new("Disposable".to_string()))
        .unwrap();

    fx.library.reload().unwrap();
    fx.library.clear_library(true).unwrap();

    let remaining = category_repo.list_all().unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|c| c.is_system));
}

#[test]
fn test_facet_options_are_distinct_and_sorted() {
    let fx = fixture();

    let movie_repo = SqliteMovieRepository::new(fx.pool.clone());
    movie_repo
        .save(&sample_movie("tt0000001", "Alpha", "Drama, Action", "2001"))
        .unwrap();
    movie_repo
        .save(&sample_movie("tt0000002", "Beta", "Action", "1999"))
        .unwrap();

    fx.library.reload().unwrap();

    let options = fx.library.facet_options();
    assert_eq!(options.genres, vec!["Action", "Drama"]);
    assert_eq!(options.years, vec!["1999", "2001"]);
    assert_eq!(options.rating_bands, vec![7]);
}

#[test]
fn test_stale_flag_follows_batch_completion() {
    let fx = fixture();
    fx.library.register_event_handlers();

    fx.library.reload().unwrap();
    assert!(!fx.library.is_stale());

    fx.event_bus
        .emit(ResolutionBatchCompleted::new(1, 1, 0, 10));
    assert!(fx.library.is_stale());

    fx.library.reload().unwrap();
    assert!(!fx.library.is_stale());
}
