// src/services/resolution_service_tests.rs
//
// Resolution workflow tests
//
// The store is a real temp-file SQLite database; the providers are
// mocks. Covered here:
// - batch dedup (case-insensitive first-seen-wins)
// - partial failure: one failing lookup never aborts its siblings
// - not-found vs transport error, recorded per item
// - already-imported files skip the provider entirely
// - idempotent category linking, including the Uploaded system tag
// - a superseded batch reports stale and emits no completion event

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};

use crate::db::test_support::create_test_pool;
use crate::db::ConnectionPool;
use crate::domain::file_record::FileRecord;
use crate::domain::movie::Movie;
use crate::domain::resolution::FailureReason;
use crate::error::AppError;
use crate::events::{create_event_bus, EventBus, ResolutionBatchCompleted};
use crate::integrations::{MockImageFetcher, MockMetadataProvider, ProviderMovie};
use crate::repositories::{
    CategoryRepository, FileRecordRepository, MovieRepository, SqliteCategoryRepository,
    SqliteFileRecordRepository, SqliteMovieRepository, SqlitePosterRepository,
};
use crate::services::category_service::CategoryService;
use crate::services::poster_service::PosterService;
use crate::services::resolution_service::{ResolutionService, UploadBatchRequest};

fn provider_movie(imdb_id: &str, title: &str) -> ProviderMovie {
    ProviderMovie {
        imdb_id: imdb_id.to_string(),
        title: title.to_string(),
        year: "1999".to_string(),
        rated: "R".to_string(),
        runtime: "120 min".to_string(),
        genre: "Drama".to_string(),
        plot: "N/A".to_string(),
        language: "English".to_string(),
        country: "United States".to_string(),
        awards: "N/A".to_string(),
        poster_url: "N/A".to_string(),
        metascore: "70".to_string(),
        imdb_rating: "7.5".to_string(),
        imdb_votes: "10,000".to_string(),
        kind: "movie".to_string(),
    }
}

struct Fixture {
    pool: Arc<ConnectionPool>,
    event_bus: Arc<EventBus>,
    service: ResolutionService,
    _dir: tempfile::TempDir,
}

/// Wire a service over a fresh database, mocked providers, and the
/// system categories in place.
fn fixture(provider: MockMetadataProvider) -> Fixture {
    let (pool, dir) = create_test_pool();
    let event_bus = create_event_bus();

    let category_repo = Arc::new(SqliteCategoryRepository::new(pool.clone()));
    CategoryService::new(category_repo.clone(), event_bus.clone())
        .ensure_system_categories()
        .unwrap();

    let mut image_fetcher = MockImageFetcher::new();
    image_fetcher.expect_fetch().never();
    let poster_service = Arc::new(PosterService::new(
        Arc::new(SqlitePosterRepository::new(pool.clone())),
        Arc::new(image_fetcher),
    ));

    let service = ResolutionService::new(
        Arc::new(SqliteFileRecordRepository::new(pool.clone())),
        Arc::new(SqliteMovieRepository::new(pool.clone())),
        category_repo,
        Arc::new(provider),
        poster_service,
        event_bus.clone(),
    );

    Fixture {
        pool,
        event_bus,
        service,
        _dir: dir,
    }
}

#[tokio::test]
async fn test_partial_failure_reports_two_successes_one_failure() {
    let mut provider = MockMetadataProvider::new();
    provider
        .expect_find_by_title()
        .returning(|title, _| match title {
            "Alpha" => Ok(Some(provider_movie("tt0000001", "Alpha"))),
            "Beta" => Ok(Some(provider_movie("tt0000002", "Beta"))),
            _ => Err(AppError::Provider("connection reset".to_string())),
        });

    let fx = fixture(provider);

    let report = fx
        .service
        .submit_batch(UploadBatchRequest {
            file_names: vec![
                "Alpha.1999.mkv".to_string(),
                "Beta.1999.mkv".to_string(),
                "Gamma.1999.mkv".to_string(),
            ],
            category_ids: Vec::new(),
        })
        .await
        .unwrap();

    assert_eq!(report.succeeded.len(), 2);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].reason, FailureReason::ProviderError);
    assert!(!report.stale);

    // The store holds exactly the two resolved detail records
    let movie_repo = SqliteMovieRepository::new(fx.pool.clone());
    assert_eq!(movie_repo.list_all().unwrap().len(), 2);
}

#[tokio::test]
async fn test_not_found_is_recorded_distinctly() {
    let mut provider = MockMetadataProvider::new();
    provider.expect_find_by_title().returning(|_, _| Ok(None));

    let fx = fixture(provider);

    let report = fx
        .service
        .submit_batch(UploadBatchRequest {
            file_names: vec!["Obscure.Short.2003.mkv".to_string()],
            category_ids: Vec::new(),
        })
        .await
        .unwrap();

    assert!(report.succeeded.is_empty());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].reason, FailureReason::NotFound);
}

#[tokio::test]
async fn test_batch_dedup_is_case_insensitive_first_seen_wins() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();

    let mut provider = MockMetadataProvider::new();
    provider.expect_find_by_title().returning(move |_, _| {
        seen.fetch_add(1, Ordering::SeqCst);
        Ok(Some(provider_movie("tt0000001", "A")))
    });

    let fx = fixture(provider);

    let report = fx
        .service
        .submit_batch(UploadBatchRequest {
            file_names: vec!["A.2001.mkv".to_string(), "a.2001.mkv".to_string()],
            category_ids: Vec::new(),
        })
        .await
        .unwrap();

    assert_eq!(report.processed.len(), 1);
    assert_eq!(report.processed[0].file_name, "A.2001.mkv");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_known_file_skips_provider_and_reports_success() {
    let mut provider = MockMetadataProvider::new();
    provider.expect_find_by_title().never();

    let fx = fixture(provider);

    // The file was imported in an earlier batch
    let file_repo = SqliteFileRecordRepository::new(fx.pool.clone());
    file_repo
        .save(&FileRecord::new(
            "Alpha.1999.mkv".to_string(),
            "Alpha".to_string(),
            Some("1999".to_string()),
        ))
        .unwrap();
    let movie_repo = SqliteMovieRepository::new(fx.pool.clone());
    movie_repo
        .save(&Movie::from(provider_movie("tt0000001", "Alpha")))
        .unwrap();

    let report = fx
        .service
        .submit_batch(UploadBatchRequest {
            file_names: vec!["Alpha.1999.mkv".to_string()],
            category_ids: Vec::new(),
        })
        .await
        .unwrap();

    assert_eq!(report.succeeded.len(), 1);
    assert!(!report.succeeded[0].newly_fetched);
    assert_eq!(report.succeeded[0].imdb_id, "tt0000001");
}

#[tokio::test]
async fn test_known_file_without_detail_record_is_a_failure() {
    let mut provider = MockMetadataProvider::new();
    provider.expect_find_by_title().never();

    let fx = fixture(provider);

    // File record exists but its earlier lookup never produced a detail
    let file_repo = SqliteFileRecordRepository::new(fx.pool.clone());
    file_repo
        .save(&FileRecord::new(
            "Ghost.2004.mkv".to_string(),
            "Ghost".to_string(),
            Some("2004".to_string()),
        ))
        .unwrap();

    let report = fx
        .service
        .submit_batch(UploadBatchRequest {
            file_names: vec!["Ghost.2004.mkv".to_string()],
            category_ids: Vec::new(),
        })
        .await
        .unwrap();

    assert!(report.succeeded.is_empty());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].reason, FailureReason::NotFound);
}

#[tokio::test]
async fn test_resolved_movies_link_to_requested_and_uploaded_categories() {
    let mut provider = MockMetadataProvider::new();
    provider
        .expect_find_by_title()
        .returning(|_, _| Ok(Some(provider_movie("tt0000001", "Alpha"))));

    let fx = fixture(provider);

    let category_repo = SqliteCategoryRepository::new(fx.pool.clone());
    let picks = crate::domain::category::Category::new("Picks".to_string());
    category_repo.save(&picks).unwrap();

    // Submitting the same batch twice must not duplicate links
    for _ in 0..2 {
        fx.service
            .submit_batch(UploadBatchRequest {
                file_names: vec!["Alpha.1999.mkv".to_string()],
                category_ids: vec![picks.id],
            })
            .await
            .unwrap();
    }

    let linked = category_repo.list_categories_for_movie("tt0000001").unwrap();
    assert_eq!(linked.len(), 2);
    assert!(linked.contains(&picks.id));

    let uploaded = category_repo.get_by_name("Uploaded").unwrap().unwrap();
    assert!(linked.contains(&uploaded.id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_superseded_batch_reports_stale_and_emits_no_event() {
    let fetch_started = Arc::new(Barrier::new(2));
    let invalidated = Arc::new(Barrier::new(2));

    let mut provider = MockMetadataProvider::new();
    {
        let fetch_started = fetch_started.clone();
        let invalidated = invalidated.clone();
        provider.expect_find_by_title().returning(move |_, _| {
            fetch_started.wait();
            invalidated.wait();
            Ok(Some(provider_movie("tt0000001", "Alpha")))
        });
    }

    let fx = fixture(provider);
    let service = Arc::new(fx.service);

    let completions = Arc::new(AtomicUsize::new(0));
    {
        let completions = completions.clone();
        fx.event_bus
            .subscribe::<ResolutionBatchCompleted, _>(move |_| {
                completions.fetch_add(1, Ordering::SeqCst);
            });
    }

    let runner = Arc::clone(&service);
    let handle = tokio::spawn(async move {
        runner
            .submit_batch(UploadBatchRequest {
                file_names: vec!["Alpha.1999.mkv".to_string()],
                category_ids: Vec::new(),
            })
            .await
    });

    // A newer submission claims the epoch while the fetch is in flight
    fetch_started.wait();
    service.invalidate_batches();
    invalidated.wait();

    let report = handle.await.unwrap().unwrap();
    assert!(report.stale);
    assert_eq!(report.succeeded.len(), 1);
    assert_eq!(completions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_empty_batch_yields_empty_report() {
    let mut provider = MockMetadataProvider::new();
    provider.expect_find_by_title().never();

    let fx = fixture(provider);

    let report = fx
        .service
        .submit_batch(UploadBatchRequest::default())
        .await
        .unwrap();

    assert!(report.processed.is_empty());
    assert!(report.succeeded.is_empty());
    assert!(report.failed.is_empty());
    assert!(report.is_complete_success());
}
