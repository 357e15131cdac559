// src/services/resolution_service.rs
//
// Resolution Service
//
// Runs one submitted batch of file names through the import pipeline:
//
//   parse & dedup → existence check → persist file records →
//   fetch details → persist details → fetch & persist posters →
//   link categories → report
//
// RULES:
// - Steps are strictly sequential per batch; no parallel batches
// - Fan-out steps wait for all items and collect errors; a single
//   failing item never aborts its siblings or the batch
// - Provider "not found" is distinct from a transport error and both
//   are recorded per item
// - A batch epoch is claimed at submission; a superseded batch skips
//   its final state update so a stale run cannot clobber newer state

use futures::future::join_all;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::domain::category::SYSTEM_CATEGORY_UPLOADED;
use crate::domain::file_record::{validate_file_record, FileRecord};
use crate::domain::movie::{validate_movie, Movie};
use crate::domain::resolution::{
    BatchReport, FailureReason, ParsedFilename, ResolutionFailure, ResolvedMovie,
};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, MovieResolved, ResolutionBatchCompleted, ResolutionFailed};
use crate::integrations::{MetadataProvider, ProviderMovie};
use crate::repositories::{CategoryRepository, FileRecordRepository, MovieRepository};
use crate::services::filename_parser::FilenameParser;
use crate::services::poster_service::PosterService;

/// One user-submitted set of files plus the categories to tag them with.
#[derive(Debug, Clone, Default)]
pub struct UploadBatchRequest {
    pub file_names: Vec<String>,
    pub category_ids: Vec<Uuid>,
}

pub struct ResolutionService {
    file_repo: Arc<dyn FileRecordRepository>,
    movie_repo: Arc<dyn MovieRepository>,
    category_repo: Arc<dyn CategoryRepository>,
    metadata_provider: Arc<dyn MetadataProvider>,
    poster_service: Arc<PosterService>,
    event_bus: Arc<EventBus>,
    parser: FilenameParser,

    /// Claimed per submission; the final state update is skipped when a
    /// newer batch has claimed a higher value
    batch_epoch: AtomicU64,
}

impl ResolutionService {
    pub fn new(
        file_repo: Arc<dyn FileRecordRepository>,
        movie_repo: Arc<dyn MovieRepository>,
        category_repo: Arc<dyn CategoryRepository>,
        metadata_provider: Arc<dyn MetadataProvider>,
        poster_service: Arc<PosterService>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            file_repo,
            movie_repo,
            category_repo,
            metadata_provider,
            poster_service,
            event_bus,
            parser: FilenameParser::new(),
            batch_epoch: AtomicU64::new(0),
        }
    }

    /// Drop interest in any in-flight batch (caller going away).
    /// The running batch will finish its work but report stale and skip
    /// its completion event.
    pub fn invalidate_batches(&self) {
        self.batch_epoch.fetch_add(1, Ordering::SeqCst);
    }

    /// Run one batch through the full pipeline.
    ///
    /// Always reaches the report, carrying whatever partial progress was
    /// made; item-level failures are collected, never propagated.
    pub async fn submit_batch(&self, request: UploadBatchRequest) -> AppResult<BatchReport> {
        let epoch = self.batch_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        let start_time = Instant::now();

        let mut report = BatchReport::default();

        // Step 1: parse & deduplicate (case-insensitive first-seen-wins)
        let parsed = self.parser.parse_batch(&request.file_names);
        let deduped = dedup_by_title(parsed);
        report.processed = deduped.clone();

        // Step 2: existence check. Known files skip re-fetch and resolve
        // their detail record by title for the report.
        let mut pending: Vec<ParsedFilename> = Vec::new();
        for entry in deduped {
            match self.file_repo.exists(&entry.file_name) {
                Ok(true) => self.resolve_known_file(&entry, &mut report),
                Ok(false) => pending.push(entry),
                Err(e) => {
                    log::warn!("existence check failed for {}: {}", entry.file_name, e);
                    report.had_errors = true;
                    self.record_failure(
                        &mut report,
                        &entry,
                        FailureReason::PersistenceError,
                        e.to_string(),
                    );
                }
            }
        }

        // Step 3: persist file records, best effort
        for entry in &pending {
            if let Err(e) = self.persist_file_record(entry) {
                log::warn!("failed to persist file record {}: {}", entry.file_name, e);
                report.had_errors = true;
            }
        }

        // Step 4: fetch details, all entries concurrently
        let fetches = pending.into_iter().map(|entry| {
            let provider = Arc::clone(&self.metadata_provider);
            async move {
                let outcome = provider
                    .find_by_title(&entry.title, entry.year.as_deref())
                    .await;
                (entry, outcome)
            }
        });
        let fetched = join_all(fetches).await;

        // Step 5: persist found details; not-found and transport errors
        // drop the entry into the failure partition
        let mut resolved_new: Vec<(ParsedFilename, Movie)> = Vec::new();
        for (entry, outcome) in fetched {
            match outcome {
                Ok(Some(detail)) => {
                    self.persist_detail(entry, detail, &mut resolved_new, &mut report)
                }
                Ok(None) => self.record_failure(
                    &mut report,
                    &entry,
                    FailureReason::NotFound,
                    "provider reported no match".to_string(),
                ),
                Err(e) => self.record_failure(
                    &mut report,
                    &entry,
                    FailureReason::ProviderError,
                    e.to_string(),
                ),
            }
        }

        // Steps 6 & 7: fetch, compress and persist posters concurrently.
        // A poster failure never demotes its movie; the detail record is
        // already stored.
        let poster_jobs = resolved_new.iter().map(|(_, movie)| {
            let poster_service = Arc::clone(&self.poster_service);
            async move { (movie.imdb_id.clone(), poster_service.ensure_poster(movie).await) }
        });
        for (imdb_id, outcome) in join_all(poster_jobs).await {
            if let Err(e) = outcome {
                log::warn!("poster pipeline failed for {}: {}", imdb_id, e);
                report.had_errors = true;
            }
        }

        for (entry, movie) in resolved_new {
            self.event_bus.emit(MovieResolved::new(
                entry.file_name.clone(),
                movie.imdb_id.clone(),
                movie.title.clone(),
                true,
            ));
            report.succeeded.push(ResolvedMovie {
                file_name: entry.file_name,
                imdb_id: movie.imdb_id,
                title: movie.title,
                newly_fetched: true,
            });
        }

        // Step 8: link every resolved movie (new and pre-existing) to the
        // requested categories plus the Uploaded system category
        self.link_categories(&request.category_ids, &mut report);

        // Step 9: report. Only a still-live batch publishes completion.
        let duration_ms = start_time.elapsed().as_millis() as u64;
        if self.batch_epoch.load(Ordering::SeqCst) == epoch {
            self.event_bus.emit(ResolutionBatchCompleted::new(
                report.processed.len(),
                report.succeeded.len(),
                report.failed.len(),
                duration_ms,
            ));
        } else {
            log::info!("batch superseded before completion, skipping state update");
            report.stale = true;
        }

        Ok(report)
    }

    // ========================================================================
    // INTERNAL STEPS
    // ========================================================================

    /// A file seen in an earlier batch: no re-fetch, its detail record is
    /// looked up by title. A known file without a detail record (its
    /// earlier fetch failed) stays in the failure partition.
    fn resolve_known_file(&self, entry: &ParsedFilename, report: &mut BatchReport) {
        match self.movie_repo.get_by_title(&entry.title) {
            Ok(Some(movie)) => {
                self.event_bus.emit(MovieResolved::new(
                    entry.file_name.clone(),
                    movie.imdb_id.clone(),
                    movie.title.clone(),
                    false,
                ));
                report.succeeded.push(ResolvedMovie {
                    file_name: entry.file_name.clone(),
                    imdb_id: movie.imdb_id,
                    title: movie.title,
                    newly_fetched: false,
                });
            }
            Ok(None) => self.record_failure(
                report,
                entry,
                FailureReason::NotFound,
                "no stored detail record for previously imported file".to_string(),
            ),
            Err(e) => {
                report.had_errors = true;
                self.record_failure(report, entry, FailureReason::PersistenceError, e.to_string());
            }
        }
    }

    fn persist_file_record(&self, entry: &ParsedFilename) -> AppResult<()> {
        let record = FileRecord::new(
            entry.file_name.clone(),
            entry.title.clone(),
            entry.year.clone(),
        );
        validate_file_record(&record).map_err(AppError::Domain)?;
        self.file_repo.save(&record)
    }

    /// Persist one fetched detail record, skipping imdb ids that are
    /// already stored (earlier batch, or a duplicate within this one).
    fn persist_detail(
        &self,
        entry: ParsedFilename,
        detail: ProviderMovie,
        resolved_new: &mut Vec<(ParsedFilename, Movie)>,
        report: &mut BatchReport,
    ) {
        let movie: Movie = detail.into();

        let already_stored = match self.movie_repo.exists(&movie.imdb_id) {
            Ok(exists) => exists,
            Err(e) => {
                self.record_failure(
                    report,
                    &entry,
                    FailureReason::PersistenceError,
                    e.to_string(),
                );
                report.had_errors = true;
                return;
            }
        };

        if !already_stored {
            let stored = validate_movie(&movie)
                .map_err(AppError::Domain)
                .and_then(|()| self.movie_repo.save(&movie));
            if let Err(e) = stored {
                log::warn!("failed to persist detail for {}: {}", movie.imdb_id, e);
                self.record_failure(
                    report,
                    &entry,
                    FailureReason::PersistenceError,
                    e.to_string(),
                );
                report.had_errors = true;
                return;
            }
        }

        resolved_new.push((entry, movie));
    }

    /// Idempotent tagging of every resolved movie with the requested
    /// categories plus the Uploaded system category.
    fn link_categories(&self, category_ids: &[Uuid], report: &mut BatchReport) {
        if report.succeeded.is_empty() {
            return;
        }

        let mut link_ids: Vec<Uuid> = category_ids.to_vec();
        match self.category_repo.get_by_name(SYSTEM_CATEGORY_UPLOADED) {
            Ok(Some(uploaded)) => link_ids.push(uploaded.id),
            Ok(None) => {
                log::warn!("system category '{}' missing", SYSTEM_CATEGORY_UPLOADED);
                report.had_errors = true;
            }
            Err(e) => {
                log::warn!("failed to load system category: {}", e);
                report.had_errors = true;
            }
        }

        for resolved in &report.succeeded {
            for category_id in &link_ids {
                if let Err(e) = self
                    .category_repo
                    .link_movie(&resolved.imdb_id, *category_id)
                {
                    log::warn!(
                        "failed to link {} to category {}: {}",
                        resolved.imdb_id,
                        category_id,
                        e
                    );
                    report.had_errors = true;
                }
            }
        }
    }

    fn record_failure(
        &self,
        report: &mut BatchReport,
        entry: &ParsedFilename,
        reason: FailureReason,
        message: String,
    ) {
        self.event_bus.emit(ResolutionFailed::new(
            entry.file_name.clone(),
            entry.title.clone(),
            reason,
            message.clone(),
        ));
        report.failed.push(ResolutionFailure::new(
            entry.file_name.clone(),
            entry.title.clone(),
            reason,
            message,
        ));
    }
}

/// Within a batch, the first occurrence of a title wins; later entries
/// with the same title (case-insensitive) are dropped.
fn dedup_by_title(entries: Vec<ParsedFilename>) -> Vec<ParsedFilename> {
    let mut seen: HashSet<String> = HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.title.to_lowercase()))
        .collect()
}
