// src/domain/resolution/value_objects.rs
//
// Resolution Value Objects
//
// Pure, immutable data structures carried through the batch workflow.
// They are the bridge between raw file names and persisted records.
//
// INVARIANTS:
// - No I/O, no side effects, deterministic construction
// - Clone + Debug + Serialize for traceability

use serde::{Deserialize, Serialize};

// ============================================================================
// PARSED FILENAME
// ============================================================================

/// Structured result of parsing one file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFilename {
    /// Title with noise tokens and separators stripped
    pub title: String,

    /// Trailing 4-digit year, when one was present
    pub year: Option<String>,

    /// The original file name, untouched
    pub file_name: String,
}

impl ParsedFilename {
    pub fn new(title: String, year: Option<String>, file_name: String) -> Self {
        Self {
            title,
            year,
            file_name,
        }
    }
}

// ============================================================================
// PER-ITEM OUTCOMES
// ============================================================================

/// A batch item that ended up with a detail record, whether newly
/// fetched or matched against one already in the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMovie {
    pub file_name: String,
    pub imdb_id: String,
    pub title: String,

    /// False when the file was already known and re-fetch was skipped
    pub newly_fetched: bool,
}

/// Why a batch item ended up in the failure partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// Provider explicitly reported no match
    NotFound,

    /// Transport-level or unexpected provider failure
    ProviderError,

    /// Local store rejected the write
    PersistenceError,
}

/// A batch item without a detail record after the workflow finished.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionFailure {
    pub file_name: String,
    pub title: String,
    pub reason: FailureReason,
    pub message: String,
}

impl ResolutionFailure {
    pub fn new(file_name: String, title: String, reason: FailureReason, message: String) -> Self {
        Self {
            file_name,
            title,
            reason,
            message,
        }
    }
}

// ============================================================================
// BATCH REPORT
// ============================================================================

/// Final partition of one submitted batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Items with a detail record (pre-existing or newly fetched)
    pub succeeded: Vec<ResolvedMovie>,

    /// Items without a detail record, with structured reasons
    pub failed: Vec<ResolutionFailure>,

    /// Every parsed entry the batch processed, post-dedup
    pub processed: Vec<ParsedFilename>,

    /// True when any step recorded an error, even if items still succeeded
    pub had_errors: bool,

    /// True when a newer batch claimed the epoch before this one finished;
    /// a stale report was not applied to library state
    pub stale: bool,
}

impl BatchReport {
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty() && !self.had_errors
    }
}
