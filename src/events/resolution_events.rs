// src/events/resolution_events.rs
//
// Events emitted by the batch resolution workflow.
//
// INVARIANTS:
// - All events are immutable and serializable
// - All events are reachable through real resolution paths
// - Per-item events carry the file name for traceability

use crate::domain::resolution::FailureReason;
use crate::events::DomainEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// MOVIE RESOLVED EVENT
// ============================================================================

/// Emitted when a single file ends up with a detail record, whether
/// newly fetched or matched against one already in the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieResolved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,

    pub file_name: String,
    pub imdb_id: String,
    pub title: String,

    /// False when the file was already known and re-fetch was skipped
    pub newly_fetched: bool,
}

impl MovieResolved {
    pub fn new(file_name: String, imdb_id: String, title: String, newly_fetched: bool) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            file_name,
            imdb_id,
            title,
            newly_fetched,
        }
    }
}

impl DomainEvent for MovieResolved {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "MovieResolved"
    }
}

// ============================================================================
// RESOLUTION FAILED EVENT
// ============================================================================

/// Emitted when a batch item ends up in the failure partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionFailed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,

    pub file_name: String,
    pub title: String,
    pub reason: FailureReason,
    pub message: String,
}

impl ResolutionFailed {
    pub fn new(file_name: String, title: String, reason: FailureReason, message: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            file_name,
            title,
            reason,
            message,
        }
    }
}

impl DomainEvent for ResolutionFailed {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "ResolutionFailed"
    }
}

// ============================================================================
// BATCH COMPLETED EVENT
// ============================================================================

/// Emitted once per live batch after the report is assembled.
/// Stale batches (superseded by a newer submission) do not emit this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionBatchCompleted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,

    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub duration_ms: u64,
}

impl ResolutionBatchCompleted {
    pub fn new(total: usize, succeeded: usize, failed: usize, duration_ms: u64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            total,
            succeeded,
            failed,
            duration_ms,
        }
    }
}

impl DomainEvent for ResolutionBatchCompleted {
    fn event_id(&self) -> Uuid {
        self.event_id
    }
    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
    fn event_type(&self) -> &'static str {
        "ResolutionBatchCompleted"
    }
}
