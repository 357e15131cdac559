// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file declares all domain modules and re-exports their public API.
// All other modules import from `crate::domain::*`

// ============================================================================
// MODULE DECLARATIONS
// ============================================================================

pub mod category;
pub mod file_record;
pub mod movie;
pub mod poster;
pub mod resolution;
pub mod user_status;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Movie Domain
pub use movie::{validate_movie, Movie};

// File Record Domain
pub use file_record::{validate_file_record, FileRecord};

// Poster Domain
pub use poster::Poster;

// User Status Domain
pub use user_status::UserStatus;

// Category Domain
pub use category::{validate_category, Category, SYSTEM_CATEGORY_SEARCHED, SYSTEM_CATEGORY_UPLOADED};

// Resolution Value Objects
pub use resolution::{
    BatchReport, FailureReason, ParsedFilename, ResolutionFailure, ResolvedMovie,
};

// ============================================================================
// DOMAIN ERROR TYPES
// ============================================================================

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Protected entity: {0}")]
    Protected(String),

    #[error("Entity not found: {0}")]
    NotFound(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
