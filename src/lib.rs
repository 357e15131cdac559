// src/lib.rs
// FilmHub - Local-first movie library manager core
//
// Architecture:
// - Domain-centric: entities and invariants live in `domain`
// - Explicit: no implicit behavior, no ambient singletons
// - Local-first: user controls all data; providers only enrich it
// - Application layer: the boundary a UI shell calls

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;
pub mod integrations;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    validate_category,
    validate_file_record,
    validate_movie,
    // Batch value objects
    BatchReport,
    // Category
    Category,
    FailureReason,
    // File record
    FileRecord,
    // Movie
    Movie,
    ParsedFilename,
    // Poster
    Poster,
    ResolutionFailure,
    ResolvedMovie,
    // User status
    UserStatus,
    SYSTEM_CATEGORY_SEARCHED,
    SYSTEM_CATEGORY_UPLOADED,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    CategoryCreated,
    CategoryDeleted,
    DomainEvent,
    EventBus,
    LibraryCleared,
    MovieDeleted,
    MovieResolved,
    MovieTagged,
    ResolutionBatchCompleted,
    ResolutionFailed,
    StatusToggled,
};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, create_connection_pool_at, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    CategoryRepository,
    FileRecordRepository,
    MovieRepository,
    PosterRepository,
    SqliteCategoryRepository,
    SqliteFileRecordRepository,
    SqliteMovieRepository,
    SqlitePosterRepository,
    SqliteUserStatusRepository,
    UserStatusRepository,
};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    // Category Service
    CategoryService,
    FacetOptions,
    // Filename Parser
    FilenameParser,
    // Library State
    FilterCriteria,
    LibraryService,
    MovieInfo,
    // Poster pipeline
    PosterService,
    // Resolution Workflow
    ResolutionService,
    // Search & enrichment
    SearchService,
    UploadBatchRequest,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppConfig, AppState};

// Re-export application submodules
pub use application::commands;
pub use application::dto;

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{
    DiscoveryProvider, HttpImageFetcher, ImageFetcher, MetadataProvider, OmdbClient,
    ProviderMovie, SearchCandidate, TmdbClient, TrailerRef,
};
