// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod category_service;
pub mod filename_parser;
pub mod library_filter;
pub mod library_service;
pub mod poster_service;
pub mod resolution_service;
pub mod search_service;

#[cfg(test)]
mod library_service_tests;
#[cfg(test)]
mod resolution_service_tests;

// Re-export all services and their types
pub use category_service::CategoryService;

pub use filename_parser::FilenameParser;

pub use library_filter::{filter_movies, FilterCriteria};

pub use library_service::{FacetOptions, LibraryService, MovieInfo};

pub use poster_service::{compress_image, PosterService};

pub use resolution_service::{ResolutionService, UploadBatchRequest};

pub use search_service::SearchService;
