//! Critical Movie Invariants:
//!
//! 1. Exactly one Movie per imdb id
//! 2. A stored Movie is immutable; re-fetch is skipped, never merged
//! 3. Metadata fields keep the provider's string shape ("N/A" allowed)
//! 4. Deleting a Movie removes its poster, status and category links

pub mod entity;
pub mod invariants;

pub use entity::Movie;
pub use invariants::validate_movie;
