// src/repositories/mod.rs
//
// Persistence layer: one trait + SQLite implementation per entity

pub mod category_repository;
pub mod file_record_repository;
pub mod movie_repository;
pub mod poster_repository;
pub mod user_status_repository;

pub use category_repository::{CategoryRepository, SqliteCategoryRepository};
pub use file_record_repository::{FileRecordRepository, SqliteFileRecordRepository};
pub use movie_repository::{MovieRepository, SqliteMovieRepository};
pub use poster_repository::{PosterRepository, SqlitePosterRepository};
pub use user_status_repository::{SqliteUserStatusRepository, UserStatusRepository};
