// src/repositories/poster_repository.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::ConnectionPool;
use crate::domain::poster::Poster;
use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------
// Repository contract
// ---------------------------------------------------------------------
pub trait PosterRepository: Send + Sync {
    fn exists(&self, imdb_id: &str) -> AppResult<bool>;

    fn get(&self, imdb_id: &str) -> AppResult<Option<Poster>>;

    fn save(&self, poster: &Poster) -> AppResult<()>;

    fn list_all(&self) -> AppResult<Vec<Poster>>;

    fn delete(&self, imdb_id: &str) -> AppResult<()>;

    fn delete_all(&self) -> AppResult<()>;
}

// ---------------------------------------------------------------------
// SQLite Implementation
// ---------------------------------------------------------------------
pub struct SqlitePosterRepository {
    pool: Arc<ConnectionPool>,
}

impl SqlitePosterRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_poster(row: &Row) -> Result<Poster, rusqlite::Error> {
        let created_at = DateTime::parse_from_rfc3339(&row.get::<_, String>("created_at")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(Poster {
            imdb_id: row.get("imdb_id")?,
            title: row.get("title")?,
            source_url: row.get("source_url")?,
            mime: row.get("mime")?,
            image_bytes: row.get("image_bytes")?,
            created_at,
        })
    }
}

impl PosterRepository for SqlitePosterRepository {
    fn exists(&self, imdb_id: &str) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM posters WHERE imdb_id = ?1)",
            params![imdb_id],
            |row| row.get(0),
        )?;

        Ok(exists)
    }

    fn get(&self, imdb_id: &str) -> AppResult<Option<Poster>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT imdb_id, title, source_url, mime, image_bytes, created_at
             FROM posters WHERE imdb_id = ?1",
        )?;

        match stmt.query_row(params![imdb_id], Self::row_to_poster) {
            Ok(poster) => Ok(Some(poster)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn save(&self, poster: &Poster) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT OR REPLACE INTO posters (
                imdb_id, title, source_url, mime, image_bytes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                poster.imdb_id,
                poster.title,
                poster.source_url,
                poster.mime,
                poster.image_bytes,
                poster.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn list_all(&self) -> AppResult<Vec<Poster>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT imdb_id, title, source_url, mime, image_bytes, created_at FROM posters",
        )?;

        let posters = stmt
            .query_map([], Self::row_to_poster)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(posters)
    }

    fn delete(&self, imdb_id: &str) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM posters WHERE imdb_id = ?1", params![imdb_id])?;
        Ok(())
    }

    fn delete_all(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM posters", [])?;
        Ok(())
    }
}
