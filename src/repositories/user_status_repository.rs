// src/repositories/user_status_repository.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::ConnectionPool;
use crate::domain::user_status::UserStatus;
use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------
// Repository contract
// ---------------------------------------------------------------------
pub trait UserStatusRepository: Send + Sync {
    fn get(&self, imdb_id: &str) -> AppResult<Option<UserStatus>>;

    /// Insert-or-update; statuses are created lazily on first toggle
    fn upsert(&self, status: &UserStatus) -> AppResult<()>;

    fn list_all(&self) -> AppResult<Vec<UserStatus>>;

    fn delete(&self, imdb_id: &str) -> AppResult<()>;

    fn delete_all(&self) -> AppResult<()>;
}

// ---------------------------------------------------------------------
// SQLite Implementation
// ---------------------------------------------------------------------
pub struct SqliteUserStatusRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteUserStatusRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_status(row: &Row) -> Result<UserStatus, rusqlite::Error> {
        let updated_at = DateTime::parse_from_rfc3339(&row.get::<_, String>("updated_at")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(UserStatus {
            imdb_id: row.get("imdb_id")?,
            is_favorite: row.get("is_favorite")?,
            is_watched: row.get("is_watched")?,
            updated_at,
        })
    }
}

impl UserStatusRepository for SqliteUserStatusRepository {
    fn get(&self, imdb_id: &str) -> AppResult<Option<UserStatus>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT imdb_id, is_favorite, is_watched, updated_at
             FROM user_statuses WHERE imdb_id = ?1",
        )?;

        match stmt.query_row(params![imdb_id], Self::row_to_status) {
            Ok(status) => Ok(Some(status)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn upsert(&self, status: &UserStatus) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT OR REPLACE INTO user_statuses (imdb_id, is_favorite, is_watched, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                status.imdb_id,
                status.is_favorite,
                status.is_watched,
                status.updated_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn list_all(&self) -> AppResult<Vec<UserStatus>> {
        let conn = self.pool.get()?;

        let mut stmt = conn
            .prepare("SELECT imdb_id, is_favorite, is_watched, updated_at FROM user_statuses")?;

        let statuses = stmt
            .query_map([], Self::row_to_status)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(statuses)
    }

    fn delete(&self, imdb_id: &str) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "DELETE FROM user_statuses WHERE imdb_id = ?1",
            params![imdb_id],
        )?;
        Ok(())
    }

    fn delete_all(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM user_statuses", [])?;
        Ok(())
    }
}
