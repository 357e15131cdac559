// src/repositories/file_record_repository.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::ConnectionPool;
use crate::domain::file_record::FileRecord;
use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------
// Repository contract
// ---------------------------------------------------------------------
pub trait FileRecordRepository: Send + Sync {
    /// The "already processed" check for uploads
    fn exists(&self, file_name: &str) -> AppResult<bool>;

    fn get(&self, file_name: &str) -> AppResult<Option<FileRecord>>;

    fn save(&self, record: &FileRecord) -> AppResult<()>;

    fn list_all(&self) -> AppResult<Vec<FileRecord>>;

    fn delete_all(&self) -> AppResult<()>;
}

// ---------------------------------------------------------------------
// SQLite Implementation
// ---------------------------------------------------------------------
pub struct SqliteFileRecordRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteFileRecordRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &Row) -> Result<FileRecord, rusqlite::Error> {
        let created_at = DateTime::parse_from_rfc3339(&row.get::<_, String>("created_at")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(FileRecord {
            file_name: row.get("file_name")?,
            title: row.get("title")?,
            year: row.get("year")?,
            created_at,
        })
    }
}

impl FileRecordRepository for SqliteFileRecordRepository {
    fn exists(&self, file_name: &str) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM file_records WHERE file_name = ?1)",
            params![file_name],
            |row| row.get(0),
        )?;

        Ok(exists)
    }

    fn get(&self, file_name: &str) -> AppResult<Option<FileRecord>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT file_name, title, year, created_at FROM file_records WHERE file_name = ?1",
        )?;

        match stmt.query_row(params![file_name], Self::row_to_record) {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn save(&self, record: &FileRecord) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT OR IGNORE INTO file_records (file_name, title, year, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.file_name,
                record.title,
                record.year,
                record.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn list_all(&self) -> AppResult<Vec<FileRecord>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT file_name, title, year, created_at FROM file_records
             ORDER BY title COLLATE NOCASE",
        )?;

        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn delete_all(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM file_records", [])?;
        Ok(())
    }
}
