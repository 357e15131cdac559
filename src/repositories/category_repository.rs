// src/repositories/category_repository.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use uuid::Uuid;

use crate::db::ConnectionPool;
use crate::domain::category::Category;
use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------
// Repository contract
// ---------------------------------------------------------------------
pub trait CategoryRepository: Send + Sync {
    fn save(&self, category: &Category) -> AppResult<()>;

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Category>>;

    /// Case-insensitive name lookup, backing the uniqueness rule
    fn get_by_name(&self, name: &str) -> AppResult<Option<Category>>;

    fn list_all(&self) -> AppResult<Vec<Category>>;

    fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Removes every non-system category (and, via cascade, its links)
    fn delete_user_categories(&self) -> AppResult<()>;

    fn link_movie(&self, imdb_id: &str, category_id: Uuid) -> AppResult<()>;

    fn unlink_movie(&self, imdb_id: &str, category_id: Uuid) -> AppResult<()>;

    fn list_categories_for_movie(&self, imdb_id: &str) -> AppResult<Vec<Uuid>>;

    fn list_movies_in_category(&self, category_id: Uuid) -> AppResult<Vec<String>>;

    /// Every (imdb_id, category_id) pair, for the library join
    fn list_links(&self) -> AppResult<Vec<(String, Uuid)>>;
}

// ---------------------------------------------------------------------
// SQLite Implementation
// ---------------------------------------------------------------------
pub struct SqliteCategoryRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteCategoryRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_category(row: &Row) -> Result<Category, rusqlite::Error> {
        let id = Uuid::parse_str(&row.get::<_, String>("id")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let created_at = DateTime::parse_from_rfc3339(&row.get::<_, String>("created_at")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(Category {
            id,
            name: row.get("name")?,
            is_system: row.get("is_system")?,
            created_at,
        })
    }

    fn row_to_uuid(row: &Row) -> Result<Uuid, rusqlite::Error> {
        Self::row_to_uuid_at(row, 0)
    }

    fn row_to_uuid_at(row: &Row, idx: usize) -> Result<Uuid, rusqlite::Error> {
        let id_str: String = row.get(idx)?;
        Uuid::parse_str(&id_str).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    }
}

impl CategoryRepository for SqliteCategoryRepository {
    fn save(&self, category: &Category) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT OR REPLACE INTO categories (id, name, is_system, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                category.id.to_string(),
                category.name,
                category.is_system,
                category.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn get_by_id(&self, id: Uuid) -> AppResult<Option<Category>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, name, is_system, created_at FROM categories WHERE id = ?1",
        )?;

        match stmt.query_row(params![id.to_string()], Self::row_to_category) {
            Ok(category) => Ok(Some(category)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn get_by_name(&self, name: &str) -> AppResult<Option<Category>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, name, is_system, created_at FROM categories
             WHERE name = ?1 COLLATE NOCASE",
        )?;

        match stmt.query_row(params![name], Self::row_to_category) {
            Ok(category) => Ok(Some(category)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_all(&self) -> AppResult<Vec<Category>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "SELECT id, name, is_system, created_at FROM categories
             ORDER BY name COLLATE NOCASE",
        )?;

        let categories = stmt
            .query_map([], Self::row_to_category)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    fn delete(&self, id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "DELETE FROM categories WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(())
    }

    fn delete_user_categories(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM categories WHERE is_system = 0", [])?;
        Ok(())
    }

    fn link_movie(&self, imdb_id: &str, category_id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "INSERT OR IGNORE INTO movie_categories (imdb_id, category_id, created_at)
             VALUES (?1, ?2, datetime('now'))",
            params![imdb_id, category_id.to_string()],
        )?;

        Ok(())
    }

    fn unlink_movie(&self, imdb_id: &str, category_id: Uuid) -> AppResult<()> {
        let conn = self.pool.get()?;

        conn.execute(
            "DELETE FROM movie_categories WHERE imdb_id = ?1 AND category_id = ?2",
            params![imdb_id, category_id.to_string()],
        )?;

        Ok(())
    }

    fn list_categories_for_movie(&self, imdb_id: &str) -> AppResult<Vec<Uuid>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare("SELECT category_id FROM movie_categories WHERE imdb_id = ?1")?;

        let ids = stmt
            .query_map(params![imdb_id], Self::row_to_uuid)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    fn list_movies_in_category(&self, category_id: Uuid) -> AppResult<Vec<String>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare("SELECT imdb_id FROM movie_categories WHERE category_id = ?1")?;

        let ids = stmt
            .query_map(params![category_id.to_string()], |row| {
                row.get::<_, String>(0)
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    fn list_links(&self) -> AppResult<Vec<(String, Uuid)>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT imdb_id, category_id FROM movie_categories")?;

        let links = stmt
            .query_map([], |row| {
                let imdb_id: String = row.get(0)?;
                let category_id = Self::row_to_uuid_at(row, 1)?;
                Ok((imdb_id, category_id))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(links)
    }
}
