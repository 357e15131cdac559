// src/repositories/movie_repository.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};

use crate::db::ConnectionPool;
use crate::domain::movie::Movie;
use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------
// Repository contract
// ---------------------------------------------------------------------
pub trait MovieRepository: Send + Sync {
    fn exists(&self, imdb_id: &str) -> AppResult<bool>;

    fn get(&self, imdb_id: &str) -> AppResult<Option<Movie>>;

    /// Case-insensitive exact-title lookup, used to resolve files that
    /// were already imported in an earlier batch
    fn get_by_title(&self, title: &str) -> AppResult<Option<Movie>>;

    fn save(&self, movie: &Movie) -> AppResult<()>;

    fn list_all(&self) -> AppResult<Vec<Movie>>;

    fn delete(&self, imdb_id: &str) -> AppResult<()>;

    fn delete_all(&self) -> AppResult<()>;
}

// ---------------------------------------------------------------------
// SQLite Implementation
// ---------------------------------------------------------------------
pub struct SqliteMovieRepository {
    pool: Arc<ConnectionPool>,
}

const MOVIE_COLUMNS: &str = "imdb_id, title, year, rated, runtime, genre, plot, language, \
     country, awards, poster_url, metascore, imdb_rating, imdb_votes, kind, created_at";

impl SqliteMovieRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_movie(row: &Row) -> Result<Movie, rusqlite::Error> {
        let created_at = DateTime::parse_from_rfc3339(&row.get::<_, String>("created_at")?)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(Movie {
            imdb_id: row.get("imdb_id")?,
            title: row.get("title")?,
            year: row.get("year")?,
            rated: row.get("rated")?,
            runtime: row.get("runtime")?,
            genre: row.get("genre")?,
            plot: row.get("plot")?,
            language: row.get("language")?,
            country: row.get("country")?,
            awards: row.get("awards")?,
            poster_url: row.get("poster_url")?,
            metascore: row.get("metascore")?,
            imdb_rating: row.get("imdb_rating")?,
            imdb_votes: row.get("imdb_votes")?,
            kind: row.get("kind")?,
            created_at,
        })
    }
}

impl MovieRepository for SqliteMovieRepository {
    fn exists(&self, imdb_id: &str) -> AppResult<bool> {
        let conn = self.pool.get()?;

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM movies WHERE imdb_id = ?1)",
            params![imdb_id],
            |row| row.get(0),
        )?;

        Ok(exists)
    }

    fn get(&self, imdb_id: &str) -> AppResult<Option<Movie>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM movies WHERE imdb_id = ?1",
            MOVIE_COLUMNS
        ))?;

        match stmt.query_row(params![imdb_id], Self::row_to_movie) {
            Ok(movie) => Ok(Some(movie)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn get_by_title(&self, title: &str) -> AppResult<Option<Movie>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM movies WHERE title = ?1 COLLATE NOCASE LIMIT 1",
            MOVIE_COLUMNS
        ))?;

        match stmt.query_row(params![title], Self::row_to_movie) {
            Ok(movie) => Ok(Some(movie)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn save(&self, movie: &Movie) -> AppResult<()> {
        let conn = self.pool.get()?;

        // Detail records are immutable once stored
        conn.execute(
            "INSERT OR IGNORE INTO movies (
                imdb_id, title, year, rated, runtime, genre, plot, language,
                country, awards, poster_url, metascore, imdb_rating,
                imdb_votes, kind, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                movie.imdb_id,
                movie.title,
                movie.year,
                movie.rated,
                movie.runtime,
                movie.genre,
                movie.plot,
                movie.language,
                movie.country,
                movie.awards,
                movie.poster_url,
                movie.metascore,
                movie.imdb_rating,
                movie.imdb_votes,
                movie.kind,
                movie.created_at.to_rfc3339(),
            ],
        )?;

        Ok(())
    }

    fn list_all(&self) -> AppResult<Vec<Movie>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM movies ORDER BY title COLLATE NOCASE",
            MOVIE_COLUMNS
        ))?;

        let movies = stmt
            .query_map([], Self::row_to_movie)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(movies)
    }

    fn delete(&self, imdb_id: &str) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM movies WHERE imdb_id = ?1", params![imdb_id])?;
        Ok(())
    }

    fn delete_all(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM movies", [])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::create_test_pool;

    fn sample_movie(imdb_id: &str, title: &str) -> Movie {
        Movie {
            imdb_id: imdb_id.to_string(),
            title: title.to_string(),
            year: "1999".to_string(),
            rated: "R".to_string(),
            runtime: "136 min".to_string(),
            genre: "Action, Sci-Fi".to_string(),
            plot: "N/A".to_string(),
            language: "English".to_string(),
            country: "United States".to_string(),
            awards: "N/A".to_string(),
            poster_url: "http://img.example/p.jpg".to_string(),
            metascore: "73".to_string(),
            imdb_rating: "8.7".to_string(),
            imdb_votes: "1,900,000".to_string(),
            kind: "movie".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_save_and_get_round_trip() {
        let (pool, _dir) = create_test_pool();
        let repo = SqliteMovieRepository::new(pool);

        let movie = sample_movie("tt0133093", "The Matrix");
        repo.save(&movie).unwrap();

        let stored = repo.get("tt0133093").unwrap().unwrap();
        assert_eq!(stored.title, "The Matrix");
        assert_eq!(stored.genre, "Action, Sci-Fi");
    }

    #[test]
    fn test_get_by_title_is_case_insensitive() {
        let (pool, _dir) = create_test_pool();
        let repo = SqliteMovieRepository::new(pool);

        repo.save(&sample_movie("tt0133093", "The Matrix")).unwrap();

        let found = repo.get_by_title("the matrix").unwrap();
        assert_eq!(found.unwrap().imdb_id, "tt0133093");
    }

    #[test]
    fn test_second_save_does_not_overwrite() {
        let (pool, _dir) = create_test_pool();
        let repo = SqliteMovieRepository::new(pool);

        repo.save(&sample_movie("tt0133093", "The Matrix")).unwrap();

        let mut altered = sample_movie("tt0133093", "The Matrix");
        altered.plot = "changed".to_string();
        repo.save(&altered).unwrap();

        let stored = repo.get("tt0133093").unwrap().unwrap();
        assert_eq!(stored.plot, "N/A");
    }

    #[test]
    fn test_delete_single_movie() {
        let (pool, _dir) = create_test_pool();
        let repo = SqliteMovieRepository::new(pool);

        repo.save(&sample_movie("tt0133093", "The Matrix")).unwrap();
        repo.save(&sample_movie("tt0234215", "The Matrix Reloaded"))
            .unwrap();

        repo.delete("tt0133093").unwrap();

        assert!(!repo.exists("tt0133093").unwrap());
        assert!(repo.exists("tt0234215").unwrap());
    }
}
