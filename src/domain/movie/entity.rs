use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical detail record for a movie, keyed by its external imdb id.
///
/// All metadata fields keep the provider's string shape: a field the
/// provider could not supply holds "N/A", never an empty sentinel of our
/// own. A stored Movie is immutable; a second lookup for the same imdb id
/// is skipped, not merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// External canonical identifier (e.g. "tt0133093")
    pub imdb_id: String,

    /// Display title
    pub title: String,

    /// Release year as reported by the provider
    pub year: String,

    /// Age rating ("PG-13", "R", ...)
    pub rated: String,

    /// Runtime ("136 min")
    pub runtime: String,

    /// Comma-separated genre list ("Action, Sci-Fi")
    pub genre: String,

    /// Plot summary
    pub plot: String,

    /// Comma-separated language list
    pub language: String,

    /// Comma-separated country list
    pub country: String,

    /// Awards summary
    pub awards: String,

    /// Poster image URL ("N/A" when the provider has none)
    pub poster_url: String,

    /// Metacritic score
    pub metascore: String,

    /// IMDb rating ("7.4" or "N/A")
    pub imdb_rating: String,

    /// IMDb vote count
    pub imdb_votes: String,

    /// Record kind as reported by the provider ("movie", "series", ...)
    pub kind: String,

    /// Creation timestamp in our database
    pub created_at: DateTime<Utc>,
}

impl Movie {
    /// Split a comma-separated provider field into trimmed values.
    /// "N/A" and empty fields yield no values.
    fn split_field(field: &str) -> Vec<String> {
        if field.is_empty() || field == "N/A" {
            return Vec::new();
        }
        field
            .split(',')
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect()
    }

    /// Individual genres of this movie
    pub fn genres(&self) -> Vec<String> {
        Self::split_field(&self.genre)
    }

    /// Individual languages of this movie
    pub fn languages(&self) -> Vec<String> {
        Self::split_field(&self.language)
    }

    /// Individual countries of this movie
    pub fn countries(&self) -> Vec<String> {
        Self::split_field(&self.country)
    }

    /// IMDb rating as a number, if the provider reported one
    pub fn numeric_rating(&self) -> Option<f32> {
        self.imdb_rating.parse::<f32>().ok()
    }

    /// Whether the record carries a usable poster reference
    pub fn has_poster_ref(&self) -> bool {
        !self.poster_url.is_empty() && self.poster_url != "N/A"
    }
}

impl std::fmt::Display for Movie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.title, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie_with(genre: &str, rating: &str, poster: &str) -> Movie {
        Movie {
            imdb_id: "tt0133093".to_string(),
            title: "The Matrix".to_string(),
            year: "1999".to_string(),
            rated: "R".to_string(),
            runtime: "136 min".to_string(),
            genre: genre.to_string(),
            plot: "A hacker learns the truth.".to_string(),
            language: "English".to_string(),
            country: "United States, Australia".to_string(),
            awards: "Won 4 Oscars".to_string(),
            poster_url: poster.to_string(),
            metascore: "73".to_string(),
            imdb_rating: rating.to_string(),
            imdb_votes: "1,900,000".to_string(),
            kind: "movie".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_split_fields_trim_values() {
        let movie = movie_with("Action, Sci-Fi", "8.7", "http://img/poster.jpg");
        assert_eq!(movie.genres(), vec!["Action", "Sci-Fi"]);
        assert_eq!(movie.countries(), vec!["United States", "Australia"]);
    }

    #[test]
    fn test_na_field_yields_no_values() {
        let movie = movie_with("N/A", "N/A", "N/A");
        assert!(movie.genres().is_empty());
        assert_eq!(movie.numeric_rating(), None);
        assert!(!movie.has_poster_ref());
    }

    #[test]
    fn test_numeric_rating_parses() {
        let movie = movie_with("Action", "8.7", "N/A");
        assert_eq!(movie.numeric_rating(), Some(8.7));
    }
}
