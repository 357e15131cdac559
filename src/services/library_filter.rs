// src/services/library_filter.rs
//
// Pure filtering over the denormalized library view.
//
// LAWS:
// - Facets combine with AND: a movie matches iff it satisfies every
//   specified facet
// - Values within a facet combine with OR
// - Multi-value fields (genre, language, country) are split on comma
//   and trimmed before comparison
// - The free-text query is a case-insensitive substring match on title
// - Boolean flags, when set, require the status field to be true;
//   movies without a status row count as false
// - Results are ordered by title, case-insensitive ascending

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::library_service::MovieInfo;

/// Filter criteria across all facets. An empty criteria matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring on title
    pub query: Option<String>,

    pub genres: Vec<String>,
    pub years: Vec<String>,

    /// Integer floor of the imdb rating; "7" matches [7.0, 8.0).
    /// Movies with an unparsable rating match no band.
    pub rating_bands: Vec<u8>,

    pub languages: Vec<String>,
    pub countries: Vec<String>,
    pub category_ids: Vec<Uuid>,

    pub favorites_only: bool,
    pub watched_only: bool,
}

impl FilterCriteria {
    /// True when no facet is specified
    pub fn is_empty(&self) -> bool {
        self.query.as_deref().map_or(true, |q| q.trim().is_empty())
            && self.genres.is_empty()
            && self.years.is_empty()
            && self.rating_bands.is_empty()
            && self.languages.is_empty()
            && self.countries.is_empty()
            && self.category_ids.is_empty()
            && !self.favorites_only
            && !self.watched_only
    }
}

/// Apply the criteria and return matches ordered by title.
pub fn filter_movies(movies: &[MovieInfo], criteria: &FilterCriteria) -> Vec<MovieInfo> {
    let mut matched: Vec<MovieInfo> = movies
        .iter()
        .filter(|info| matches(info, criteria))
        .cloned()
        .collect();

    sort_by_title(&mut matched);
    matched
}

/// AND across facets, OR within each facet.
pub fn matches(info: &MovieInfo, criteria: &FilterCriteria) -> bool {
    if let Some(query) = criteria.query.as_deref() {
        let query = query.trim();
        if !query.is_empty()
            && !info
                .movie
                .title
                .to_lowercase()
                .contains(&query.to_lowercase())
        {
            return false;
        }
    }

    if !matches_multi_value(&criteria.genres, &info.movie.genres()) {
        return false;
    }

    if !criteria.years.is_empty()
        && !criteria
            .years
            .iter()
            .any(|year| year == &info.movie.year)
    {
        return false;
    }

    if !criteria.rating_bands.is_empty() {
        let band = info.movie.numeric_rating().map(|r| r.floor() as u8);
        match band {
            Some(band) if criteria.rating_bands.contains(&band) => {}
            _ => return false,
        }
    }

    if !matches_multi_value(&criteria.languages, &info.movie.languages()) {
        return false;
    }

    if !matches_multi_value(&criteria.countries, &info.movie.countries()) {
        return false;
    }

    if !criteria.category_ids.is_empty()
        && !criteria
            .category_ids
            .iter()
            .any(|id| info.category_ids.contains(id))
    {
        return false;
    }

    if criteria.favorites_only && !info.is_favorite {
        return false;
    }

    if criteria.watched_only && !info.is_watched {
        return false;
    }

    true
}

/// Title ordering: case-insensitive ascending, stable for equal keys.
pub fn sort_by_title(movies: &mut [MovieInfo]) {
    movies.sort_by(|a, b| {
        a.movie
            .title
            .to_lowercase()
            .cmp(&b.movie.title.to_lowercase())
    });
}

/// OR within a facet: at least one selected value appears among the
/// movie's values (case-insensitive). An empty selection matches all.
fn matches_multi_value(selected: &[String], values: &[String]) -> bool {
    if selected.is_empty() {
        return true;
    }
    selected.iter().any(|wanted| {
        values
            .iter()
            .any(|value| value.eq_ignore_ascii_case(wanted))
    })
}
