// src/application/dto/mod.rs
//
// Data Transfer Objects
//
// PRINCIPLES:
// - DTOs are UI-friendly representations
// - DTOs never leak domain invariants
// - DTOs are simple, serializable structs
// - Conversion FROM domain entities only (never TO)

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::category::Category;
use crate::domain::resolution::{BatchReport, ResolutionFailure, ResolvedMovie};
use crate::integrations::{SearchCandidate, TrailerRef};
use crate::services::library_filter::FilterCriteria;
use crate::services::library_service::MovieInfo;

// ============================================================================
// MOVIE DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieInfoDto {
    pub imdb_id: String,
    pub title: String,
    pub year: String,
    pub rated: String,
    pub runtime: String,
    pub genre: String,
    pub plot: String,
    pub language: String,
    pub country: String,
    pub awards: String,
    pub metascore: String,
    pub imdb_rating: String,
    pub imdb_votes: String,
    pub kind: String,

    /// Inline data URL, ready for an <img> element
    pub poster: Option<String>,

    pub is_favorite: bool,
    pub is_watched: bool,
    pub category_ids: Vec<String>,
}

impl From<MovieInfo> for MovieInfoDto {
    fn from(info: MovieInfo) -> Self {
        Self {
            poster: info.poster.as_ref().map(|p| p.data_url()),
            imdb_id: info.movie.imdb_id,
            title: info.movie.title,
            year: info.movie.year,
            rated: info.movie.rated,
            runtime: info.movie.runtime,
            genre: info.movie.genre,
            plot: info.movie.plot,
            language: info.movie.language,
            country: info.movie.country,
            awards: info.movie.awards,
            metascore: info.movie.metascore,
            imdb_rating: info.movie.imdb_rating,
            imdb_votes: info.movie.imdb_votes,
            kind: info.movie.kind,
            is_favorite: info.is_favorite,
            is_watched: info.is_watched,
            category_ids: info
                .category_ids
                .into_iter()
                .map(|id| id.to_string())
                .collect(),
        }
    }
}

// ============================================================================
// FILTER DTOs
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterDto {
    pub query: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub years: Vec<String>,
    #[serde(default)]
    pub rating_bands: Vec<u8>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default)]
    pub favorites_only: bool,
    #[serde(default)]
    pub watched_only: bool,
}

impl FilterDto {
    /// Parse into filter criteria. Malformed category ids are reported,
    /// not silently dropped.
    pub fn into_criteria(self) -> Result<FilterCriteria, String> {
        let category_ids = self
            .category_ids
            .iter()
            .map(|id| Uuid::parse_str(id).map_err(|e| format!("Invalid UUID '{}': {}", id, e)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FilterCriteria {
            query: self.query,
            genres: self.genres,
            years: self.years,
            rating_bands: self.rating_bands,
            languages: self.languages,
            countries: self.countries,
            category_ids,
            favorites_only: self.favorites_only,
            watched_only: self.watched_only,
        })
    }
}

// ============================================================================
// UPLOAD / BATCH DTOs
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadFilesDto {
    pub file_names: Vec<String>,
    #[serde(default)]
    pub category_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedMovieDto {
    pub file_name: String,
    pub imdb_id: String,
    pub title: String,
    pub newly_fetched: bool,
}

impl From<ResolvedMovie> for ResolvedMovieDto {
    fn from(resolved: ResolvedMovie) -> Self {
        Self {
            file_name: resolved.file_name,
            imdb_id: resolved.imdb_id,
            title: resolved.title,
            newly_fetched: resolved.newly_fetched,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedFileDto {
    pub file_name: String,
    pub title: String,
    pub reason: String,
    pub message: String,
}

impl From<ResolutionFailure> for FailedFileDto {
    fn from(failure: ResolutionFailure) -> Self {
        Self {
            file_name: failure.file_name,
            title: failure.title,
            reason: format!("{:?}", failure.reason),
            message: failure.message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReportDto {
    pub succeeded: Vec<ResolvedMovieDto>,
    pub failed: Vec<FailedFileDto>,
    pub processed_count: usize,
    pub had_errors: bool,
    pub stale: bool,
}

impl From<BatchReport> for BatchReportDto {
    fn from(report: BatchReport) -> Self {
        Self {
            processed_count: report.processed.len(),
            succeeded: report.succeeded.into_iter().map(Into::into).collect(),
            failed: report.failed.into_iter().map(Into::into).collect(),
            had_errors: report.had_errors,
            stale: report.stale,
        }
    }
}

// ============================================================================
// CATEGORY DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDto {
    pub id: String,
    pub name: String,
    pub is_system: bool,
}

impl From<Category> for CategoryDto {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name,
            is_system: category.is_system,
        }
    }
}

// ============================================================================
// SEARCH DTOs
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchCandidateDto {
    pub id: i64,
    pub title: String,
    pub poster_thumb_url: Option<String>,
    pub release_date: Option<String>,
}

impl From<SearchCandidate> for SearchCandidateDto {
    fn from(candidate: SearchCandidate) -> Self {
        Self {
            id: candidate.id,
            title: candidate.title,
            poster_thumb_url: candidate.poster_thumb_url,
            release_date: candidate.release_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailerDto {
    pub site: String,
    pub key: String,
    pub official: bool,
}

impl From<TrailerRef> for TrailerDto {
    fn from(trailer: TrailerRef) -> Self {
        Self {
            site: trailer.site,
            key: trailer.key,
            official: trailer.official,
        }
    }
}
