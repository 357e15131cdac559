// src/application/commands/library_commands.rs
//
// Library Command Handlers
//
// RULES:
// - Accept DTOs
// - Call services
// - Return DTOs
// - Never contain business logic

use crate::application::dto::{FilterDto, MovieInfoDto};
use crate::application::error_handling::ErrorResponse;
use crate::application::state::AppState;
use crate::services::library_service::FacetOptions;

/// Every movie in the library, ordered by title.
pub async fn list_movies(state: &AppState) -> Result<Vec<MovieInfoDto>, ErrorResponse> {
    refresh_if_stale(state)?;
    Ok(state
        .library_service
        .all_movies()
        .into_iter()
        .map(MovieInfoDto::from)
        .collect())
}

/// Movies matching the given filter.
pub async fn filter_movies(
    state: &AppState,
    dto: FilterDto,
) -> Result<Vec<MovieInfoDto>, ErrorResponse> {
    let criteria = dto.into_criteria().map_err(ErrorResponse::validation)?;

    refresh_if_stale(state)?;
    Ok(state
        .library_service
        .filter(&criteria)
        .into_iter()
        .map(MovieInfoDto::from)
        .collect())
}

/// One movie by imdb id.
pub async fn get_movie(
    state: &AppState,
    imdb_id: String,
) -> Result<Option<MovieInfoDto>, ErrorResponse> {
    refresh_if_stale(state)?;
    Ok(state.library_service.get(&imdb_id).map(MovieInfoDto::from))
}

/// Distinct facet values for the filter controls.
pub async fn facet_options(state: &AppState) -> Result<FacetOptions, ErrorResponse> {
    refresh_if_stale(state)?;
    Ok(state.library_service.facet_options())
}

/// Flip the favorite flag; returns the new value.
pub async fn toggle_favorite(state: &AppState, imdb_id: String) -> Result<bool, ErrorResponse> {
    state
        .library_service
        .toggle_favorite(&imdb_id)
        .map_err(ErrorResponse::from)
}

/// Flip the watched flag; returns the new value.
pub async fn toggle_watched(state: &AppState, imdb_id: String) -> Result<bool, ErrorResponse> {
    state
        .library_service
        .toggle_watched(&imdb_id)
        .map_err(ErrorResponse::from)
}

/// Delete one movie and its dependent records.
pub async fn delete_movie(state: &AppState, imdb_id: String) -> Result<(), ErrorResponse> {
    state
        .library_service
        .delete_movie(&imdb_id)
        .map_err(ErrorResponse::from)
}

/// Clear the whole library. User categories go too when
/// `delete_categories` is set; system categories always survive.
pub async fn delete_library(
    state: &AppState,
    delete_categories: bool,
) -> Result<(), ErrorResponse> {
    state
        .library_service
        .clear_library(delete_categories)
        .map_err(ErrorResponse::from)
}

fn refresh_if_stale(state: &AppState) -> Result<(), ErrorResponse> {
    if state.library_service.is_stale() {
        state.library_service.reload().map_err(ErrorResponse::from)?;
    }
    Ok(())
}
