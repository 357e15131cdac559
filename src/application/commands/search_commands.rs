// src/application/commands/search_commands.rs
//
// Search Command Handlers
//
// RULES:
// - Accept DTOs
// - Call services
// - Return DTOs
// - Never contain business logic

use crate::application::dto::{MovieInfoDto, SearchCandidateDto, TrailerDto};
use crate::application::error_handling::ErrorResponse;
use crate::application::state::AppState;

/// Ranked candidates for a free-text query.
pub async fn search_movies(
    state: &AppState,
    query: String,
) -> Result<Vec<SearchCandidateDto>, ErrorResponse> {
    Ok(state
        .search_service
        .search(&query)
        .await
        .map_err(ErrorResponse::from)?
        .into_iter()
        .map(SearchCandidateDto::from)
        .collect())
}

/// Add a search candidate to the library and return its joined view.
pub async fn add_movie_from_search(
    state: &AppState,
    candidate_id: i64,
) -> Result<MovieInfoDto, ErrorResponse> {
    let movie = state
        .search_service
        .add_from_search(candidate_id)
        .await
        .map_err(ErrorResponse::from)?;

    state.library_service.reload().map_err(ErrorResponse::from)?;

    state
        .library_service
        .get(&movie.imdb_id)
        .map(MovieInfoDto::from)
        .ok_or_else(|| ErrorResponse::from(crate::error::AppError::NotFound))
}

/// Trailer reference for a search candidate, when one exists.
pub async fn get_trailer(
    state: &AppState,
    candidate_id: i64,
) -> Result<Option<TrailerDto>, ErrorResponse> {
    Ok(state
        .search_service
        .find_trailer(candidate_id)
        .await
        .map_err(ErrorResponse::from)?
        .map(TrailerDto::from))
}
