// src/application/commands/category_commands.rs
//
// Category Command Handlers
//
// RULES:
// - Accept DTOs
// - Call services
// - Return DTOs
// - Never contain business logic

use uuid::Uuid;

use crate::application::dto::CategoryDto;
use crate::application::error_handling::ErrorResponse;
use crate::application::state::AppState;

/// All categories, system ones included, ordered by name.
pub async fn list_categories(state: &AppState) -> Result<Vec<CategoryDto>, ErrorResponse> {
    Ok(state
        .category_service
        .list_categories()
        .map_err(ErrorResponse::from)?
        .into_iter()
        .map(CategoryDto::from)
        .collect())
}

/// Create a user category.
pub async fn create_category(
    state: &AppState,
    name: String,
) -> Result<CategoryDto, ErrorResponse> {
    state
        .category_service
        .create_category(&name)
        .map(CategoryDto::from)
        .map_err(ErrorResponse::from)
}

/// Rename a user category.
pub async fn rename_category(
    state: &AppState,
    category_id: String,
    new_name: String,
) -> Result<CategoryDto, ErrorResponse> {
    let id = parse_id(&category_id)?;
    state
        .category_service
        .rename_category(id, &new_name)
        .map(CategoryDto::from)
        .map_err(ErrorResponse::from)
}

/// Delete a user category and its movie links.
pub async fn delete_category(state: &AppState, category_id: String) -> Result<(), ErrorResponse> {
    let id = parse_id(&category_id)?;
    state
        .category_service
        .delete_category(id)
        .map_err(ErrorResponse::from)
}

/// Tag a movie into a category. Idempotent.
pub async fn tag_movie(
    state: &AppState,
    imdb_id: String,
    category_id: String,
) -> Result<(), ErrorResponse> {
    let id = parse_id(&category_id)?;
    state
        .category_service
        .tag_movie(&imdb_id, id)
        .map_err(ErrorResponse::from)?;

    state.library_service.reload().map_err(ErrorResponse::from)?;
    Ok(())
}

/// Remove a movie from a category.
pub async fn untag_movie(
    state: &AppState,
    imdb_id: String,
    category_id: String,
) -> Result<(), ErrorResponse> {
    let id = parse_id(&category_id)?;
    state
        .category_service
        .untag_movie(&imdb_id, id)
        .map_err(ErrorResponse::from)?;

    state.library_service.reload().map_err(ErrorResponse::from)?;
    Ok(())
}

fn parse_id(category_id: &str) -> Result<Uuid, ErrorResponse> {
    Uuid::parse_str(category_id)
        .map_err(|e| ErrorResponse::validation(format!("Invalid UUID '{}': {}", category_id, e)))
}
