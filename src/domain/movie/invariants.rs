use super::entity::Movie;
use crate::domain::{DomainError, DomainResult};

/// Validates all Movie invariants
pub fn validate_movie(movie: &Movie) -> DomainResult<()> {
    validate_imdb_id(movie)?;
    validate_title(movie)?;
    Ok(())
}

/// The imdb id is the primary key across detail, poster, status and
/// category-link records; it must be present.
fn validate_imdb_id(movie: &Movie) -> DomainResult<()> {
    if movie.imdb_id.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Movie imdb id cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_title(movie: &Movie) -> DomainResult<()> {
    if movie.title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Movie title cannot be empty".to_string(),
        ));
    }
    Ok(())
}
