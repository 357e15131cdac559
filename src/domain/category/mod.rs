//! Critical Category Invariants:
//!
//! 1. Categories do NOT affect movie records
//! 2. Categories are purely organizational
//! 3. A movie can belong to multiple categories
//! 4. Deleting a category does NOT delete movies
//! 5. Category names are unique case-insensitively
//! 6. System categories cannot be renamed or deleted

pub mod entity;

pub use entity::Category;

use crate::domain::{DomainError, DomainResult};

/// Name of the system category movies added via search are linked to
pub const SYSTEM_CATEGORY_SEARCHED: &str = "Searched";

/// Name of the system category uploaded files are linked to
pub const SYSTEM_CATEGORY_UPLOADED: &str = "Uploaded";

/// Validates Category invariants
pub fn validate_category(category: &Category) -> DomainResult<()> {
    if category.name.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Category name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_category() {
        let category = Category::new("Halloween picks".to_string());
        assert!(validate_category(&category).is_ok());
    }

    #[test]
    fn test_blank_name_fails() {
        let category = Category::new("   ".to_string());
        assert!(validate_category(&category).is_err());
    }

    #[test]
    fn test_system_category_is_flagged() {
        let category = Category::system(SYSTEM_CATEGORY_SEARCHED);
        assert!(category.is_system);
        assert_eq!(category.name, "Searched");
    }
}
