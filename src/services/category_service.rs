// src/services/category_service.rs
//
// Category management
//
// RULES:
// - Names are unique case-insensitively
// - The two system categories exist after startup and cannot be renamed
//   or deleted
// - Tagging is idempotent: linking an already-linked pair is a no-op

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::category::{
    validate_category, Category, SYSTEM_CATEGORY_SEARCHED, SYSTEM_CATEGORY_UPLOADED,
};
use crate::domain::DomainError;
use crate::error::{AppError, AppResult};
use crate::events::{CategoryCreated, CategoryDeleted, EventBus, MovieTagged};
use crate::repositories::CategoryRepository;

pub struct CategoryService {
    category_repo: Arc<dyn CategoryRepository>,
    event_bus: Arc<EventBus>,
}

impl CategoryService {
    pub fn new(category_repo: Arc<dyn CategoryRepository>, event_bus: Arc<EventBus>) -> Self {
        Self {
            category_repo,
            event_bus,
        }
    }

    /// Create the protected system categories if absent.
    /// Safe to call on every startup.
    pub fn ensure_system_categories(&self) -> AppResult<()> {
        for name in [SYSTEM_CATEGORY_SEARCHED, SYSTEM_CATEGORY_UPLOADED] {
            if self.category_repo.get_by_name(name)?.is_none() {
                let category = Category::system(name);
                self.category_repo.save(&category)?;
                self.event_bus.emit(CategoryCreated::new(
                    category.id,
                    category.name.clone(),
                    true,
                ));
                log::info!("created system category '{}'", name);
            }
        }
        Ok(())
    }

    pub fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.category_repo.list_all()
    }

    pub fn get_category(&self, id: Uuid) -> AppResult<Option<Category>> {
        self.category_repo.get_by_id(id)
    }

    /// Create a user category. The name must be non-blank and not taken
    /// (case-insensitively).
    pub fn create_category(&self, name: &str) -> AppResult<Category> {
        let category = Category::new(name.trim().to_string());
        validate_category(&category).map_err(AppError::Domain)?;

        if self.category_repo.get_by_name(&category.name)?.is_some() {
            return Err(AppError::Domain(DomainError::Duplicate(format!(
                "category '{}' already exists",
                category.name
            ))));
        }

        self.category_repo.save(&category)?;
        self.event_bus
            .emit(CategoryCreated::new(category.id, category.name.clone(), false));

        Ok(category)
    }

    /// Rename a user category; system categories are protected.
    pub fn rename_category(&self, id: Uuid, new_name: &str) -> AppResult<Category> {
        let mut category = self.category_repo.get_by_id(id)?.ok_or(AppError::NotFound)?;

        if category.is_system {
            return Err(AppError::Domain(DomainError::Protected(format!(
                "system category '{}' cannot be renamed",
                category.name
            ))));
        }

        let new_name = new_name.trim();
        if let Some(existing) = self.category_repo.get_by_name(new_name)? {
            if existing.id != id {
                return Err(AppError::Domain(DomainError::Duplicate(format!(
                    "category '{}' already exists",
                    new_name
                ))));
            }
        }

        category.rename(new_name.to_string());
        validate_category(&category).map_err(AppError::Domain)?;
        self.category_repo.save(&category)?;

        Ok(category)
    }

    /// Delete a user category and, via cascade, its movie links.
    pub fn delete_category(&self, id: Uuid) -> AppResult<()> {
        let category = self.category_repo.get_by_id(id)?.ok_or(AppError::NotFound)?;

        if category.is_system {
            return Err(AppError::Domain(DomainError::Protected(format!(
                "system category '{}' cannot be deleted",
                category.name
            ))));
        }

        self.category_repo.delete(id)?;
        self.event_bus.emit(CategoryDeleted::new(id));

        Ok(())
    }

    /// Tag a movie into a category. Idempotent.
    pub fn tag_movie(&self, imdb_id: &str, category_id: Uuid) -> AppResult<()> {
        if self.category_repo.get_by_id(category_id)?.is_none() {
            return Err(AppError::NotFound);
        }

        self.category_repo.link_movie(imdb_id, category_id)?;
        self.event_bus
            .emit(MovieTagged::new(imdb_id.to_string(), category_id));

        Ok(())
    }

    /// Remove a movie from a category. Removing an absent link is a no-op.
    pub fn untag_movie(&self, imdb_id: &str, category_id: Uuid) -> AppResult<()> {
        self.category_repo.unlink_movie(imdb_id, category_id)
    }

    pub fn movies_in_category(&self, category_id: Uuid) -> AppResult<Vec<String>> {
        self.category_repo.list_movies_in_category(category_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::create_test_pool;
    use crate::events::create_event_bus;
    use crate::repositories::SqliteCategoryRepository;

    fn service() -> (CategoryService, tempfile::TempDir) {
        let (pool, dir) = create_test_pool();
        let service = CategoryService::new(
            Arc::new(SqliteCategoryRepository::new(pool)),
            create_event_bus(),
        );
        (service, dir)
    }

    #[test]
    fn test_ensure_system_categories_runs_once() {
        let (service, _dir) = service();

        service.ensure_system_categories().unwrap();
        service.ensure_system_categories().unwrap();

        let categories = service.list_categories().unwrap();
        assert_eq!(categories.len(), 2);
        assert!(categories.iter().all(|c| c.is_system));
    }

    #[test]
    fn test_duplicate_name_rejected_case_insensitively() {
        let (service, _dir) = service();

        service.create_category("Sci-Fi Night").unwrap();
        let result = service.create_category("sci-fi night");

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Duplicate(_)))
        ));
    }

    #[test]
    fn test_blank_name_rejected() {
        let (service, _dir) = service();
        assert!(service.create_category("   ").is_err());
    }

    #[test]
    fn test_system_category_cannot_be_renamed_or_deleted() {
        let (service, _dir) = service();
        service.ensure_system_categories().unwrap();

        let searched = service
            .list_categories()
            .unwrap()
            .into_iter()
            .find(|c| c.name == SYSTEM_CATEGORY_SEARCHED)
            .unwrap();

        assert!(matches!(
            service.rename_category(searched.id, "Renamed"),
            Err(AppError::Domain(DomainError::Protected(_)))
        ));
        assert!(matches!(
            service.delete_category(searched.id),
            Err(AppError::Domain(DomainError::Protected(_)))
        ));
    }

    #[test]
    fn test_rename_to_own_name_is_allowed() {
        let (service, _dir) = service();

        let category = service.create_category("Picks").unwrap();
        let renamed = service.rename_category(category.id, "picks").unwrap();
        assert_eq!(renamed.name, "picks");
    }

    #[test]
    fn test_tag_unknown_category_is_not_found() {
        let (service, _dir) = service();

        assert!(matches!(
            service.tag_movie("tt0000001", Uuid::new_v4()),
            Err(AppError::NotFound)
        ));
    }
}
