//! Category store abstraction.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::DomainError;
use crate::model::{Category, Course, CoursePopulation};

/// Repository trait for reading and creating catalog categories.
///
/// Listing methods return categories in store order (creation time, then id).
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Load a category by identifier.
    async fn find_by_id(&self, category_id: Uuid) -> Result<Option<Category>, DomainError>;

    /// Load a category by its exact name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, DomainError>;

    /// Persist a new category and return the stored record.
    /// A duplicate name is reported as `DomainError::Infrastructure`.
    async fn insert(&self, category: &Category) -> Result<Category, DomainError>;

    /// Load every category.
    async fn list(&self) -> Result<Vec<Category>, DomainError>;

    /// Load every category except the one with `category_id`.
    async fn list_except(&self, category_id: Uuid) -> Result<Vec<Category>, DomainError>;

    /// Resolve a category's course references in their stored order,
    /// keeping only the courses admitted by `population`.
    async fn resolve_courses(
        &self,
        category_id: Uuid,
        population: CoursePopulation,
    ) -> Result<Vec<Course>, DomainError>;
}
