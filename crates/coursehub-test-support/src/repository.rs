//! Test repositories — mock `CategoryRepository` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use coursehub_core::error::DomainError;
use coursehub_core::model::{
    Category, Course, CoursePopulation, RatingAndReview, RatingAndReviews,
};
use coursehub_core::repository::CategoryRepository;
use uuid::Uuid;

/// Number of times each repository method was invoked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepositoryCalls {
    /// `find_by_id` calls.
    pub find_by_id: usize,
    /// `find_by_name` calls.
    pub find_by_name: usize,
    /// `insert` calls.
    pub insert: usize,
    /// `list` calls.
    pub list: usize,
    /// `list_except` calls.
    pub list_except: usize,
    /// `resolve_courses` calls.
    pub resolve_courses: usize,
}

#[derive(Debug, Default)]
struct Catalog {
    categories: Vec<Category>,
    courses: HashMap<Uuid, Course>,
    reviews: HashMap<Uuid, Vec<RatingAndReview>>,
}

/// An in-memory category store that behaves like the PostgreSQL adapter:
/// unique names, ordered course references, filtered population. Every call
/// is counted so tests can assert which lookups a handler performed.
#[derive(Debug, Default)]
pub struct InMemoryCategoryRepository {
    catalog: Mutex<Catalog>,
    calls: Mutex<RepositoryCalls>,
}

impl InMemoryCategoryRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a category with no courses and return its id. Seeded categories
    /// get strictly increasing creation times.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn add_category(&self, name: &str) -> Uuid {
        let mut catalog = self.catalog.lock().unwrap();
        let offset = i64::try_from(catalog.categories.len()).unwrap();
        let created_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
            + Duration::seconds(offset);
        let id = Uuid::new_v4();
        catalog.categories.push(Category::new(
            id,
            name.to_owned(),
            Some(format!("{name} courses")),
            created_at,
        ));
        id
    }

    /// Seed a course and append a reference to it on `category_id`.
    ///
    /// # Panics
    ///
    /// Panics if the category was not seeded or the mutex is poisoned.
    pub fn add_course(&self, category_id: Uuid, course: Course) -> Uuid {
        let mut catalog = self.catalog.lock().unwrap();
        let course_id = course.id;
        catalog
            .categories
            .iter_mut()
            .find(|category| category.id == category_id)
            .expect("add_course requires a seeded category")
            .course_ids
            .push(course_id);
        catalog.courses.insert(course_id, course);
        course_id
    }

    /// Seed a review of an already seeded course.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn add_review(&self, review: RatingAndReview) {
        self.catalog
            .lock()
            .unwrap()
            .reviews
            .entry(review.course_id)
            .or_default()
            .push(review);
    }

    /// Returns a snapshot of every stored category.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn categories(&self) -> Vec<Category> {
        self.catalog.lock().unwrap().categories.clone()
    }

    /// Returns how often each method has been called so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> RepositoryCalls {
        *self.calls.lock().unwrap()
    }

    fn record(&self, bump: impl FnOnce(&mut RepositoryCalls)) {
        bump(&mut self.calls.lock().unwrap());
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_id(&self, category_id: Uuid) -> Result<Option<Category>, DomainError> {
        self.record(|calls| calls.find_by_id += 1);
        let catalog = self.catalog.lock().unwrap();
        Ok(catalog
            .categories
            .iter()
            .find(|category| category.id == category_id)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, DomainError> {
        self.record(|calls| calls.find_by_name += 1);
        let catalog = self.catalog.lock().unwrap();
        Ok(catalog
            .categories
            .iter()
            .find(|category| category.name == name)
            .cloned())
    }

    async fn insert(&self, category: &Category) -> Result<Category, DomainError> {
        self.record(|calls| calls.insert += 1);
        let mut catalog = self.catalog.lock().unwrap();
        if catalog
            .categories
            .iter()
            .any(|existing| existing.name == category.name)
        {
            return Err(DomainError::Infrastructure(
                "duplicate key value violates unique constraint \"categories_name_key\"".into(),
            ));
        }
        catalog.categories.push(category.clone());
        Ok(category.clone())
    }

    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        self.record(|calls| calls.list += 1);
        Ok(self.catalog.lock().unwrap().categories.clone())
    }

    async fn list_except(&self, category_id: Uuid) -> Result<Vec<Category>, DomainError> {
        self.record(|calls| calls.list_except += 1);
        let catalog = self.catalog.lock().unwrap();
        Ok(catalog
            .categories
            .iter()
            .filter(|category| category.id != category_id)
            .cloned()
            .collect())
    }

    async fn resolve_courses(
        &self,
        category_id: Uuid,
        population: CoursePopulation,
    ) -> Result<Vec<Course>, DomainError> {
        self.record(|calls| calls.resolve_courses += 1);
        let catalog = self.catalog.lock().unwrap();
        let Some(category) = catalog
            .categories
            .iter()
            .find(|category| category.id == category_id)
        else {
            return Ok(Vec::new());
        };

        let courses = category
            .course_ids
            .iter()
            .filter_map(|course_id| catalog.courses.get(course_id))
            .filter(|course| population.admits(course.status))
            .map(|course| {
                let reviews = catalog.reviews.get(&course.id).cloned().unwrap_or_default();
                let rating_and_reviews = if population.include_reviews {
                    RatingAndReviews::Resolved(reviews)
                } else {
                    RatingAndReviews::Ids(reviews.iter().map(|review| review.id).collect())
                };
                Course {
                    rating_and_reviews,
                    ..course.clone()
                }
            })
            .collect();
        Ok(courses)
    }
}

/// A category repository that always returns an infrastructure error. Useful
/// for testing error-handling paths.
#[derive(Debug)]
pub struct FailingCategoryRepository;

#[async_trait]
impl CategoryRepository for FailingCategoryRepository {
    async fn find_by_id(&self, _category_id: Uuid) -> Result<Option<Category>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn find_by_name(&self, _name: &str) -> Result<Option<Category>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn insert(&self, _category: &Category) -> Result<Category, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn list_except(&self, _category_id: Uuid) -> Result<Vec<Category>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn resolve_courses(
        &self,
        _category_id: Uuid,
        _population: CoursePopulation,
    ) -> Result<Vec<Course>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}

#[cfg(test)]
mod tests {
    use coursehub_core::model::CourseStatus;

    use super::*;
    use crate::fixtures::{course, review};

    #[tokio::test]
    async fn test_resolve_courses_filters_by_status_and_keeps_order() {
        let repo = InMemoryCategoryRepository::new();
        let category_id = repo.add_category("Web");
        let first = repo.add_course(category_id, course("HTML", CourseStatus::Published, 3));
        repo.add_course(category_id, course("CSS", CourseStatus::Draft, 9));
        let third = repo.add_course(category_id, course("JS", CourseStatus::Published, 1));

        let courses = repo
            .resolve_courses(category_id, CoursePopulation::published())
            .await
            .unwrap();

        let ids: Vec<Uuid> = courses.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![first, third]);
    }

    #[tokio::test]
    async fn test_resolve_courses_resolves_reviews_on_request() {
        let repo = InMemoryCategoryRepository::new();
        let category_id = repo.add_category("Web");
        let course_id = repo.add_course(category_id, course("HTML", CourseStatus::Published, 3));
        let seeded = review(course_id);
        repo.add_review(seeded.clone());

        let bare = repo
            .resolve_courses(category_id, CoursePopulation::all())
            .await
            .unwrap();
        let resolved = repo
            .resolve_courses(category_id, CoursePopulation::all().with_reviews())
            .await
            .unwrap();

        assert_eq!(bare[0].rating_and_reviews, RatingAndReviews::Ids(vec![seeded.id]));
        assert_eq!(resolved[0].rating_and_reviews, RatingAndReviews::Resolved(vec![seeded]));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_name() {
        let repo = InMemoryCategoryRepository::new();
        repo.add_category("General");
        let duplicate = Category::new(Uuid::new_v4(), "General".to_owned(), None, Utc::now());

        let result = repo.insert(&duplicate).await;

        assert!(matches!(result, Err(DomainError::Infrastructure(_))));
        assert_eq!(repo.categories().len(), 1);
        assert_eq!(repo.calls().insert, 1);
    }
}
