//! CourseHub Store — PostgreSQL adapter for the category store.
//!
//! The schema lives in the workspace `migrations/` directory and is applied
//! with `sqlx::migrate!` by the API server and by `#[sqlx::test]`.

pub mod pg_category_repository;
