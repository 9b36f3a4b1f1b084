//! Shared test mocks and utilities for the CourseHub catalog service.

mod clock;
mod fixtures;
mod repository;
mod rng;

pub use clock::FixedClock;
pub use fixtures::{course, review};
pub use repository::{FailingCategoryRepository, InMemoryCategoryRepository, RepositoryCalls};
pub use rng::{MockRng, SequenceRng};
