//! CourseHub — Catalog bounded context.
//!
//! Responsible for creating categories, listing them with their courses,
//! and assembling a category's landing page.

pub mod application;
pub mod domain;
