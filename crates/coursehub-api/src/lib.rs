//! CourseHub API — axum HTTP surface for the catalog service.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod telemetry;
