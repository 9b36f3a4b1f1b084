//! CourseHub Core — shared domain abstractions.
//!
//! This crate defines the catalog records, the store seam, and the clock and
//! RNG abstractions that the catalog context and its adapters depend on. It
//! contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod model;
pub mod repository;
pub mod rng;
