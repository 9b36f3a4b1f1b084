//! Shared application state.

use std::sync::{Arc, Mutex};

use coursehub_core::clock::Clock;
use coursehub_core::repository::CategoryRepository;
use coursehub_core::rng::DeterministicRng;

/// Application state shared across all request handlers.
///
/// The database pool is owned by the repository; handlers never reach the
/// store except through `category_repository`.
#[derive(Clone)]
pub struct AppState {
    /// Source of creation timestamps.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// RNG used to draw the peer category on landing pages.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Category store.
    pub category_repository: Arc<dyn CategoryRepository>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock + Send + Sync>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        category_repository: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            clock,
            rng,
            category_repository,
        }
    }
}
