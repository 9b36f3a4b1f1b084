//! Random number generator abstraction for determinism.
//!
//! In production, this wraps a real RNG. In tests, a seeded or scripted
//! implementation is injected.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Abstraction over random number generation.
pub trait DeterministicRng: Send + Sync {
    /// Generate a random `u32` in the range `[min, max]` inclusive.
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32;
}

/// Production RNG backed by `StdRng`.
#[derive(Debug, Clone)]
pub struct SystemRng {
    inner: StdRng,
}

impl SystemRng {
    /// Creates an RNG seeded from the operating system.
    #[must_use]
    pub fn from_os() -> Self {
        Self {
            inner: StdRng::from_os_rng(),
        }
    }

    /// Creates an RNG with a fixed seed, for reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl DeterministicRng for SystemRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        self.inner.random_range(min..=max)
    }
}
