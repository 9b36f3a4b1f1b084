//! Test RNG — deterministic `DeterministicRng` implementations for tests.

use coursehub_core::rng::DeterministicRng;

/// A no-op RNG that always returns `min`. Suitable for tests that do not
/// depend on specific random values.
#[derive(Debug)]
pub struct MockRng;

impl DeterministicRng for MockRng {
    fn next_u32_range(&mut self, min: u32, _max: u32) -> u32 {
        min
    }
}

/// An RNG that returns values from a predetermined sequence. Panics if the
/// sequence is exhausted. Used in tests that need a specific peer category
/// to be drawn.
#[derive(Debug)]
pub struct SequenceRng {
    values: Vec<u32>,
    index: usize,
    ranges: Vec<(u32, u32)>,
}

impl SequenceRng {
    /// Create a new `SequenceRng` with the given values.
    #[must_use]
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            values,
            index: 0,
            ranges: Vec::new(),
        }
    }

    /// Returns every `(min, max)` range that was requested, in call order.
    #[must_use]
    pub fn requested_ranges(&self) -> &[(u32, u32)] {
        &self.ranges
    }
}

impl DeterministicRng for SequenceRng {
    fn next_u32_range(&mut self, min: u32, max: u32) -> u32 {
        self.ranges.push((min, max));
        let val = self.values[self.index];
        self.index += 1;
        val
    }
}
