//! Seeded random selection shared by the sampler and the edition pool

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Seeded random selector for reproducible stochastic choices
pub struct RandomSelector {
    rng: StdRng,
}

impl RandomSelector {
    /// Create a deterministic random selector
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Integer-weighted random selection
    ///
    /// Draws `r` uniformly from `[0, total)` and walks the weights subtracting
    /// each one until `r` goes negative. Returns `None` when the total is zero.
    pub fn weighted_index(&mut self, weights: &[u32]) -> Option<usize> {
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            return None;
        }

        let mut remaining = self.rng.random_range(0..total) as i64;
        for (i, &weight) in weights.iter().enumerate() {
            remaining -= i64::from(weight);
            if remaining < 0 {
                return Some(i);
            }
        }
        weights.len().checked_sub(1)
    }

    /// Uniform index in `0..len`, `None` for an empty range
    pub fn uniform_index(&mut self, len: usize) -> Option<usize> {
        (len > 0).then(|| self.rng.random_range(0..len))
    }

    /// Uniform value in `0.0..1.0`
    pub fn unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    /// In-place Fisher-Yates shuffle
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for current in (1..items.len()).rev() {
            let other = self.rng.random_range(0..=current);
            items.swap(current, other);
        }
    }
}
