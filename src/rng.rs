//! Deterministic random number generation.
//!
//! A single seeded stream drives the whole run; within a tick the draw order
//! is fixed (female deaths, male deaths, hatch sex rolls, lay rolls), so one
//! seed fully determines the trajectory.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub struct SimRng {
    inner: ChaCha8Rng,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform integer in [1, 10000], compared against the death threshold.
    pub fn death_roll(&mut self) -> u32 {
        self.inner.gen_range(1..=10_000)
    }

    /// Uniform float in [0, 1), compared against the male probability.
    pub fn sex_roll(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Uniform integer in [1, 100], compared against the fertility rate.
    pub fn lay_roll(&mut self) -> u32 {
        self.inner.gen_range(1..=100)
    }
}
