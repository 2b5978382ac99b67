//! Seeded run context. Every random stream of a build derives from one seed.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Master seed plus the per-stage streams derived from it.
///
/// Stages draw from separate generators: changing how many questions are
/// attempted leaves the simulated scenes untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunContext {
    seed: u64,
}

impl RunContext {
    /// Creates a context for `seed`. Seed 0 draws one from the wall clock.
    pub fn new(seed: u64) -> Self {
        let seed = if seed == 0 { clock_seed() } else { seed };
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Stream used to simulate videos.
    pub fn scene_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }

    /// Stream used for question generation.
    pub fn question_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed.wrapping_mul(0x9e3779b97f4a7c15))
    }

    /// Stream used to shuffle and split the dataset.
    pub fn split_rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed.wrapping_mul(0x517cc1b727220a95) ^ 0x5)
    }
}

fn clock_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1);
    nanos.max(1)
}
