//! Seeded RNG for the synthetic data providers and sensor placement.
//!
//! # Determinism strategy
//!
//! Everything random in this workspace happens once, at startup: generating
//! a mock flow dataset or scattering sensors over the graph.  Both draw from a
//! `DataRng` derived from the configured seed, so two processes started with
//! the same seed produce byte-identical mock data.  Each consumer owns a
//! numbered stream:
//!
//!   stream_seed = seed XOR (stream * MIXING_CONSTANT)
//!
//! Stream seeds depend only on the configured seed and the stream number, so
//! draws on one stream never shift the values another one sees.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

pub struct DataRng(SmallRng);

impl DataRng {
    pub fn new(seed: u64) -> Self {
        DataRng(SmallRng::seed_from_u64(seed))
    }

    /// Stream `stream` of `seed`.  Stream 0 is the same as `new(seed)`.
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        Self::new(seed ^ stream.wrapping_mul(MIXING_CONSTANT))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
