//! Seeded random number streams.
//!
//! # Determinism strategy
//!
//! A world owns exactly two independent streams:
//!
//! - `main` drives everything that affects model results: shuffled
//!   iteration, random sampling, layout perturbation, path tie-breaking.
//! - `aux` serves everything else (UI-facing choices, diagnostics).  Drawing
//!   from `aux` never shifts the `main` sequence.
//!
//! Both wrap `ChaCha8Rng`, whose output is specified independently of
//! platform and pointer width, so the same seed replays the same run on any
//! machine.  The integer draw `next_int(n)` is the primitive every sampling
//! algorithm in the engine is written against; keep call order stable when
//! touching those algorithms.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// 64-bit fractional golden-ratio constant used to derive the `aux` seed
/// when none is given.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── WorldRng ──────────────────────────────────────────────────────────────────

/// A single deterministic random stream.
#[derive(Clone, Debug)]
pub struct WorldRng {
    rng:  ChaCha8Rng,
    seed: u64,
}

impl WorldRng {
    pub fn new(seed: u64) -> Self {
        WorldRng { rng: ChaCha8Rng::seed_from_u64(seed), seed }
    }

    /// The seed this stream was last (re)seeded with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Restart the stream from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        *self = WorldRng::new(seed);
    }

    /// Expose the inner generator for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Uniform integer in `0..n`.  Returns 0 when `n == 0` without
    /// consuming a draw.
    #[inline]
    pub fn next_int(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Uniform `f64` in `[0, 1)`.
    #[inline]
    pub fn next_double(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn next_bool(&mut self, p: f64) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.rng.gen_range(range)
    }

    /// Fisher-Yates shuffle written against `next_int`, front to back, so
    /// the draw sequence matches the agent-set shufflerator.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        let len = slice.len();
        for i in 0..len.saturating_sub(1) {
            let r = i + self.next_int(len - i);
            slice.swap(i, r);
        }
    }

    /// Choose a random element of a slice.  Returns `None` if it is empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            return None;
        }
        slice.get(self.next_int(slice.len()))
    }
}

// ── RngStreams ────────────────────────────────────────────────────────────────

/// The two streams a world owns.
#[derive(Clone, Debug)]
pub struct RngStreams {
    pub main: WorldRng,
    pub aux:  WorldRng,
}

impl RngStreams {
    /// Seed both streams.  When `aux_seed` is `None` it is derived from
    /// `seed` so that the streams still differ.
    pub fn new(seed: u64, aux_seed: Option<u64>) -> Self {
        let aux = aux_seed.unwrap_or_else(|| seed ^ MIXING_CONSTANT);
        RngStreams { main: WorldRng::new(seed), aux: WorldRng::new(aux) }
    }
}
