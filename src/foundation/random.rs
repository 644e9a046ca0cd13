//! Random sources feeding the wave generator.
//!
//! Every source yields uniform values in `[0, 1)`. [`SeededRandom`] reproduces the same
//! sequence for the same seed string, which is what makes seeded waves stable across reloads.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform random values in `[0, 1)`.
pub trait WaveRandom {
    /// Next value in `[0, 1)`.
    fn next_f64(&mut self) -> f64;
}

/// Deterministic source derived from a seed string (Mulberry32).
#[derive(Clone, Copy, Debug)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    const INCREMENT: u32 = 0x6D2B_79F5;

    /// Fold `seed` into the initial state.
    ///
    /// The fold walks UTF-16 code units with `hash = hash * 31 + unit`, wrapping at 32 bits,
    /// so seeds hash the same way a browser would hash them.
    pub fn new(seed: &str) -> Self {
        let hash = seed
            .encode_utf16()
            .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
        Self {
            state: hash as u32,
        }
    }

    /// Current internal state.
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Next raw 32-bit output.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(Self::INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }
}

impl WaveRandom for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}

/// Non-deterministic source for unseeded waves, backed by an OS-seeded [`StdRng`].
#[derive(Clone, Debug)]
pub struct ThreadRandom {
    rng: StdRng,
}

impl ThreadRandom {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible instance, for tooling that wants "random-looking" but repeatable output.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl WaveRandom for ThreadRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Source that always returns the same value. Handy for flat or extreme waves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedRandom(f64);

impl FixedRandom {
    /// Constant source; the value is clamped into `[0, 1)`.
    pub fn new(value: f64) -> Self {
        let v = if value.is_finite() { value } else { 0.0 };
        Self(v.clamp(0.0, 1.0 - f64::EPSILON))
    }
}

impl WaveRandom for FixedRandom {
    fn next_f64(&mut self) -> f64 {
        self.0
    }
}

impl<R: WaveRandom + ?Sized> WaveRandom for Box<R> {
    fn next_f64(&mut self) -> f64 {
        (**self).next_f64()
    }
}

/// Random source for an optional seed: seeded when the seed has visible characters,
/// thread-random otherwise.
pub fn random_for_seed(seed: Option<&str>) -> Box<dyn WaveRandom> {
    match seed {
        Some(s) if !s.trim().is_empty() => Box::new(SeededRandom::new(s)),
        _ => Box::new(ThreadRandom::new()),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/random.rs"]
mod tests;
