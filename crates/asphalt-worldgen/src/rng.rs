//! Deterministic per-chunk random number generation.
//!
//! A Mulberry32-derived generator with one `u32` of state. Every derived
//! operation consumes exactly one [`ChunkRng::next`] call, so a fixed call
//! sequence against a fixed seed reproduces the same numeric sequence on
//! every run — the ordering guarantee chunk generation relies on.

/// Mulberry32 pseudo-random generator, seeded per chunk.
#[derive(Debug, Clone)]
pub struct ChunkRng {
    state: u32,
}

impl ChunkRng {
    /// Creates a generator from a 32-bit seed (normally a chunk hash).
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Returns the next value in `[0, 1)`.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x6d2b_79f5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= (t ^ (t >> 7)).wrapping_mul(t | 61);
        f64::from(t ^ (t >> 14)) / 4_294_967_296.0
    }

    /// Returns an integer in the half-open range `[min, max)`.
    pub fn next_int(&mut self, min: i32, max: i32) -> i32 {
        (self.next() * f64::from(max - min)).floor() as i32 + min
    }

    /// Returns a float in `[min, max)`.
    pub fn next_float(&mut self, min: f64, max: f64) -> f64 {
        self.next() * (max - min) + min
    }

    /// Returns a uniformly distributed boolean.
    pub fn next_bool(&mut self) -> bool {
        self.next() < 0.5
    }
}
