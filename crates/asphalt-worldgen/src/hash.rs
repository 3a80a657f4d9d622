//! Per-chunk seed derivation.
//!
//! [`chunk_hash`] folds a world seed and a chunk coordinate into a single
//! `u32`. The exact bit pattern is load-bearing: worlds already built on
//! this scheme must keep reproducing the same chunks, so the constants and
//! operation order here must not change.

/// Derives the per-chunk 32-bit seed from the world seed and chunk
/// coordinates.
///
/// Pure and total. Negative coordinates participate as their 32-bit
/// two's-complement bit pattern; the right shift is logical (no sign
/// extension).
#[must_use]
pub fn chunk_hash(world_seed: u32, chunk_x: i32, chunk_y: i32) -> u32 {
    let mut h = world_seed;
    h = (h ^ chunk_x as u32).wrapping_mul(0x85eb_ca6b);
    h = (h ^ chunk_y as u32).wrapping_mul(0xc2b2_ae35);
    h ^ (h >> 13)
}

/// Continuous 2D noise in `[0, 1)` from a sinusoidal hash.
///
/// Used for spatial classification (block archetypes) where the value must
/// depend only on position, not on how many values the chunk's RNG stream
/// has already produced.
#[must_use]
pub fn block_noise(seed: u32, x: f64, y: f64) -> f64 {
    let s = (x * 12.9898 + y * 78.233 + f64::from(seed)).sin() * 43758.5453;
    s - s.floor()
}
