//! # Asphalt Worldgen
//!
//! Deterministic procedural generation of city chunks.
//!
//! Every chunk of the world grid is generated from nothing but the global
//! world seed and its own grid coordinate: a per-chunk hash seeds a
//! Mulberry32 stream, which lays out a road grid, carves city blocks, and
//! places building footprints with matching collision boxes. Generation is
//! a pure function, so the same `(seed, coord)` pair always reproduces a
//! bit-identical chunk regardless of generation order or which thread runs
//! it.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod chunk;
pub mod generator;
pub mod hash;
pub mod rng;

pub use chunk::{
    Building, BuildingArchetype, ChunkData, CollisionPrimitive, Intersection, RoadClass,
    RoadSegment,
};
pub use generator::{generate, GenerationParams};
pub use hash::{block_noise, chunk_hash};
pub use rng::ChunkRng;
