//! # Asphalt Stream
//!
//! Chunk streaming for an unbounded, explorable world.
//!
//! The [`ChunkManager`] keeps a resident set of generated chunks converging
//! on the moving observer: it requests missing chunks from a background
//! [`GeneratorPool`], materializes arriving chunk data into renderer and
//! physics resources, and releases those resources when chunks drift out of
//! range. The manager never blocks — generation happens on worker threads
//! and results are drained at the start of each update tick.
//!
//! ## Architecture
//!
//! ```text
//!               requests (fire-and-forget)
//!  ChunkManager ───────────────────────────► GeneratorPool workers
//!       ▲                                          │
//!       └──────────────────────────────────────────┘
//!          results (out-of-order, possibly stale)
//! ```
//!
//! Renderer and physics are external collaborators reached only through the
//! [`Renderer`] and [`PhysicsWorld`] traits; the manager owns every handle
//! they return and is the only code that releases them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod manager;
pub mod materialize;
pub mod worker;

pub use manager::{ChunkManager, ChunkState, LoadedChunk, StreamConfig};
pub use materialize::{DrawableDesc, PhysicsWorld, Renderer};
pub use worker::{GenerationRequest, GeneratorPool};
