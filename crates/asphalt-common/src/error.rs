//! Error types for Asphalt.

use thiserror::Error;

/// Top-level error type for Asphalt operations.
#[derive(Debug, Error)]
pub enum AsphaltError {
    /// Materialization errors (renderer/physics collaborators)
    #[error("materialize error: {0}")]
    Materialize(#[from] MaterializeError),

    /// World/chunk errors
    #[error("world error: {0}")]
    World(#[from] WorldError),

    /// The generation worker pool has shut down and accepts no requests
    #[error("generation worker pool is unavailable")]
    WorkerUnavailable,

    /// IO errors (worker thread spawning)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the external renderer/physics collaborators while
/// turning chunk data into live resources.
///
/// These are always scoped to a single chunk; the streaming core logs them
/// and leaves that chunk un-materialized rather than aborting the cache.
#[derive(Debug, Error)]
pub enum MaterializeError {
    /// The renderer failed to create a drawable
    #[error("drawable creation failed: {0}")]
    Drawable(String),

    /// The physics world failed to create a collider
    #[error("collider creation failed: {0}")]
    Collider(String),
}

/// World and chunk lookup errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// Chunk is not in the resident set
    #[error("chunk not resident at ({x}, {y})")]
    ChunkNotResident {
        /// X coordinate
        x: i32,
        /// Y coordinate
        y: i32,
    },
}

/// Result type alias for Asphalt operations.
pub type AsphaltResult<T> = Result<T, AsphaltError>;
