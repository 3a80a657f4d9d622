//! # Asphalt Common
//!
//! Common types, utilities, and shared abstractions for Asphalt.
//!
//! This crate provides foundational types used across all Asphalt subsystems:
//! - Chunk-grid coordinate types
//! - Opaque resource handle types
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_chunk_coord_from_world() {
        let coord = ChunkCoord::from_world(Vec3::new(100.0, 5.0, 200.0), CHUNK_SIZE);
        assert_eq!(coord, ChunkCoord::new(0, 0));

        let coord = ChunkCoord::from_world(Vec3::new(256.0, 0.0, 512.0), CHUNK_SIZE);
        assert_eq!(coord, ChunkCoord::new(1, 2));
    }

    #[test]
    fn test_handle_identity() {
        let a = DrawableHandle(1);
        let b = DrawableHandle(1);
        assert_eq!(a, b);
        assert_ne!(a, DrawableHandle(2));
    }
}
