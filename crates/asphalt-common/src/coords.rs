//! Coordinate types for the chunk grid.
//!
//! The world is an infinite grid of square chunks of edge length
//! [`CHUNK_SIZE`]. A [`ChunkCoord`] identifies one cell; the observer moves
//! in continuous world space (`glam::Vec3`, Y-up) and is mapped onto the
//! grid via its XZ components.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Edge length of one chunk in world-distance units.
pub const CHUNK_SIZE: f32 = 256.0;

/// Chunk coordinate (identifies a cell in the infinite world grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    /// X coordinate in chunk space
    pub x: i32,
    /// Y coordinate in chunk space (world Z axis)
    pub y: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Maps a world-space position onto the chunk grid.
    ///
    /// Uses the XZ plane of the position; Y (height) is ignored.
    #[must_use]
    pub fn from_world(pos: Vec3, chunk_size: f32) -> Self {
        Self {
            x: (pos.x / chunk_size).floor() as i32,
            y: (pos.z / chunk_size).floor() as i32,
        }
    }

    /// Returns the world-space origin (min corner) of this chunk.
    #[must_use]
    pub fn world_origin(self, chunk_size: f32) -> Vec2 {
        Vec2::new(
            (f64::from(self.x) * f64::from(chunk_size)) as f32,
            (f64::from(self.y) * f64::from(chunk_size)) as f32,
        )
    }

    /// Canonical string key, `"x,y"` with no leading zeros.
    #[must_use]
    pub fn key(self) -> String {
        format!("{},{}", self.x, self.y)
    }

    /// Chebyshev (chessboard) distance to another chunk, in grid units.
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> i32 {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx.max(dy)
    }

    /// Squared Euclidean distance to another chunk, in grid units.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        dx * dx + dy * dy
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}
