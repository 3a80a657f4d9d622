//! Chunk data model.
//!
//! [`ChunkData`] is the complete generation output for one grid cell: the
//! road grid, its intersections, building footprints, and the collision
//! primitives physics needs. It is a pure value — no resource handles, no
//! references to live state — so it can cross the worker boundary as a
//! message and be regenerated bit-for-bit from `(seed, coord)` at any time.

use asphalt_common::ChunkCoord;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Classification of a road segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoadClass {
    /// Major artery (even grid lines)
    Primary,
    /// Connector (odd grid lines)
    Secondary,
    /// Narrow local road
    Residential,
}

/// One road as an ordered polyline of 2D points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadSegment {
    /// Polyline vertices in world space (XZ plane)
    pub points: Vec<Vec2>,
    /// Road classification
    pub class: RoadClass,
}

/// A road crossing point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    /// Identifier, unique within its chunk
    pub id: u32,
    /// Position in world space (XZ plane)
    pub position: Vec2,
}

/// Functional classification of a building, driving its height range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingArchetype {
    /// Housing, low-rise
    Residential,
    /// Commercial towers, tallest
    Office,
    /// Warehouses and plants, flat and wide
    Industrial,
}

impl BuildingArchetype {
    /// Height range in world units for this archetype.
    #[must_use]
    pub const fn height_range(self) -> (f64, f64) {
        match self {
            Self::Residential => (8.0, 20.0),
            Self::Office => (20.0, 60.0),
            Self::Industrial => (6.0, 15.0),
        }
    }
}

/// A building footprint with height and archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Footprint polygon in world space (XZ plane), counter-clockwise
    pub footprint: Vec<Vec2>,
    /// Height in world units
    pub height: f32,
    /// Functional classification
    pub archetype: BuildingArchetype,
}

/// A collision shape in world space.
///
/// Tagged so materialization can match exhaustively on the shape kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CollisionPrimitive {
    /// Axis-aligned box (yaw rotates it about the vertical axis)
    Box {
        /// Center position
        center: Vec3,
        /// Half extents along each axis
        half_extents: Vec3,
        /// Rotation about the Y axis, radians
        yaw: f32,
    },
    /// Vertical capsule
    Capsule {
        /// Center position
        center: Vec3,
        /// Capsule radius
        radius: f32,
        /// Half the cylindrical length
        half_height: f32,
    },
}

/// Complete generation output for one chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkData {
    /// The chunk this data belongs to
    pub coord: ChunkCoord,
    /// Road polylines
    pub roads: Vec<RoadSegment>,
    /// Road crossings (may be empty)
    pub intersections: Vec<Intersection>,
    /// Building footprints
    pub buildings: Vec<Building>,
    /// Static collision shapes, one per building
    pub collision: Vec<CollisionPrimitive>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetype_height_ranges() {
        let (lo, hi) = BuildingArchetype::Office.height_range();
        assert!(lo < hi);
        assert_eq!(lo, 20.0);
        let (lo, _) = BuildingArchetype::Industrial.height_range();
        assert_eq!(lo, 6.0);
    }

    #[test]
    fn test_primitive_match_is_exhaustive() {
        let prim = CollisionPrimitive::Box {
            center: Vec3::ZERO,
            half_extents: Vec3::ONE,
            yaw: 0.0,
        };
        let kind = match prim {
            CollisionPrimitive::Box { .. } => "box",
            CollisionPrimitive::Capsule { .. } => "capsule",
        };
        assert_eq!(kind, "box");
    }
}
