//! Interfaces to the external renderer and physics collaborators.
//!
//! The streaming core does not draw or simulate anything itself. When a
//! chunk becomes resident it hands geometry descriptions to a [`Renderer`]
//! and collision primitives to a [`PhysicsWorld`], keeps the opaque handles
//! they return, and gives the handles back on eviction. Collaborators must
//! not mutate manager state; they only create and remove their own
//! resources.

use asphalt_common::{ColliderHandle, DrawableHandle, MaterializeError};
use asphalt_worldgen::{Building, CollisionPrimitive, RoadSegment};
use glam::Vec2;

/// Geometry description handed to the renderer, one drawable each.
#[derive(Debug, Clone, Copy)]
pub enum DrawableDesc<'a> {
    /// The chunk's ground quad
    Ground {
        /// World-space min corner
        origin: Vec2,
        /// Edge length
        size: f32,
    },
    /// One road polyline
    Road(&'a RoadSegment),
    /// One building (footprint extruded to its height)
    Building(&'a Building),
}

/// Rendering collaborator: turns geometry descriptions into drawables.
///
/// Creation may fail under resource exhaustion; the streaming core treats
/// that as fatal to the single chunk being materialized, never to the
/// cache. Removal is infallible: a handle previously returned from
/// `create_drawable` must always be removable.
pub trait Renderer {
    /// Creates a drawable and returns its handle.
    fn create_drawable(&mut self, desc: &DrawableDesc<'_>)
        -> Result<DrawableHandle, MaterializeError>;

    /// Removes a drawable by handle.
    fn remove_drawable(&mut self, handle: DrawableHandle);
}

/// Physics collaborator: turns collision primitives into static bodies.
pub trait PhysicsWorld {
    /// Creates a static collider and returns its handle.
    fn create_static_collider(
        &mut self,
        primitive: &CollisionPrimitive,
    ) -> Result<ColliderHandle, MaterializeError>;

    /// Removes a collider by handle.
    fn remove_collider(&mut self, handle: ColliderHandle);
}
