//! Opaque resource handle types.
//!
//! External collaborators (renderer, physics world) return these when the
//! streaming core materializes chunk content. The core owns every handle it
//! is given and is the only code permitted to release it; collaborators
//! choose the numbering scheme and the core never interprets the value.

use serde::{Deserialize, Serialize};

/// Handle to a drawable object owned by the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrawableHandle(pub u64);

/// Handle to a static collider owned by the physics collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColliderHandle(pub u64);

impl std::fmt::Display for DrawableHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "drawable#{}", self.0)
    }
}

impl std::fmt::Display for ColliderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "collider#{}", self.0)
    }
}
