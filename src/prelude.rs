//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the crate.
//! Users can import everything they need with:
//!
//! ```
//! use kdtree::prelude::*;
//! ```

pub use crate::geometry::{Point, PositionedEntity, Vector};
pub use crate::{KdTree, KdTreeError, Neighbor, TreeConfig};
pub use glam::{DVec2, DVec3, Vec2, Vec3};
