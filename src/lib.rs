//! # KdTree - Static KD-tree Spatial Index
//!
//! A Rust library providing a static KD-tree for k-nearest-neighbor queries
//! over positioned entities in two or three dimensions.
//!
//! ## Features
//!
//! - **Median Splits**: Each level splits at the median of the widest axis, found with
//!   Floyd-Rivest selection instead of a full sort
//! - **Tight Bounds**: Every node keeps the bounding box of its own entities for pruning
//! - **Bounded Search**: Up to `max_count` neighbors within a linear radius
//! - **Filtered Search**: Exclude entities or supply custom distances per query
//! - **Concurrent Queries**: The tree is immutable once built and can be shared across threads
//! - **Parallel Build**: Optional rayon-backed construction (`parallel` feature)
//!
//! ## Quick Start
//!
//! ```rust
//! use kdtree::prelude::*;
//!
//! // Any type implementing PositionedEntity can be indexed; tuples carry a payload
//! let cities = vec![
//!     (Vec2::new(0.0, 0.0), "origin"),
//!     (Vec2::new(1.0, 1.0), "north-east"),
//!     (Vec2::new(5.0, 5.0), "far"),
//!     (Vec2::new(-1.0, 0.5), "west"),
//! ];
//!
//! // Leaves hold fewer than max_children entities
//! let tree = KdTree::build(cities, 2).unwrap();
//!
//! // The two closest entities within a radius of 2.0, closest first
//! let found = tree.nearest_sorted(Vec2::new(0.2, 0.1), 2, 2.0).unwrap();
//! let names: Vec<&str> = found.iter().map(|n| n.item.1).collect();
//! assert_eq!(names, vec!["origin", "north-east"]);
//!
//! // Distances are squared Euclidean
//! assert!((found[0].distance - 0.05).abs() < 1e-6);
//! ```
//!
//! ## How It Works
//!
//! Construction recursively partitions the entities: the widest axis of the
//! current box is chosen, the median entity along it is selected in linear
//! time and the range is cut in two halves. Ranges smaller than `max_children`
//! become leaves.
//!
//! A query walks the tree depth-first with an explicit stack, visiting the
//! child on the query's side of each split first. Candidates are kept in a
//! bounded accumulator; once it is full, any node whose box lies farther than
//! the current worst candidate is skipped.

pub mod accumulator;
pub mod bounds;
pub mod config;
pub mod error;
pub mod geometry;
pub mod heap;
pub mod kdtree;
pub mod prelude;
pub mod queries;
pub mod select;

#[cfg(test)]
mod component_tests;

pub use accumulator::{Candidates, Neighbor};
pub use bounds::BoundingBox;
pub use config::TreeConfig;
pub use error::{KdTreeError, Result};
pub use geometry::{Axis, Axis2, Axis3, Mask, Point, PositionedEntity, Vector};
pub use kdtree::{KdTree, LeafView, TreeStats};
pub use queries::Found;

pub use glam;
