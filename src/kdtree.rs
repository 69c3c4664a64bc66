//! KD-tree construction.
//!
//! The tree is built top-down. Each level splits its entities at the median
//! of the widest axis of its bounding box, using [`select`] so that only the
//! median has to be found rather than the whole range sorted. Children get
//! tight boxes recomputed from their own entities, which is what keeps the
//! search's box pruning effective.

use std::cmp::Ordering;
use std::time::Instant;

use crate::bounds::BoundingBox;
use crate::config::{DEFAULT_MAX_CHILDREN, TreeConfig};
use crate::error::{KdTreeError, Result};
use crate::geometry::{Point, PositionedEntity};
use crate::select::select;

/// Scalar type of an entity's coordinates.
pub type ScalarOf<T> = <<T as PositionedEntity>::Point as Point>::Scalar;

/// Axis type of an entity's coordinate system.
pub type AxisOf<T> = <<T as PositionedEntity>::Point as Point>::Axis;

/// A node of the tree. Interior nodes own both children.
#[derive(Clone, Debug)]
pub(crate) enum Node<T: PositionedEntity> {
    Leaf {
        entities: Vec<T>,
        bounds: BoundingBox<T::Point>,
    },
    Interior {
        axis: AxisOf<T>,
        value: ScalarOf<T>,
        left: Box<Self>,
        right: Box<Self>,
        bounds: BoundingBox<T::Point>,
    },
}

impl<T: PositionedEntity> Node<T> {
    pub(crate) fn bounds(&self) -> &BoundingBox<T::Point> {
        match self {
            Self::Leaf { bounds, .. } | Self::Interior { bounds, .. } => bounds,
        }
    }
}

/// Static KD-tree over a collection of positioned entities.
///
/// The tree owns its entities and is immutable once built, so any number of
/// threads can query it concurrently through a shared reference.
///
/// Leaves hold fewer than `max_children` entities. Interior nodes split at
/// the median coordinate of the widest axis of their box; the left child gets
/// the lower half of the entities and the right child the upper half.
#[derive(Clone, Debug)]
pub struct KdTree<T: PositionedEntity> {
    pub(crate) root: Node<T>,
    len: usize,
    max_children: usize,
}

impl<T: PositionedEntity> KdTree<T> {
    /// Builds a tree with the default leaf size.
    ///
    /// # Errors
    ///
    /// See [`KdTree::build`].
    pub fn new(entities: Vec<T>) -> Result<Self> {
        Self::build(entities, DEFAULT_MAX_CHILDREN)
    }

    /// Builds a tree whose leaves hold fewer than `max_children` entities.
    ///
    /// # Errors
    ///
    /// Returns [`KdTreeError::InvalidMaxChildren`] if `max_children` is zero
    /// and [`KdTreeError::NonFinitePosition`] if any entity has a NaN or
    /// infinite coordinate.
    pub fn build(entities: Vec<T>, max_children: usize) -> Result<Self> {
        let start = Instant::now();
        let bounds = prepare(&entities, max_children)?;
        let len = entities.len();
        let root = build_node(entities, bounds, max_children)?;
        let tree = Self {
            root,
            len,
            max_children,
        };
        tree.log_build(start);
        Ok(tree)
    }

    /// Builds a tree from a [`TreeConfig`].
    ///
    /// # Errors
    ///
    /// See [`KdTree::build`].
    pub fn with_config(entities: Vec<T>, config: &TreeConfig) -> Result<Self> {
        config.validate()?;
        Self::build(entities, config.max_children)
    }

    /// Number of entities in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the tree holds no entities.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Leaf size threshold the tree was built with.
    #[inline]
    pub fn max_children(&self) -> usize {
        self.max_children
    }

    /// Box around every entity. Empty for an empty tree.
    #[inline]
    pub fn bounds(&self) -> &BoundingBox<T::Point> {
        self.root.bounds()
    }

    /// Length of the longest root-to-leaf path. A single leaf has depth 0.
    pub fn depth(&self) -> usize {
        self.leaves().map(|leaf| leaf.depth).max().unwrap_or(0)
    }

    /// Shape summary of the tree.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            entities: self.len,
            ..TreeStats::default()
        };
        for leaf in self.leaves() {
            stats.leaves += 1;
            stats.depth = stats.depth.max(leaf.depth);
        }
        stats.interior_nodes = stats.leaves - 1;
        stats
    }

    /// Iterates over the leaves, left to right.
    pub fn leaves(&self) -> Leaves<'_, T> {
        Leaves {
            stack: vec![(&self.root, 0)],
        }
    }

    /// Iterates over every entity in leaf order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.leaves().flat_map(|leaf| leaf.entities.iter())
    }

    /// Consumes the tree, returning its entities in leaf order.
    pub fn into_entities(self) -> Vec<T> {
        let mut entities = Vec::with_capacity(self.len);
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf {
                    entities: leaf, ..
                } => entities.extend(leaf),
                Node::Interior { left, right, .. } => {
                    stack.push(*right);
                    stack.push(*left);
                }
            }
        }
        entities
    }

    // --- Private helpers ---

    fn log_build(&self, start: Instant) {
        if log::log_enabled!(log::Level::Debug) {
            let stats = self.stats();
            log::debug!(
                "built kd-tree: {} entities, {} leaves, depth {}, max_children {} in {:.2?}",
                stats.entities,
                stats.leaves,
                stats.depth,
                self.max_children,
                start.elapsed()
            );
        }
    }
}

#[cfg(feature = "parallel")]
impl<T: PositionedEntity + Send> KdTree<T> {
    /// Builds the tree on the rayon thread pool.
    ///
    /// Produces exactly the tree [`KdTree::build`] would. Sub-ranges of at
    /// most `config.parallel_threshold` entities are built sequentially.
    ///
    /// # Errors
    ///
    /// See [`KdTree::build`].
    pub fn build_parallel(entities: Vec<T>, config: &TreeConfig) -> Result<Self> {
        let start = Instant::now();
        config.validate()?;
        let bounds = prepare(&entities, config.max_children)?;
        let len = entities.len();
        let root = build_node_parallel(entities, bounds, config)?;
        let tree = Self {
            root,
            len,
            max_children: config.max_children,
        };
        tree.log_build(start);
        Ok(tree)
    }
}

/// Shape summary returned by [`KdTree::stats`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of entities.
    pub entities: usize,
    /// Number of leaves.
    pub leaves: usize,
    /// Number of interior nodes.
    pub interior_nodes: usize,
    /// Length of the longest root-to-leaf path.
    pub depth: usize,
}

/// A leaf seen through [`KdTree::leaves`].
#[derive(Debug)]
pub struct LeafView<'a, T: PositionedEntity> {
    /// Distance from the root.
    pub depth: usize,
    /// Entities stored in the leaf.
    pub entities: &'a [T],
    /// Tight box around the leaf's entities.
    pub bounds: &'a BoundingBox<T::Point>,
}

/// Iterator over the leaves of a [`KdTree`].
#[derive(Debug)]
pub struct Leaves<'a, T: PositionedEntity> {
    stack: Vec<(&'a Node<T>, usize)>,
}

impl<'a, T: PositionedEntity> Iterator for Leaves<'a, T> {
    type Item = LeafView<'a, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, depth)) = self.stack.pop() {
            match node {
                Node::Leaf { entities, bounds } => {
                    return Some(LeafView {
                        depth,
                        entities,
                        bounds,
                    });
                }
                Node::Interior { left, right, .. } => {
                    self.stack.push((&**right, depth + 1));
                    self.stack.push((&**left, depth + 1));
                }
            }
        }
        None
    }
}

/// Validates the input and returns the root box.
fn prepare<T: PositionedEntity>(entities: &[T], max_children: usize) -> Result<BoundingBox<T::Point>> {
    if max_children == 0 {
        return Err(KdTreeError::InvalidMaxChildren(max_children));
    }
    if let Some(index) = entities.iter().position(|entity| !entity.position().is_finite()) {
        log::warn!("Rejecting kd-tree build: entity {index} has a non-finite position");
        return Err(KdTreeError::NonFinitePosition { index });
    }
    Ok(BoundingBox::from_points(entities.iter().map(PositionedEntity::position)))
}

/// Ranges this small are never split. A single entity is always a leaf so
/// that `max_children == 1` terminates.
#[inline]
fn is_leaf_sized(len: usize, max_children: usize) -> bool {
    len < max_children || len <= 1
}

fn build_node<T: PositionedEntity>(
    entities: Vec<T>,
    bounds: BoundingBox<T::Point>,
    max_children: usize,
) -> Result<Node<T>> {
    if is_leaf_sized(entities.len(), max_children) {
        return Ok(Node::Leaf { entities, bounds });
    }
    let split = Split::partition(entities, &bounds)?;
    let left = build_node(split.left, split.left_bounds, max_children)?;
    let right = build_node(split.right, split.right_bounds, max_children)?;
    Ok(Node::Interior {
        axis: split.axis,
        value: split.value,
        left: Box::new(left),
        right: Box::new(right),
        bounds,
    })
}

#[cfg(feature = "parallel")]
fn build_node_parallel<T: PositionedEntity + Send>(
    entities: Vec<T>,
    bounds: BoundingBox<T::Point>,
    config: &TreeConfig,
) -> Result<Node<T>> {
    if entities.len() <= config.parallel_threshold {
        return build_node(entities, bounds, config.max_children);
    }
    if is_leaf_sized(entities.len(), config.max_children) {
        return Ok(Node::Leaf { entities, bounds });
    }
    let Split {
        axis,
        value,
        left,
        left_bounds,
        right,
        right_bounds,
    } = Split::partition(entities, &bounds)?;
    let (left, right) = rayon::join(
        || build_node_parallel(left, left_bounds, config),
        || build_node_parallel(right, right_bounds, config),
    );
    Ok(Node::Interior {
        axis,
        value,
        left: Box::new(left?),
        right: Box::new(right?),
        bounds,
    })
}

/// One median split of a range.
struct Split<T: PositionedEntity> {
    axis: AxisOf<T>,
    value: ScalarOf<T>,
    left: Vec<T>,
    left_bounds: BoundingBox<T::Point>,
    right: Vec<T>,
    right_bounds: BoundingBox<T::Point>,
}

impl<T: PositionedEntity> Split<T> {
    /// Splits `entities` at the median of the widest axis of `bounds`.
    ///
    /// Entities in `left` have a coordinate no greater than `value` on
    /// `axis`, entities in `right` no smaller.
    fn partition(mut entities: Vec<T>, bounds: &BoundingBox<T::Point>) -> Result<Self> {
        let axis = bounds.max_axis();
        let half = entities.len() / 2;
        let median = select(&mut entities, half, |a, b| {
            let l = a.position().coord(axis);
            let r = b.position().coord(axis);
            l.partial_cmp(&r).unwrap_or(Ordering::Equal)
        })?;
        let value = median.position().coord(axis);

        let right = entities.split_off(half);
        let left_bounds = BoundingBox::from_points(entities.iter().map(PositionedEntity::position));
        let right_bounds = BoundingBox::from_points(right.iter().map(PositionedEntity::position));
        Ok(Self {
            axis,
            value,
            left: entities,
            left_bounds,
            right,
            right_bounds,
        })
    }
}
