//! Nearest-neighbor queries for [`KdTree`].
//!
//! Distances are squared Euclidean throughout. The radius passed to a query
//! is linear and is squared once up front; results carry squared distances.
//!
//! A filter may replace an entity's distance with its own value (in the same
//! squared space) or exclude the entity. Pruning assumes a filtered distance
//! is never smaller than the entity's true squared distance to the query
//! position; a filter that shrinks distances can cause matches to be missed.

use num_traits::{Float, Zero};

use crate::accumulator::{Candidates, Neighbor, sort_by_distance};
use crate::error::{KdTreeError, Result};
use crate::geometry::{Point, PositionedEntity, Vector};
use crate::kdtree::{KdTree, Node, ScalarOf};

/// A query result: a borrowed entity and its squared distance.
pub type Found<'a, T> = Neighbor<&'a T, ScalarOf<T>>;

impl<T: PositionedEntity> KdTree<T> {
    /// Finds up to `max_count` entities within `max_distance` of `position`.
    ///
    /// Returns `Ok(None)` if nothing lies within range. Otherwise the set of
    /// the closest entities, in no particular order, each paired with its
    /// squared distance.
    ///
    /// # Errors
    ///
    /// Returns [`KdTreeError::InvalidMaxCount`] if `max_count` is zero,
    /// [`KdTreeError::InvalidMaxDistance`] if `max_distance` is NaN or
    /// negative and [`KdTreeError::NonFiniteQuery`] if `position` is not
    /// finite.
    pub fn nearest(
        &self,
        position: T::Point,
        max_count: usize,
        max_distance: ScalarOf<T>,
    ) -> Result<Option<Vec<Found<'_, T>>>> {
        self.search(position, max_count, max_distance, |entity: &T| {
            Some(entity.position().difference(position).squared_length())
        })
    }

    /// Like [`nearest`](Self::nearest), with a per-entity filter.
    ///
    /// `filter` returns `None` to exclude an entity or `Some(distance)` to
    /// use `distance` in place of the squared Euclidean distance. See the
    /// module docs for the constraint on custom distances.
    ///
    /// Custom distances must be squared. Linear distances are not supported:
    /// beyond a distance of one they fall below the squared distance, so
    /// pruning may drop entities that belong in the result.
    ///
    /// ```
    /// use kdtree::prelude::*;
    ///
    /// let points: Vec<(Vec2, u32)> = (0..10).map(|i| (Vec2::new(i as f32, 0.0), i)).collect();
    /// let tree = KdTree::build(points, 2).unwrap();
    /// let query = Vec2::new(4.2, 0.0);
    ///
    /// // Even ids only, distance in squared space
    /// let found = tree
    ///     .nearest_filtered(query, 2, 10.0, |e| {
    ///         (e.1 % 2 == 0).then(|| e.0.distance_squared(query))
    ///     })
    ///     .unwrap()
    ///     .unwrap();
    /// let mut ids: Vec<u32> = found.iter().map(|n| n.item.1).collect();
    /// ids.sort_unstable();
    /// assert_eq!(ids, vec![4, 6]);
    /// ```
    ///
    /// # Errors
    ///
    /// See [`nearest`](Self::nearest).
    pub fn nearest_filtered<F>(
        &self,
        position: T::Point,
        max_count: usize,
        max_distance: ScalarOf<T>,
        filter: F,
    ) -> Result<Option<Vec<Found<'_, T>>>>
    where
        F: FnMut(&T) -> Option<ScalarOf<T>>,
    {
        self.search(position, max_count, max_distance, filter)
    }

    /// Like [`nearest`](Self::nearest), sorted by ascending distance.
    ///
    /// An empty `Vec` means nothing was in range.
    ///
    /// # Errors
    ///
    /// See [`nearest`](Self::nearest).
    pub fn nearest_sorted(
        &self,
        position: T::Point,
        max_count: usize,
        max_distance: ScalarOf<T>,
    ) -> Result<Vec<Found<'_, T>>> {
        let mut found = self
            .nearest(position, max_count, max_distance)?
            .unwrap_or_default();
        sort_by_distance(&mut found);
        Ok(found)
    }

    /// The single closest entity, or `None` for an empty tree.
    ///
    /// # Errors
    ///
    /// Returns [`KdTreeError::NonFiniteQuery`] if `position` is not finite.
    pub fn nearest_one(&self, position: T::Point) -> Result<Option<Found<'_, T>>> {
        let found = self.nearest(position, 1, Float::infinity())?;
        Ok(found.and_then(|found| found.into_iter().next()))
    }

    /// Every entity within `radius` of `position`, closest first.
    ///
    /// # Errors
    ///
    /// Returns [`KdTreeError::InvalidMaxDistance`] if `radius` is NaN or
    /// negative and [`KdTreeError::NonFiniteQuery`] if `position` is not
    /// finite.
    pub fn within_distance(&self, position: T::Point, radius: ScalarOf<T>) -> Result<Vec<Found<'_, T>>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        self.nearest_sorted(position, self.len(), radius)
    }

    /// Depth-first branch-and-bound search.
    ///
    /// Near children are pushed last so they are visited first, which
    /// tightens the worst kept distance before far subtrees are considered.
    fn search<F>(
        &self,
        position: T::Point,
        max_count: usize,
        max_distance: ScalarOf<T>,
        mut distance_of: F,
    ) -> Result<Option<Vec<Found<'_, T>>>>
    where
        F: FnMut(&T) -> Option<ScalarOf<T>>,
    {
        let max_squared = check_query(position, max_count, max_distance)?;
        let mut candidates = Candidates::new(max_count)?;
        let mut stack: Vec<&Node<T>> = Vec::with_capacity(64);
        stack.push(&self.root);

        while let Some(node) = stack.pop() {
            match node {
                Node::Leaf { entities, bounds } => {
                    if let Some(reach) = pruning_reach(&candidates, max_distance)
                        && !bounds.reaches(position, reach)
                    {
                        continue;
                    }
                    for entity in entities {
                        let Some(distance) = distance_of(entity) else {
                            continue;
                        };
                        if distance <= max_squared {
                            candidates.insert(entity, distance);
                        }
                    }
                }
                Node::Interior {
                    axis,
                    value,
                    left,
                    right,
                    bounds,
                } => {
                    let offset = position.coord(*axis) - *value;
                    let zero: ScalarOf<T> = num_traits::zero();
                    let (near, far) = if offset < zero {
                        (&**left, &**right)
                    } else {
                        (&**right, &**left)
                    };
                    let gap = offset.abs();
                    let far = (gap <= max_distance).then_some(far);

                    match pruning_reach(&candidates, max_distance) {
                        None => {
                            stack.extend(far);
                            stack.push(near);
                        }
                        Some(reach) => {
                            if !bounds.reaches(position, reach) {
                                continue;
                            }
                            stack.extend(far.filter(|_| gap <= reach));
                            stack.push(near);
                        }
                    }
                }
            }
        }

        if candidates.is_empty() {
            return Ok(None);
        }
        Ok(Some(candidates.into_vec()))
    }
}

/// Linear pruning radius once the accumulator is full.
#[inline]
fn pruning_reach<E, S: Float>(candidates: &Candidates<E, S>, max_distance: S) -> Option<S> {
    if !candidates.is_full() {
        return None;
    }
    candidates
        .worst_distance()
        .map(|worst| worst.sqrt().min(max_distance))
}

/// Validates query arguments and returns the squared radius.
fn check_query<P: Point>(position: P, max_count: usize, max_distance: P::Scalar) -> Result<P::Scalar> {
    if max_count == 0 {
        log::warn!("Rejecting nearest query with max_count 0");
        return Err(KdTreeError::InvalidMaxCount);
    }
    if max_distance.is_nan() || max_distance < P::Scalar::zero() {
        log::warn!("Rejecting nearest query with max_distance {max_distance:?}");
        return Err(KdTreeError::InvalidMaxDistance);
    }
    if !position.is_finite() {
        log::warn!("Rejecting nearest query at non-finite position {position:?}");
        return Err(KdTreeError::NonFiniteQuery);
    }
    Ok(max_distance * max_distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DVec2, Vec2};

    fn line(n: usize) -> Vec<(DVec2, usize)> {
        (0..n).map(|i| (DVec2::new(i as f64, 0.0), i)).collect()
    }

    fn ids(found: &[Found<'_, (DVec2, usize)>]) -> Vec<usize> {
        let mut ids: Vec<usize> = found.iter().map(|n| n.item.1).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_nearest_on_line() {
        let tree = KdTree::build(line(100), 4).unwrap();
        let found = tree
            .nearest(DVec2::new(50.2, 0.0), 3, f64::INFINITY)
            .unwrap()
            .unwrap();
        assert_eq!(ids(&found), vec![49, 50, 51]);
        for neighbor in &found {
            let expected = (neighbor.item.0 - DVec2::new(50.2, 0.0)).length_squared();
            assert_eq!(neighbor.distance, expected, "distances are squared");
        }
    }

    #[test]
    fn test_empty_tree_returns_none() {
        let tree = KdTree::<Vec2>::new(Vec::new()).unwrap();
        assert_eq!(tree.nearest(Vec2::ZERO, 5, f32::INFINITY).unwrap(), None);
        assert_eq!(tree.nearest_one(Vec2::ZERO), Ok(None));
        assert!(tree.within_distance(Vec2::ZERO, 10.0).unwrap().is_empty());
    }

    #[test]
    fn test_nothing_in_range_returns_none() {
        let tree = KdTree::build(line(10), 2).unwrap();
        let found = tree.nearest(DVec2::new(0.0, 100.0), 3, 5.0).unwrap();
        assert!(found.is_none());
        assert!(tree.nearest_sorted(DVec2::new(0.0, 100.0), 3, 5.0).unwrap().is_empty());
    }

    #[test]
    fn test_fewer_matches_than_max_count() {
        let tree = KdTree::build(line(10), 2).unwrap();
        let found = tree.nearest(DVec2::new(0.0, 0.0), 50, f64::INFINITY).unwrap().unwrap();
        assert_eq!(found.len(), 10);
    }

    #[test]
    fn test_radius_is_linear_and_inclusive() {
        let tree = KdTree::build(line(10), 3).unwrap();
        let found = tree.nearest(DVec2::new(0.0, 0.0), 10, 3.0).unwrap().unwrap();
        assert_eq!(ids(&found), vec![0, 1, 2, 3], "point at exactly the radius is kept");

        let zero = tree.nearest(DVec2::new(4.0, 0.0), 10, 0.0).unwrap().unwrap();
        assert_eq!(ids(&zero), vec![4]);
    }

    #[test]
    fn test_invalid_arguments() {
        let tree = KdTree::build(line(10), 3).unwrap();
        let origin = DVec2::ZERO;
        assert_eq!(tree.nearest(origin, 0, 1.0), Err(KdTreeError::InvalidMaxCount));
        assert_eq!(tree.nearest(origin, 1, -1.0), Err(KdTreeError::InvalidMaxDistance));
        assert_eq!(tree.nearest(origin, 1, f64::NAN), Err(KdTreeError::InvalidMaxDistance));
        assert_eq!(
            tree.nearest(DVec2::new(f64::NAN, 0.0), 1, 1.0),
            Err(KdTreeError::NonFiniteQuery)
        );
        assert_eq!(
            tree.within_distance(DVec2::new(0.0, f64::INFINITY), 1.0),
            Err(KdTreeError::NonFiniteQuery)
        );
    }

    #[test]
    fn test_filter_excludes_entities() {
        let tree = KdTree::build(line(20), 4).unwrap();
        let position = DVec2::new(10.0, 0.0);
        let found = tree
            .nearest_filtered(position, 4, f64::INFINITY, |entity| {
                (entity.1 % 2 == 1).then(|| (entity.0 - position).length_squared())
            })
            .unwrap()
            .unwrap();
        assert_eq!(ids(&found), vec![7, 9, 11, 13]);
    }

    #[test]
    fn test_filter_rejecting_everything() {
        let tree = KdTree::build(line(20), 4).unwrap();
        let found = tree
            .nearest_filtered(DVec2::ZERO, 4, f64::INFINITY, |_| None)
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_filter_distance_is_reported() {
        let tree = KdTree::build(line(8), 2).unwrap();
        let position = DVec2::new(3.0, 0.0);
        let found = tree
            .nearest_filtered(position, 1, f64::INFINITY, |entity| {
                let squared = (entity.0 - position).length_squared();
                Some(if entity.1 == 3 { squared + 100.0 } else { squared })
            })
            .unwrap()
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_ne!(found[0].item.1, 3, "penalized entity loses to its neighbors");
        assert_eq!(found[0].distance, 1.0);
    }

    #[test]
    fn test_nearest_sorted_orders_by_distance() {
        let tree = KdTree::build(line(30), 4).unwrap();
        let found = tree.nearest_sorted(DVec2::new(12.4, 0.0), 5, f64::INFINITY).unwrap();
        let order: Vec<usize> = found.iter().map(|n| n.item.1).collect();
        assert_eq!(order, vec![12, 13, 11, 14, 10]);
        assert!(found.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_nearest_one() {
        let points = vec![Vec2::new(0.0, 0.0), Vec2::new(5.0, 5.0), Vec2::new(-3.0, 1.0)];
        let tree = KdTree::build(points, 2).unwrap();
        let best = tree.nearest_one(Vec2::new(4.0, 4.0)).unwrap().unwrap();
        assert_eq!(*best.item, Vec2::new(5.0, 5.0));
        assert_eq!(best.distance, 2.0);
    }

    #[test]
    fn test_nearest_one_rejects_non_finite_position() {
        let tree = KdTree::build(vec![(DVec2::new(1.0, 1.0), 0_usize)], 4).unwrap();
        assert_eq!(
            tree.nearest_one(DVec2::new(f64::NAN, 0.0)),
            Err(KdTreeError::NonFiniteQuery)
        );
        assert_eq!(
            tree.nearest_one(DVec2::new(0.0, f64::INFINITY)),
            Err(KdTreeError::NonFiniteQuery)
        );
        let empty = KdTree::<DVec2>::new(Vec::new()).unwrap();
        assert_eq!(
            empty.nearest_one(DVec2::new(f64::NAN, 0.0)),
            Err(KdTreeError::NonFiniteQuery),
            "an empty tree still validates the position"
        );
    }

    #[test]
    fn test_within_distance() {
        let tree = KdTree::build(line(50), 5).unwrap();
        let found = tree.within_distance(DVec2::new(25.0, 1.0), 2.0).unwrap();
        let order: Vec<usize> = found.iter().map(|n| n.item.1).collect();
        assert_eq!(order.len(), 3);
        assert_eq!(order[0], 25);
        let mut rest = order[1..].to_vec();
        rest.sort_unstable();
        assert_eq!(rest, vec![24, 26]);
    }

    #[test]
    fn test_duplicate_positions() {
        let points: Vec<(Vec2, u32)> = (0..40).map(|i| (Vec2::splat(1.0), i)).collect();
        let tree = KdTree::build(points, 3).unwrap();
        let found = tree.nearest(Vec2::splat(1.0), 7, 0.0).unwrap().unwrap();
        assert_eq!(found.len(), 7);
        assert!(found.iter().all(|n| n.distance == 0.0));
    }
}
