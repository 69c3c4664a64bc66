//! Component tests for KdTree construction - testing each build property individually
//! This file provides granular test coverage to identify specific bugs

#[cfg(test)]
mod tests {
    use crate::geometry::{Point, PositionedEntity};
    use crate::kdtree::Node;
    use crate::{BoundingBox, KdTree, KdTreeError, TreeConfig};
    use glam::{DVec2, DVec3, Vec2};
    use rand::{Rng, SeedableRng};

    fn random_points(n: usize, seed: u64) -> Vec<(DVec2, usize)> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        (0..n)
            .map(|i| {
                let x = rng.random_range(-100.0..100.0);
                let y = rng.random_range(-100.0..100.0);
                (DVec2::new(x, y), i)
            })
            .collect()
    }

    fn sorted_ids(tree: &KdTree<(DVec2, usize)>) -> Vec<usize> {
        let mut ids: Vec<usize> = tree.iter().map(|entity| entity.1).collect();
        ids.sort_unstable();
        ids
    }

    /// Walks every interior node, checking split and box invariants.
    fn check_node<T: PositionedEntity>(node: &Node<T>)
    where
        T::Point: PartialEq,
    {
        let Node::Interior {
            axis,
            value,
            left,
            right,
            bounds,
        } = node
        else {
            return;
        };
        assert_eq!(
            *bounds,
            left.bounds().union(*right.bounds()),
            "interior box is the union of its children"
        );
        let left_points = collect(left);
        let right_points = collect(right);
        assert!(!left_points.is_empty() && !right_points.is_empty(), "splits are never one-sided");
        assert!(left_points.iter().all(|p| p.coord(*axis) <= *value));
        assert!(right_points.iter().all(|p| p.coord(*axis) >= *value));
        check_node(left);
        check_node(right);
    }

    fn collect<T: PositionedEntity>(node: &Node<T>) -> Vec<T::Point> {
        match node {
            Node::Leaf { entities, .. } => entities.iter().map(PositionedEntity::position).collect(),
            Node::Interior { left, right, .. } => {
                let mut points = collect(left);
                points.extend(collect(right));
                points
            }
        }
    }

    // ============================================================================
    // BASIC CONSTRUCTION TESTS
    // ============================================================================

    #[test]
    fn test_empty_tree() {
        let tree = KdTree::<DVec2>::new(Vec::new()).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert!(tree.bounds().is_empty());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.leaves().count(), 1, "empty tree is a single empty leaf");
        assert_eq!(tree.max_children(), 16);
    }

    #[test]
    fn test_single_entity() {
        let tree = KdTree::build(vec![(Vec2::new(3.0, 4.0), 'a')], 1).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.bounds().min(), Vec2::new(3.0, 4.0));
        assert_eq!(tree.bounds().max(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_zero_max_children_rejected() {
        let result = KdTree::build(vec![DVec2::ZERO], 0);
        assert_eq!(result.unwrap_err(), KdTreeError::InvalidMaxChildren(0));
    }

    #[test]
    fn test_non_finite_position_rejected() {
        let points = vec![DVec2::new(0.0, 0.0), DVec2::new(1.0, 1.0), DVec2::new(f64::NAN, 2.0)];
        let result = KdTree::build(points, 4);
        assert_eq!(result.unwrap_err(), KdTreeError::NonFinitePosition { index: 2 });

        let result = KdTree::build(vec![DVec3::new(0.0, f64::NEG_INFINITY, 0.0)], 4);
        assert_eq!(result.unwrap_err(), KdTreeError::NonFinitePosition { index: 0 });
    }

    #[test]
    fn test_with_config() {
        let config = TreeConfig::default().with_max_children(5);
        let tree = KdTree::with_config(random_points(100, 1), &config).unwrap();
        assert_eq!(tree.max_children(), 5);
        assert_eq!(tree.len(), 100);

        let bad = TreeConfig::default().with_max_children(0);
        assert!(KdTree::with_config(random_points(10, 1), &bad).is_err());
    }

    // ============================================================================
    // STRUCTURE TESTS
    // ============================================================================

    #[test]
    fn test_max_children_one_terminates() {
        let tree = KdTree::build(random_points(33, 7), 1).unwrap();
        assert_eq!(tree.len(), 33);
        assert!(tree.leaves().all(|leaf| leaf.entities.len() == 1));
        assert_eq!(tree.leaves().count(), 33);
    }

    #[test]
    fn test_completeness_across_leaf_sizes() {
        let points = random_points(500, 42);
        for max_children in [1, 2, 3, 8, 16, 64, 1000] {
            let tree = KdTree::build(points.clone(), max_children).unwrap();
            assert_eq!(tree.len(), 500, "max_children {max_children}");
            assert_eq!(sorted_ids(&tree), (0..500).collect::<Vec<_>>(), "max_children {max_children}");
        }
    }

    #[test]
    fn test_leaf_sizes_below_threshold() {
        for max_children in [2, 5, 16] {
            let tree = KdTree::build(random_points(777, 3), max_children).unwrap();
            for leaf in tree.leaves() {
                assert!(
                    leaf.entities.len() < max_children,
                    "leaf of {} with max_children {max_children}",
                    leaf.entities.len()
                );
            }
        }
    }

    #[test]
    fn test_entities_inside_leaf_bounds() {
        let tree = KdTree::build(random_points(400, 11), 6).unwrap();
        for leaf in tree.leaves() {
            assert_eq!(
                *leaf.bounds,
                BoundingBox::from_points(leaf.entities.iter().map(PositionedEntity::position)),
                "leaf boxes are tight"
            );
            for entity in leaf.entities {
                assert!(leaf.bounds.contains(entity.0));
                assert!(tree.bounds().contains(entity.0));
            }
        }
    }

    #[test]
    fn test_split_invariants() {
        let tree = KdTree::build(random_points(300, 5), 4).unwrap();
        check_node(&tree.root);

        let points: Vec<DVec3> = (0..200)
            .map(|i| DVec3::new(f64::from(i % 7), f64::from(i % 13) * 3.0, f64::from(i) * 0.1))
            .collect();
        let tree = KdTree::build(points, 3).unwrap();
        check_node(&tree.root);
    }

    #[test]
    fn test_duplicate_positions() {
        let points: Vec<(DVec2, usize)> = (0..100).map(|i| (DVec2::splat(2.5), i)).collect();
        let tree = KdTree::build(points, 4).unwrap();
        assert_eq!(sorted_ids(&tree), (0..100).collect::<Vec<_>>());
        assert!(tree.leaves().all(|leaf| leaf.entities.len() < 4));
    }

    #[test]
    fn test_stats_and_depth() {
        let tree = KdTree::build(random_points(64, 9), 2).unwrap();
        let stats = tree.stats();
        assert_eq!(stats.entities, 64);
        assert_eq!(stats.leaves, 64, "median splits of a power of two give singleton leaves");
        assert_eq!(stats.interior_nodes, 63);
        assert_eq!(stats.depth, 6);
        assert_eq!(tree.depth(), 6);
    }

    #[test]
    fn test_into_entities() {
        let tree = KdTree::build(random_points(250, 21), 8).unwrap();
        let in_leaf_order: Vec<usize> = tree.iter().map(|entity| entity.1).collect();
        let owned: Vec<usize> = tree.into_entities().into_iter().map(|entity| entity.1).collect();
        assert_eq!(owned, in_leaf_order);
        let mut sorted = owned;
        sorted.sort_unstable();
        assert_eq!(sorted, (0..250).collect::<Vec<_>>());
    }
}
