//! Tests for quadtree construction, coverage invariants, and traversals

#[cfg(test)]
mod tests {
    use gridscan::AnalysisError;
    use gridscan::index::{Rectangle, SummedAreaIndex};
    use gridscan::tree::{SpatialDecompositionTree, TreeNode, Visit};
    use ndarray::Array2;

    fn build(rows: usize, cols: usize, min_leaf_size: usize) -> (SummedAreaIndex, SpatialDecompositionTree) {
        let grid = Array2::from_shape_fn((rows, cols), |(r, c)| ((r * 7 + c * 3) % 251) as u8);
        let Ok(index) = SummedAreaIndex::build(grid.view()) else {
            unreachable!("non-empty grid must index");
        };
        let Ok(tree) = SpatialDecompositionTree::build(&index, min_leaf_size) else {
            unreachable!("built index and positive leaf size must build");
        };
        (index, tree)
    }

    fn assert_exact_cover(tree: &SpatialDecompositionTree, root: &Rectangle) {
        let leaves: Vec<&TreeNode> = tree.leaves().collect();
        let total: i64 = leaves.iter().map(|leaf| leaf.bounds.area()).sum();
        assert_eq!(total, root.area(), "leaf areas must sum to the root area");

        for (i, a) in leaves.iter().enumerate() {
            for b in leaves.iter().skip(i + 1) {
                assert!(
                    !a.bounds.intersects(&b.bounds),
                    "leaves {} and {} overlap",
                    a.id,
                    b.id
                );
            }
        }
    }

    // Tests a 64x64 grid with leaf size 16 yields a 4x4 grid of leaves under 4 internal nodes
    #[test]
    fn test_power_of_two_grid_shape() {
        let (_, tree) = build(64, 64, 16);

        assert_eq!(tree.node_count(), 21);
        assert_eq!(tree.leaf_count(), 16);
        assert_eq!(tree.max_depth(), 2);
        assert_eq!(tree.nodes_at_depth(1).len(), 4);

        for leaf in tree.leaves() {
            assert_eq!(leaf.bounds.height(), 16);
            assert_eq!(leaf.bounds.width(), 16);
            assert_eq!(leaf.stats.area, 256);
        }
    }

    #[test]
    fn test_leaves_tile_root_exactly() {
        for (rows, cols, leaf) in [(64, 64, 16), (37, 53, 5), (100, 7, 3), (1, 1, 1), (33, 100, 16)] {
            let (index, tree) = build(rows, cols, leaf);
            let Some(root) = index.bounds() else {
                unreachable!("built index has bounds");
            };
            assert_eq!(tree.root().map(|node| node.bounds), Some(root));
            assert_exact_cover(&tree, &root);
        }
    }

    // Tests every internal node is exactly the union of its children
    #[test]
    fn test_children_partition_parent() {
        let (_, tree) = build(37, 53, 4);

        for node in tree.nodes().iter().filter(|node| !node.is_leaf()) {
            let children: Vec<&TreeNode> = node.child_ids().filter_map(|id| tree.node(id)).collect();
            let child_area: i64 = children.iter().map(|child| child.bounds.area()).sum();
            assert_eq!(child_area, node.bounds.area());

            let merged = children
                .iter()
                .map(|child| child.bounds)
                .reduce(|acc, bounds| acc.merge(&bounds));
            assert_eq!(merged, Some(node.bounds));

            for child in children {
                assert_eq!(child.parent, Some(node.id));
                assert_eq!(child.depth, node.depth + 1);
            }
        }
    }

    // Tests ids follow pre-order: each node's first child is the next id
    #[test]
    fn test_ids_follow_construction_preorder() {
        let (_, tree) = build(64, 64, 16);

        for (position, node) in tree.nodes().iter().enumerate() {
            assert_eq!(node.id, position);
            if let Some(first) = node.children.first().copied().flatten() {
                assert_eq!(first, node.id + 1);
            }
        }
        // Root, NW quadrant, then the NW quadrant's four leaves
        assert_eq!(tree.node(2).map(|node| node.bounds), Some(Rectangle::new(0, 0, 15, 15)));
        assert_eq!(tree.node(6).map(|node| node.bounds), Some(Rectangle::new(0, 32, 31, 63)));
    }

    #[test]
    fn test_node_statistics_come_from_index() {
        let (index, tree) = build(40, 40, 8);
        for node in tree.nodes() {
            assert_eq!(node.stats, index.query_statistics(&node.bounds));
        }
    }

    #[test]
    fn test_breadth_first_order_and_skipping() {
        let (_, tree) = build(64, 64, 16);

        let mut depths = Vec::new();
        tree.traverse(|node| {
            depths.push(node.depth);
            Visit::Descend
        });
        assert_eq!(depths.len(), 21);
        assert!(depths.windows(2).all(|pair| pair[0] <= pair[1]));

        let mut visited = 0;
        tree.traverse(|_| {
            visited += 1;
            Visit::SkipChildren
        });
        assert_eq!(visited, 1, "skipping at the root stops traversal");
    }

    #[test]
    fn test_depth_bounded_retrieval() {
        let (_, tree) = build(64, 64, 16);
        assert_eq!(tree.nodes_to_depth(0).len(), 1);
        assert_eq!(tree.nodes_to_depth(1).len(), 5);
        assert_eq!(tree.nodes_to_depth(5).len(), 21);
    }

    // Tests intersection query returns only leaves touching the rectangle
    #[test]
    fn test_query_intersecting_returns_leaves_only() {
        let (_, tree) = build(64, 64, 16);

        let hits = tree.query_intersecting(&Rectangle::new(10, 10, 20, 20));
        let mut bounds: Vec<Rectangle> = hits.iter().map(|node| node.bounds).collect();
        bounds.sort_by_key(|b| (b.row1, b.col1));
        assert_eq!(
            bounds,
            vec![
                Rectangle::new(0, 0, 15, 15),
                Rectangle::new(0, 16, 15, 31),
                Rectangle::new(16, 0, 31, 15),
                Rectangle::new(16, 16, 31, 31),
            ]
        );
        assert!(hits.iter().all(|node| node.is_leaf()));

        assert!(tree.query_intersecting(&Rectangle::new(100, 100, 120, 120)).is_empty());
        assert!(tree.query_intersecting(&Rectangle::new(5, 5, 1, 1)).is_empty());
    }

    #[test]
    fn test_build_requires_index_and_positive_leaf_size() {
        let unbuilt = SpatialDecompositionTree::build(&SummedAreaIndex::default(), 16);
        assert!(matches!(unbuilt, Err(AnalysisError::Uninitialized { .. })));

        let (index, _) = build(8, 8, 2);
        let zero = SpatialDecompositionTree::build(&index, 0);
        assert!(matches!(zero, Err(AnalysisError::InvalidParameter { .. })));
    }

    #[test]
    fn test_small_grid_is_single_leaf() {
        let (_, tree) = build(10, 300, 16);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.leaf_count(), 1);
        assert!(tree.root().is_some_and(TreeNode::is_leaf));
        assert_eq!(tree.summary().min_leaf_size, 16);
    }
}
