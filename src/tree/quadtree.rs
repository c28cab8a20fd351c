//! Quadtree decomposition of the grid into a flat node arena
//!
//! Nodes live in one append-only `Vec`; a node's id is its position in that
//! vector and parent/child links are ids, never references. Construction
//! uses an explicit stack but allocates ids in the same pre-order a
//! recursive build would: a node, then its NW, NE, SW and SE subtrees.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::index::{Rectangle, RegionStatistics, SummedAreaIndex};
use crate::io::error::{AnalysisError, Result, invalid_parameter};

/// Stable index of a node in the tree's arena
pub type NodeId = usize;

/// One region of the decomposition
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    /// Position in the node arena
    pub id: NodeId,
    /// Region covered by this node
    pub bounds: Rectangle,
    /// Statistics pulled from the index at build time
    pub stats: RegionStatistics,
    /// Distance from the root (root = 0)
    pub depth: usize,
    /// Parent node, `None` for the root
    pub parent: Option<NodeId>,
    /// Children in NW, NE, SW, SE order
    pub children: [Option<NodeId>; 4],
}

impl TreeNode {
    /// Check if the node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Iterate over the ids of present children
    pub fn child_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().flatten().copied()
    }
}

/// Visitor decision for breadth-first traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Continue into the node's children
    Descend,
    /// Do not enqueue the node's children
    SkipChildren,
}

/// Shape and timing of a built tree
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TreeSummary {
    /// Total number of nodes
    pub node_count: usize,
    /// Number of leaf nodes
    pub leaf_count: usize,
    /// Deepest node depth
    pub max_depth: usize,
    /// Leaf size the tree was built with
    pub min_leaf_size: usize,
    /// Wall time spent building
    pub build_time: Duration,
}

/// Pending construction work: a region waiting for a node id
struct PendingNode {
    bounds: Rectangle,
    depth: usize,
    parent: Option<(NodeId, usize)>,
}

/// Hierarchical quadtree over a summed-area index
///
/// The default value is an empty, unbuilt tree.
#[derive(Debug, Clone, Default)]
pub struct SpatialDecompositionTree {
    nodes: Vec<TreeNode>,
    leaf_count: usize,
    max_depth: usize,
    min_leaf_size: usize,
    build_time: Duration,
}

impl SpatialDecompositionTree {
    /// Build the tree top-down over the whole indexed grid
    ///
    /// A region becomes a leaf once either dimension is at or below
    /// `min_leaf_size`; otherwise it is split at its integer midpoints.
    /// Every node's statistics come from the index in constant time.
    ///
    /// # Errors
    ///
    /// Returns `Uninitialized` if the index has not been built and
    /// `InvalidParameter` if `min_leaf_size` is zero
    pub fn build(index: &SummedAreaIndex, min_leaf_size: usize) -> Result<Self> {
        let root_bounds = index.bounds().ok_or(AnalysisError::Uninitialized {
            stage: "spatial decomposition tree",
            requires: "summed-area index",
        })?;
        if min_leaf_size == 0 {
            return Err(invalid_parameter(
                "min_leaf_size",
                &min_leaf_size,
                &"must be positive",
            ));
        }

        let start = Instant::now();
        let leaf_edge = min_leaf_size as i64;
        let estimated = (index.rows() / min_leaf_size + 1) * (index.cols() / min_leaf_size + 1) * 2;

        let mut tree = Self {
            nodes: Vec::with_capacity(estimated),
            min_leaf_size,
            ..Self::default()
        };

        let mut stack = vec![PendingNode {
            bounds: root_bounds,
            depth: 0,
            parent: None,
        }];

        while let Some(pending) = stack.pop() {
            let id = tree.nodes.len();

            if let Some((parent_id, slot)) = pending.parent {
                if let Some(child) = tree
                    .nodes
                    .get_mut(parent_id)
                    .and_then(|parent| parent.children.get_mut(slot))
                {
                    *child = Some(id);
                }
            }

            tree.nodes.push(TreeNode {
                id,
                bounds: pending.bounds,
                stats: index.query_statistics(&pending.bounds),
                depth: pending.depth,
                parent: pending.parent.map(|(parent_id, _)| parent_id),
                children: [None; 4],
            });
            tree.max_depth = tree.max_depth.max(pending.depth);

            if pending.bounds.height() <= leaf_edge || pending.bounds.width() <= leaf_edge {
                tree.leaf_count += 1;
                continue;
            }

            // Reverse push so NW pops first and ids follow recursive pre-order
            for (slot, quadrant) in pending.bounds.quadrants().into_iter().enumerate().rev() {
                if quadrant.is_valid() {
                    stack.push(PendingNode {
                        bounds: quadrant,
                        depth: pending.depth + 1,
                        parent: Some((id, slot)),
                    });
                }
            }
        }

        tree.build_time = start.elapsed();

        tracing::debug!(
            nodes = tree.nodes.len(),
            leaves = tree.leaf_count,
            max_depth = tree.max_depth,
            min_leaf_size,
            elapsed_us = tree.build_time.as_micros() as u64,
            "spatial decomposition tree built"
        );

        Ok(tree)
    }

    /// Check if the tree holds any nodes
    pub fn is_built(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Root node, if built
    pub fn root(&self) -> Option<&TreeNode> {
        self.nodes.first()
    }

    /// Look up a node by id
    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// All nodes in construction order
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaf nodes
    pub const fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Deepest node depth
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Shape and timing of the tree
    pub fn summary(&self) -> TreeSummary {
        TreeSummary {
            node_count: self.nodes.len(),
            leaf_count: self.leaf_count,
            max_depth: self.max_depth,
            min_leaf_size: self.min_leaf_size,
            build_time: self.build_time,
        }
    }

    /// Breadth-first traversal from the root
    ///
    /// The visitor decides per node whether its children are enqueued,
    /// which lets callers cut whole subtrees.
    pub fn traverse<'a, F>(&'a self, mut visitor: F)
    where
        F: FnMut(&'a TreeNode) -> Visit,
    {
        let mut queue: VecDeque<NodeId> = self.root().map(|root| root.id).into_iter().collect();

        while let Some(id) = queue.pop_front() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if visitor(node) == Visit::Descend {
                queue.extend(node.child_ids());
            }
        }
    }

    /// Leaves in construction order
    pub fn leaves(&self) -> impl Iterator<Item = &TreeNode> + '_ {
        self.nodes.iter().filter(|node| node.is_leaf())
    }

    /// Nodes at exactly `depth`, in construction order
    pub fn nodes_at_depth(&self, depth: usize) -> Vec<&TreeNode> {
        self.nodes.iter().filter(|node| node.depth == depth).collect()
    }

    /// Nodes no deeper than `max_depth`, in breadth-first order
    pub fn nodes_to_depth(&self, max_depth: usize) -> Vec<&TreeNode> {
        let mut result = Vec::new();
        self.traverse(|node| {
            result.push(node);
            if node.depth < max_depth {
                Visit::Descend
            } else {
                Visit::SkipChildren
            }
        });
        result
    }

    /// Leaves whose bounds intersect `query`
    ///
    /// Subtrees that miss the query rectangle are never entered.
    pub fn query_intersecting(&self, query: &Rectangle) -> Vec<&TreeNode> {
        let mut result = Vec::new();
        if !query.is_valid() {
            return result;
        }
        self.traverse(|node| {
            if !node.bounds.intersects(query) {
                return Visit::SkipChildren;
            }
            if node.is_leaf() {
                result.push(node);
            }
            Visit::Descend
        });
        result
    }
}
