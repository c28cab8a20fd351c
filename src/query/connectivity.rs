//! Grouping of edge-adjacent anomalous leaves into connected components
//!
//! Two interchangeable algorithms produce the same partition: union-find
//! over all adjacent pairs, and iterative depth-first search over an
//! explicit adjacency list. Both pay `O(p^2)` for the pairwise adjacency
//! scan over `p` leaves; the second exists as a cross-check.

use std::collections::HashMap;

use bitvec::prelude::*;

use crate::index::Rectangle;
use crate::query::ScoredRegion;
use crate::query::disjoint_set::DisjointSetUnion;
use crate::tree::NodeId;

/// A maximal group of edge-adjacent anomalous leaves
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectedComponent {
    /// Position in the area-sorted result, 0 = largest
    pub id: usize,
    /// Member leaf ids, ascending
    pub members: Vec<NodeId>,
    /// Smallest rectangle enclosing every member
    pub bounds: Rectangle,
    /// Summed member area
    pub total_area: i64,
    /// Highest member score
    pub max_score: f64,
    /// Mean member score
    pub avg_score: f64,
}

impl ConnectedComponent {
    fn from_members(regions: &[ScoredRegion], indices: &[usize]) -> Option<Self> {
        // Fixed member order keeps score sums identical across algorithms
        let mut ordered = indices.to_vec();
        ordered.sort_unstable();
        let mut members = ordered.iter().filter_map(|&i| regions.get(i));
        let first = members.next()?;

        let mut component = Self {
            id: 0,
            members: vec![first.node_id],
            bounds: first.bounds,
            total_area: first.bounds.area(),
            max_score: first.score,
            avg_score: 0.0,
        };
        let mut score_sum = first.score;

        for region in members {
            component.members.push(region.node_id);
            component.bounds = component.bounds.merge(&region.bounds);
            component.total_area += region.bounds.area();
            component.max_score = component.max_score.max(region.score);
            score_sum += region.score;
        }

        component.avg_score = score_sum / component.members.len() as f64;
        component.members.sort_unstable();
        Some(component)
    }
}

/// Components found by uniting every adjacent pair
///
/// Each set's size payload starts at its leaf's area, so the union-find
/// root carries the component area.
pub fn components_union_find(regions: &[ScoredRegion]) -> Vec<ConnectedComponent> {
    if regions.is_empty() {
        return Vec::new();
    }

    let mut sets =
        DisjointSetUnion::with_sizes(regions.iter().map(|r| r.bounds.area()).collect());

    for (i, a) in regions.iter().enumerate() {
        for (j, b) in regions.iter().enumerate().skip(i + 1) {
            if a.bounds.is_adjacent_to(&b.bounds) {
                sets.unite(i, j);
            }
        }
    }

    // Group by root, keeping first-seen order so output is deterministic
    let mut root_slots: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for i in 0..regions.len() {
        let root = sets.find(i);
        let slot = *root_slots.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        if let Some(group) = groups.get_mut(slot) {
            group.push(i);
        }
    }

    tracing::debug!(
        leaves = regions.len(),
        components = sets.component_count(),
        "union-find connectivity complete"
    );

    finalize(regions, &groups)
}

/// Components found by depth-first search over an adjacency list
pub fn components_depth_first(regions: &[ScoredRegion]) -> Vec<ConnectedComponent> {
    let n = regions.len();
    if n == 0 {
        return Vec::new();
    }

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, a) in regions.iter().enumerate() {
        for (j, b) in regions.iter().enumerate().skip(i + 1) {
            if a.bounds.is_adjacent_to(&b.bounds) {
                if let Some(list) = adjacency.get_mut(i) {
                    list.push(j);
                }
                if let Some(list) = adjacency.get_mut(j) {
                    list.push(i);
                }
            }
        }
    }

    let mut visited = bitvec![0; n];
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut stack = Vec::new();

    for start in 0..n {
        if visited.get(start).as_deref() == Some(&true) {
            continue;
        }

        let mut group = Vec::new();
        stack.push(start);

        while let Some(u) = stack.pop() {
            if visited.get(u).as_deref() != Some(&false) {
                continue;
            }
            visited.set(u, true);
            group.push(u);

            if let Some(neighbours) = adjacency.get(u) {
                stack.extend(
                    neighbours
                        .iter()
                        .copied()
                        .filter(|&v| visited.get(v).as_deref() == Some(&false)),
                );
            }
        }

        groups.push(group);
    }

    finalize(regions, &groups)
}

// Build components, sort by area (largest first, stable), then number them
fn finalize(regions: &[ScoredRegion], groups: &[Vec<usize>]) -> Vec<ConnectedComponent> {
    let mut components: Vec<ConnectedComponent> = groups
        .iter()
        .filter_map(|group| ConnectedComponent::from_members(regions, group))
        .collect();

    components.sort_by(|a, b| b.total_area.cmp(&a.total_area));
    for (id, component) in components.iter_mut().enumerate() {
        component.id = id;
    }
    components
}
