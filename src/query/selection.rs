//! Bounded top-K selection of scored regions

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Duration;

use crate::index::Rectangle;
use crate::tree::NodeId;

/// A region together with its deviation score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredRegion {
    /// Region bounds
    pub bounds: Rectangle,
    /// Deviation score
    pub score: f64,
    /// Tree node the region came from
    pub node_id: NodeId,
}

impl ScoredRegion {
    /// Pair a region with its score and originating node
    pub const fn new(bounds: Rectangle, score: f64, node_id: NodeId) -> Self {
        Self {
            bounds,
            score,
            node_id,
        }
    }
}

/// Ranked regions plus the cost of producing them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedResult {
    /// Regions ordered by score, highest first
    pub regions: Vec<ScoredRegion>,
    /// Nodes examined
    pub nodes_visited: usize,
    /// Subtrees skipped without being examined
    pub nodes_pruned: usize,
    /// Wall time of the query
    pub elapsed: Duration,
}

impl RankedResult {
    /// Number of regions returned
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Check if no region was returned
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

// Heap entry: orders by score, then prefers earlier arrivals so that the
// heap minimum is the lowest score that arrived last.
#[derive(Debug)]
struct Candidate {
    region: ScoredRegion,
    arrival: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.region
            .score
            .total_cmp(&other.region.score)
            .then_with(|| other.arrival.cmp(&self.arrival))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Fixed-capacity min-heap keeping the `k` highest-scoring regions
///
/// A candidate replaces the held minimum only when its score is strictly
/// greater, so among equal scores the earlier candidates are kept.
/// Offering `n` candidates costs `O(n log k)`.
#[derive(Debug)]
pub struct BoundedTopK {
    heap: BinaryHeap<Reverse<Candidate>>,
    capacity: usize,
    arrivals: usize,
}

impl BoundedTopK {
    /// Create an empty selector holding at most `capacity` regions
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity + 1),
            capacity,
            arrivals: 0,
        }
    }

    /// Offer a candidate, returning whether it was kept
    pub fn offer(&mut self, region: ScoredRegion) -> bool {
        if self.capacity == 0 {
            return false;
        }

        let candidate = Candidate {
            region,
            arrival: self.arrivals,
        };
        self.arrivals += 1;

        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(candidate));
            return true;
        }

        if let Some(Reverse(min_elem)) = self.heap.peek() {
            if region.score > min_elem.region.score {
                self.heap.pop();
                self.heap.push(Reverse(candidate));
                return true;
            }
        }
        false
    }

    /// Check if `capacity` regions are held
    pub fn is_full(&self) -> bool {
        self.capacity > 0 && self.heap.len() >= self.capacity
    }

    /// Lowest score currently held
    pub fn min_score(&self) -> Option<f64> {
        self.heap.peek().map(|Reverse(min_elem)| min_elem.region.score)
    }

    /// Number of regions held
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if nothing is held
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Held regions, highest score first
    pub fn into_sorted_desc(self) -> Vec<ScoredRegion> {
        // Ascending on Reverse is descending on the candidate ordering
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(candidate)| candidate.region)
            .collect()
    }
}
