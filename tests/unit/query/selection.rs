//! Tests for bounded top-K selection

#[cfg(test)]
mod tests {
    use gridscan::index::Rectangle;
    use gridscan::query::{BoundedTopK, ScoredRegion};

    // Tests equal scores keep the earliest candidates in arrival order
    #[test]
    fn test_bounded_top_k_prefers_earlier_ties() {
        let rect = Rectangle::new(0, 0, 0, 0);
        let mut selector = BoundedTopK::new(2);

        assert!(selector.offer(ScoredRegion::new(rect, 1.0, 10)));
        assert!(selector.offer(ScoredRegion::new(rect, 1.0, 11)));
        assert!(selector.is_full());
        assert!(!selector.offer(ScoredRegion::new(rect, 1.0, 12)), "ties do not evict");
        assert!(selector.offer(ScoredRegion::new(rect, 2.0, 13)));
        assert_eq!(selector.min_score(), Some(1.0));

        let ids: Vec<usize> = selector.into_sorted_desc().iter().map(|r| r.node_id).collect();
        assert_eq!(ids, vec![13, 10]);

        let mut empty = BoundedTopK::new(0);
        assert!(!empty.offer(ScoredRegion::new(rect, 5.0, 0)));
        assert!(!empty.is_full());
    }
}
