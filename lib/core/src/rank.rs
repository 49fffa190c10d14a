//! Ordering of filtered candidates.
//!
//! Results are ordered by distance ascending, then rating descending with
//! unrated artisans after every rated one, then artisan id ascending so the
//! order is total and repeatable.

use crate::artisan::{ArtisanId, ArtisanRecord};
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::cmp::{Ordering, Reverse};

/// An artisan with its distance from the search origin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub artisan: ArtisanRecord,
    pub distance_km: f64,
}

impl RankedResult {
    pub fn new(artisan: ArtisanRecord, distance_km: f64) -> Self {
        Self { artisan, distance_km }
    }

    #[inline]
    pub fn id(&self) -> ArtisanId {
        self.artisan.id
    }

    #[inline]
    pub fn rating(&self) -> Option<f64> {
        self.artisan.rating
    }

    fn sort_key(&self) -> (OrderedFloat<f64>, Reverse<Option<OrderedFloat<f64>>>, ArtisanId) {
        (
            OrderedFloat(self.distance_km),
            Reverse(self.artisan.rating.map(OrderedFloat)),
            self.artisan.id,
        )
    }
}

/// Compare two results in ranking order.
pub fn ranking_order(a: &RankedResult, b: &RankedResult) -> Ordering {
    a.sort_key().cmp(&b.sort_key())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NearbyRanker;

impl NearbyRanker {
    pub fn new() -> Self {
        Self
    }

    /// Sort candidates into ranking order and keep at most `cap` of them.
    pub fn rank(&self, candidates: Vec<RankedResult>, cap: usize) -> Vec<RankedResult> {
        if cap == 0 {
            return Vec::new();
        }
        let mut results = candidates;

        // Only the first `cap` need a full sort
        if cap < results.len() {
            results.select_nth_unstable_by(cap - 1, ranking_order);
            results.truncate(cap);
        }
        results.sort_unstable_by(ranking_order);
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn result(id: u64, distance_km: f64, rating: Option<f64>) -> RankedResult {
        let mut artisan = ArtisanRecord::new(id, format!("artisan {}", id));
        artisan.rating = rating;
        RankedResult::new(artisan, distance_km)
    }

    fn ids(results: &[RankedResult]) -> Vec<u64> {
        results.iter().map(|r| r.id().0).collect()
    }

    #[test]
    fn test_rank_by_distance() {
        let ranked = NearbyRanker::new().rank(
            vec![
                result(1, 9.0, Some(4.0)),
                result(2, 2.0, Some(3.0)),
                result(3, 5.0, Some(5.0)),
            ],
            10,
        );
        assert_eq!(ids(&ranked), vec![2, 3, 1]);
    }

    #[test]
    fn test_rating_breaks_distance_ties() {
        let ranked = NearbyRanker::new().rank(
            vec![
                result(1, 3.0, Some(3.5)),
                result(2, 3.0, None),
                result(3, 3.0, Some(4.9)),
                result(4, 3.0, Some(0.0)),
            ],
            10,
        );
        assert_eq!(ids(&ranked), vec![3, 1, 4, 2]);
    }

    #[test]
    fn test_id_breaks_full_ties() {
        let ranked = NearbyRanker::new().rank(
            vec![
                result(7, 1.0, Some(4.0)),
                result(3, 1.0, Some(4.0)),
                result(5, 1.0, None),
                result(4, 1.0, None),
            ],
            10,
        );
        assert_eq!(ids(&ranked), vec![3, 7, 4, 5]);
    }

    #[test]
    fn test_cap_keeps_best() {
        let candidates: Vec<_> = (0..50)
            .map(|i| result(i, (50 - i) as f64, Some(3.0)))
            .collect();
        let ranked = NearbyRanker::new().rank(candidates, 3);
        assert_eq!(ids(&ranked), vec![49, 48, 47]);
    }

    #[test]
    fn test_zero_cap_is_empty() {
        let ranked = NearbyRanker::new().rank(vec![result(1, 1.0, None)], 0);
        assert!(ranked.is_empty());
    }

    fn arb_result() -> impl Strategy<Value = RankedResult> {
        (0u64..40, 0u8..8, proptest::option::of(0u8..=10)).prop_map(|(id, d, r)| {
            result(id, d as f64 * 1.5, r.map(|r| r as f64 / 2.0))
        })
    }

    proptest! {
        #[test]
        fn prop_consecutive_results_are_ordered(candidates in proptest::collection::vec(arb_result(), 0..60)) {
            let ranked = NearbyRanker::new().rank(candidates, 100);
            for pair in ranked.windows(2) {
                let (r1, r2) = (&pair[0], &pair[1]);
                prop_assert!(r1.distance_km <= r2.distance_km);
                if r1.distance_km == r2.distance_km {
                    match (r1.rating(), r2.rating()) {
                        (Some(a), Some(b)) => prop_assert!(a >= b),
                        (None, Some(_)) => prop_assert!(false, "unrated sorted before rated"),
                        _ => {}
                    }
                }
            }
        }

        #[test]
        fn prop_capped_rank_is_prefix_of_full_rank(
            candidates in proptest::collection::vec(arb_result(), 0..60),
            cap in 1usize..70,
        ) {
            let full = NearbyRanker::new().rank(candidates.clone(), usize::MAX);
            let capped = NearbyRanker::new().rank(candidates, cap);
            prop_assert_eq!(capped.len(), full.len().min(cap));
            prop_assert_eq!(&full[..capped.len()], &capped[..]);
        }
    }
}
