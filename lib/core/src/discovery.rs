use crate::criteria::SearchCriteria;
use crate::filter::{ArtisanFilter, Filter};
use crate::geo::{self, BoundingBox};
use crate::rank::{NearbyRanker, RankedResult};
use crate::source::CandidateSource;
use crate::Result;
use std::sync::Arc;
use tracing::{debug, warn};

/// A ranked, capped discovery result
#[derive(Debug, Clone, PartialEq)]
pub struct Discovery {
    pub results: Vec<RankedResult>,
    /// Matches before the cap was applied
    pub total_found: usize,
}

/// Nearby search over a [`CandidateSource`]
///
/// Stateless between calls; one instance can serve any number of concurrent
/// searches.
#[derive(Clone)]
pub struct DiscoveryService {
    source: Arc<dyn CandidateSource>,
    ranker: NearbyRanker,
}

impl DiscoveryService {
    pub fn new(source: Arc<dyn CandidateSource>) -> Self {
        Self {
            source,
            ranker: NearbyRanker::new(),
        }
    }

    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Discovery> {
        criteria.validate()?;

        let region = BoundingBox::around(criteria.origin, criteria.radius_km);
        let candidates = self.source.candidates_within(&region).await.map_err(|e| {
            warn!("Candidate retrieval failed: {}", e);
            e
        })?;
        let fetched = candidates.len();

        let predicate = ArtisanFilter::from_criteria(criteria);
        let mut seen = std::collections::HashSet::with_capacity(fetched);
        let matches: Vec<RankedResult> = candidates
            .into_iter()
            .filter(|artisan| predicate.matches(artisan))
            .filter_map(|artisan| {
                let coordinate = artisan.coordinate?;
                let distance_km = geo::distance(criteria.origin, coordinate);
                (distance_km <= criteria.radius_km).then(|| RankedResult::new(artisan, distance_km))
            })
            // A misbehaving source must not produce duplicate identities
            .filter(|result| seen.insert(result.id()))
            .collect();

        let total_found = matches.len();
        let results = self.ranker.rank(matches, criteria.cap);

        debug!(
            "Nearby search: fetched={} matched={} returned={} radius_km={}",
            fetched,
            total_found,
            results.len(),
            criteria.radius_km
        );

        Ok(Discovery { results, total_found })
    }
}
