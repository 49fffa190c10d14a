// Artisan predicates: specialty, rating floor, availability
use crate::artisan::ArtisanRecord;
use crate::criteria::{AvailabilityFilter, SearchCriteria};

pub trait Filter {
    fn matches(&self, artisan: &ArtisanRecord) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    /// Any listed specialty matches, case-insensitively. Values are lowercase.
    AnySpecialty(Vec<String>),
    /// Rating at or above the floor; unrated artisans never pass
    MinRating(f64),
    Availability(AvailabilityFilter),
    And(Vec<FilterCondition>),
}

/// The combined predicate for one search
#[derive(Debug, Clone)]
pub struct ArtisanFilter {
    condition: FilterCondition,
}

impl ArtisanFilter {
    pub fn new(condition: FilterCondition) -> Self {
        Self { condition }
    }

    /// Build the AND of every filter the criteria activates.
    pub fn from_criteria(criteria: &SearchCriteria) -> Self {
        let mut conditions = Vec::with_capacity(3);
        if !criteria.specialties().is_empty() {
            conditions.push(FilterCondition::AnySpecialty(criteria.specialties().to_vec()));
        }
        if let Some(min_rating) = criteria.min_rating {
            conditions.push(FilterCondition::MinRating(min_rating));
        }
        if criteria.availability != AvailabilityFilter::Any {
            conditions.push(FilterCondition::Availability(criteria.availability));
        }
        Self::new(FilterCondition::And(conditions))
    }

    fn matches_condition(condition: &FilterCondition, artisan: &ArtisanRecord) -> bool {
        match condition {
            FilterCondition::AnySpecialty(wanted) => artisan
                .specialties()
                .iter()
                .map(|s| s.trim().to_lowercase())
                .any(|s| wanted.iter().any(|w| *w == s)),
            FilterCondition::MinRating(floor) => {
                artisan.rating.map(|r| r >= *floor).unwrap_or(false)
            }
            FilterCondition::Availability(availability) => availability.admits(artisan.is_available),
            FilterCondition::And(conditions) => {
                conditions.iter().all(|c| Self::matches_condition(c, artisan))
            }
        }
    }
}

impl Filter for ArtisanFilter {
    fn matches(&self, artisan: &ArtisanRecord) -> bool {
        Self::matches_condition(&self.condition, artisan)
    }
}

/// Keep the candidates that pass every active filter of `criteria`, in input order.
pub fn filter(candidates: Vec<ArtisanRecord>, criteria: &SearchCriteria) -> Vec<ArtisanRecord> {
    let predicate = ArtisanFilter::from_criteria(criteria);
    candidates.into_iter().filter(|a| predicate.matches(a)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Coordinate;

    fn criteria() -> SearchCriteria {
        SearchCriteria::new(Coordinate::new(40.0, -73.0).unwrap())
            .with_availability(AvailabilityFilter::Any)
    }

    fn ids(records: &[ArtisanRecord]) -> Vec<u64> {
        records.iter().map(|a| a.id.0).collect()
    }

    #[test]
    fn test_specialty_any_match_case_insensitive() {
        let candidates = vec![
            ArtisanRecord::new(1, "a").with_specialties(["Plumbing", "Tiling"]),
            ArtisanRecord::new(2, "b").with_specialties(["ELECTRICAL"]),
            ArtisanRecord::new(3, "c").with_specialties(Vec::<String>::new()),
            ArtisanRecord::new(4, "d"),
        ];
        let c = criteria().with_specialties(["plumbing", "electrical"]);
        assert_eq!(ids(&filter(candidates, &c)), vec![1, 2]);
    }

    #[test]
    fn test_empty_specialty_filter_passes_everyone() {
        let candidates = vec![
            ArtisanRecord::new(1, "a").with_specialties(["Plumbing"]),
            ArtisanRecord::new(2, "b"),
        ];
        let c = criteria().with_specialties(["   "]);
        assert_eq!(ids(&filter(candidates, &c)), vec![1, 2]);
    }

    #[test]
    fn test_min_rating_excludes_unrated() {
        let candidates = vec![
            ArtisanRecord::new(1, "a").with_rating(5.0),
            ArtisanRecord::new(2, "b"),
            ArtisanRecord::new(3, "c").with_rating(4.5),
            ArtisanRecord::new(4, "d").with_rating(3.0),
        ];
        let c = criteria().with_min_rating(Some(4.5));
        assert_eq!(ids(&filter(candidates, &c)), vec![1, 3]);
    }

    #[test]
    fn test_min_rating_zero_still_excludes_unrated() {
        let candidates = vec![
            ArtisanRecord::new(1, "a").with_rating(0.0),
            ArtisanRecord::new(2, "b"),
        ];
        let c = criteria().with_min_rating(Some(0.0));
        assert_eq!(ids(&filter(candidates, &c)), vec![1]);
    }

    #[test]
    fn test_availability_tristate() {
        let candidates = || {
            vec![
                ArtisanRecord::new(1, "a").with_availability(true),
                ArtisanRecord::new(2, "b").with_availability(false),
            ]
        };
        let any = criteria();
        let available = criteria().with_availability(AvailabilityFilter::Available);
        let unavailable = criteria().with_availability(AvailabilityFilter::Unavailable);
        assert_eq!(ids(&filter(candidates(), &any)), vec![1, 2]);
        assert_eq!(ids(&filter(candidates(), &available)), vec![1]);
        assert_eq!(ids(&filter(candidates(), &unavailable)), vec![2]);
    }

    #[test]
    fn test_filters_combine_with_and() {
        let candidates = vec![
            ArtisanRecord::new(1, "a").with_specialties(["carpentry"]).with_rating(4.8),
            ArtisanRecord::new(2, "b").with_specialties(["carpentry"]).with_rating(3.0),
            ArtisanRecord::new(3, "c").with_specialties(["painting"]).with_rating(4.9),
            ArtisanRecord::new(4, "d")
                .with_specialties(["carpentry"])
                .with_rating(4.9)
                .with_availability(false),
        ];
        let c = criteria()
            .with_specialties(["Carpentry"])
            .with_min_rating(Some(4.0))
            .with_availability(AvailabilityFilter::Available);
        assert_eq!(ids(&filter(candidates, &c)), vec![1]);
    }

    #[test]
    fn test_no_active_filters_builds_empty_and() {
        let f = ArtisanFilter::from_criteria(&criteria());
        assert_eq!(f.condition, FilterCondition::And(vec![]));
        assert!(f.matches(&ArtisanRecord::new(1, "a").with_availability(false)));
    }
}
