use crate::geo::Coordinate;
use crate::{Error, Result};

pub const DEFAULT_RADIUS_KM: f64 = 25.0;
pub const MAX_RADIUS_KM: f64 = 200.0;
pub const MAX_RATING: f64 = 5.0;
pub const DEFAULT_CAP: usize = 20;

/// Tri-state availability requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvailabilityFilter {
    /// No availability constraint
    Any,
    /// Only artisans currently taking work
    #[default]
    Available,
    /// Only artisans currently not taking work
    Unavailable,
}

impl AvailabilityFilter {
    /// Map an end-user supplied flag to a filter.
    ///
    /// Omitting the flag means "available only": an unfiltered nearby search
    /// surfaces only artisans who can currently be booked. Callers who want
    /// every artisan regardless of availability must ask for
    /// [`AvailabilityFilter::Any`] explicitly.
    pub fn from_request(flag: Option<bool>) -> Self {
        match flag {
            None | Some(true) => AvailabilityFilter::Available,
            Some(false) => AvailabilityFilter::Unavailable,
        }
    }

    #[inline]
    pub fn admits(&self, is_available: bool) -> bool {
        match self {
            AvailabilityFilter::Any => true,
            AvailabilityFilter::Available => is_available,
            AvailabilityFilter::Unavailable => !is_available,
        }
    }
}

/// Everything a nearby search needs to know
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    pub origin: Coordinate,
    pub radius_km: f64,
    /// Lowercased, trimmed, non-empty specialty names; empty means no filter
    specialties: Vec<String>,
    pub min_rating: Option<f64>,
    pub availability: AvailabilityFilter,
    pub cap: usize,
}

impl SearchCriteria {
    pub fn new(origin: Coordinate) -> Self {
        Self {
            origin,
            radius_km: DEFAULT_RADIUS_KM,
            specialties: Vec::new(),
            min_rating: None,
            availability: AvailabilityFilter::default(),
            cap: DEFAULT_CAP,
        }
    }

    #[must_use]
    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    /// Set the specialty filter. Entries are trimmed and lowercased; blank
    /// entries are dropped.
    #[must_use]
    pub fn with_specialties<I, S>(mut self, specialties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.specialties = specialties
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        self.specialties.sort();
        self.specialties.dedup();
        self
    }

    #[must_use]
    pub fn with_min_rating(mut self, min_rating: Option<f64>) -> Self {
        self.min_rating = min_rating;
        self
    }

    #[must_use]
    pub fn with_availability(mut self, availability: AvailabilityFilter) -> Self {
        self.availability = availability;
        self
    }

    #[must_use]
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap;
        self
    }

    #[inline]
    pub fn specialties(&self) -> &[String] {
        &self.specialties
    }

    pub fn validate(&self) -> Result<()> {
        if !self.radius_km.is_finite() || !(0.0..=MAX_RADIUS_KM).contains(&self.radius_km) {
            return Err(Error::validation(format!(
                "radius_km must be within [0, {}], got {}",
                MAX_RADIUS_KM, self.radius_km
            )));
        }
        if let Some(min_rating) = self.min_rating {
            if !min_rating.is_finite() || !(0.0..=MAX_RATING).contains(&min_rating) {
                return Err(Error::validation(format!(
                    "min_rating must be within [0, {}], got {}",
                    MAX_RATING, min_rating
                )));
            }
        }
        if self.cap == 0 {
            return Err(Error::validation("result cap must be at least 1"));
        }
        Ok(())
    }
}
