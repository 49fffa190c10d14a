use crate::criteria::MAX_RATING;
use crate::geo::Coordinate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtisanId(pub u64);

impl std::fmt::Display for ArtisanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ArtisanId {
    fn from(id: u64) -> Self {
        ArtisanId(id)
    }
}

/// An artisan profile as held by the storage collaborator
///
/// `coordinate`, `specialties` and `rating` are genuinely optional: a profile
/// may not have a location yet, may list no skills, and has no rating until
/// its first review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtisanRecord {
    pub id: ArtisanId,
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub hourly_rate: Option<f64>,
    /// Free-text location as entered or geocoded
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
    #[serde(default)]
    pub specialties: Option<Vec<String>>,
    /// Average review score in `[0, MAX_RATING]`
    #[serde(default, deserialize_with = "bounded_rating")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub is_available: bool,
}

impl ArtisanRecord {
    #[inline]
    #[must_use]
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: ArtisanId(id),
            name: name.into(),
            bio: None,
            hourly_rate: None,
            location: None,
            coordinate: None,
            specialties: None,
            rating: None,
            is_available: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_specialties<I, S>(mut self, specialties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.specialties = Some(specialties.into_iter().map(Into::into).collect());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_availability(mut self, is_available: bool) -> Self {
        self.is_available = is_available;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_hourly_rate(mut self, rate: f64) -> Self {
        self.hourly_rate = Some(rate);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    /// Specialties as a slice, empty when none are recorded
    pub fn specialties(&self) -> &[String] {
        self.specialties.as_deref().unwrap_or(&[])
    }
}

fn bounded_rating<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let rating = Option::<f64>::deserialize(deserializer)?;
    match rating {
        Some(r) if !r.is_finite() || !(0.0..=MAX_RATING).contains(&r) => Err(
            serde::de::Error::custom(format!("rating must be within [0, {}], got {}", MAX_RATING, r)),
        ),
        _ => Ok(rating),
    }
}
