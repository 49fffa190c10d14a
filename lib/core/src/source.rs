//! External collaborators the discovery engine depends on.

use crate::artisan::{ArtisanId, ArtisanRecord};
use crate::geo::{BoundingBox, Coordinate};
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Candidate retrieval from the artisan store
///
/// Implementations may return any superset of the artisans inside `region`;
/// the exact radius is enforced by the caller. Failures are reported as
/// [`crate::Error::Retrieval`].
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn candidates_within(&self, region: &BoundingBox) -> Result<Vec<ArtisanRecord>>;
}

/// A resolved address
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodedAddress {
    pub coordinate: Coordinate,
    pub display_name: String,
}

/// Address-to-coordinate resolution
///
/// Failures are [`crate::GeocodingError`]s: `AddressNotFound` when the
/// service answered but knows no such place, `Unavailable` for everything else.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeocodedAddress>;
}

/// Location mutation on the artisan store
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Store a new coordinate (and optional display location) for an artisan,
    /// returning the updated record. Unknown ids fail with
    /// [`crate::Error::ArtisanNotFound`].
    async fn set_location(
        &self,
        id: ArtisanId,
        coordinate: Coordinate,
        location: Option<String>,
    ) -> Result<ArtisanRecord>;
}
