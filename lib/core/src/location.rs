use crate::artisan::{ArtisanId, ArtisanRecord};
use crate::geo::Coordinate;
use crate::source::{GeocodedAddress, Geocoder, LocationStore};
use crate::{Error, Result};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// A requested location change for an artisan
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LocationUpdate {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl LocationUpdate {
    fn address(&self) -> Option<&str> {
        self.location.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Address resolution and artisan location updates
#[derive(Clone)]
pub struct LocationService {
    store: Arc<dyn LocationStore>,
    geocoder: Arc<dyn Geocoder>,
}

impl LocationService {
    pub fn new(store: Arc<dyn LocationStore>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { store, geocoder }
    }

    pub async fn geocode(&self, address: &str) -> Result<GeocodedAddress> {
        let address = address.trim();
        if address.is_empty() {
            return Err(Error::validation("address must not be empty"));
        }
        self.geocoder.geocode(address).await
    }

    /// Apply a location update.
    ///
    /// A complete latitude/longitude pair is stored as given. Otherwise the
    /// address is geocoded; with neither there is nothing to store.
    pub async fn update_location(&self, id: ArtisanId, update: LocationUpdate) -> Result<ArtisanRecord> {
        let address = update.address().map(str::to_owned);

        let (coordinate, location) = match (update.latitude, update.longitude, address) {
            (Some(lat), Some(lon), address) => (Coordinate::new(lat, lon)?, address),
            (_, _, Some(address)) => {
                let geocoded = self.geocoder.geocode(&address).await?;
                (geocoded.coordinate, Some(address))
            }
            _ => {
                return Err(Error::validation(
                    "either latitude and longitude or a location address is required",
                ))
            }
        };

        let record = self.store.set_location(id, coordinate, location).await?;
        info!(
            "Updated location of artisan {} to ({}, {})",
            id,
            coordinate.latitude(),
            coordinate.longitude()
        );
        Ok(record)
    }
}
