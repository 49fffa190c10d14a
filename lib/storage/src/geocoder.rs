// HTTP geocoder speaking the Nominatim search API
use async_trait::async_trait;
use nearby_core::{Coordinate, GeocodedAddress, Geocoder, GeocodingError, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str = concat!("nearby/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEOCODER_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// One entry of a Nominatim `/search?format=json` response.
/// Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

pub struct HttpGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGeocoder {
    pub fn new(config: GeocoderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(|e| GeocodingError::Unavailable(format!("building HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn unavailable(address: &str, reason: impl std::fmt::Display) -> GeocodingError {
        warn!("Geocoding {:?} failed: {}", address, reason);
        GeocodingError::Unavailable(reason.to_string())
    }
}

fn parse_place(address: &str, places: Vec<Place>) -> Result<GeocodedAddress> {
    let Some(place) = places.into_iter().next() else {
        return Err(GeocodingError::AddressNotFound(address.to_string()).into());
    };
    let latitude: f64 = place
        .lat
        .parse()
        .map_err(|_| GeocodingError::Unavailable(format!("bad latitude {:?}", place.lat)))?;
    let longitude: f64 = place
        .lon
        .parse()
        .map_err(|_| GeocodingError::Unavailable(format!("bad longitude {:?}", place.lon)))?;
    let coordinate = Coordinate::new(latitude, longitude)
        .map_err(|e| GeocodingError::Unavailable(e.to_string()))?;

    Ok(GeocodedAddress {
        coordinate,
        display_name: place.display_name.unwrap_or_else(|| address.to_string()),
    })
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, address: &str) -> Result<GeocodedAddress> {
        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| Self::unavailable(address, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::unavailable(address, format!("upstream returned {}", status)).into());
        }

        let places: Vec<Place> = response
            .json()
            .await
            .map_err(|e| Self::unavailable(address, e))?;
        debug!("Geocoder returned {} place(s) for {:?}", places.len(), address);

        parse_place(address, places)
    }
}
