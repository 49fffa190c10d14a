//! # Nearby Storage
//!
//! Collaborators for the discovery engine: the in-memory [`ArtisanStore`]
//! (with JSON snapshot persistence) and the [`HttpGeocoder`].

pub mod geocoder;
pub mod snapshot;
pub mod store;

pub use geocoder::{GeocoderConfig, HttpGeocoder, DEFAULT_GEOCODER_URL};
pub use snapshot::{SnapshotData, SnapshotFile, SNAPSHOT_FILENAME};
pub use store::ArtisanStore;
