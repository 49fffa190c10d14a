//! # nearby
//!
//! Nearby artisan discovery: given a client's position and optional filters
//! (specialty, minimum rating, availability), find the artisans around them,
//! ranked by distance and then rating.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! nearby --data-dir ./data --http-port 8000
//! curl 'http://localhost:8000/artisans/nearby?lat=40.0&lon=-73.0&skill=plumbing'
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use nearby::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run() -> nearby::Result<()> {
//! let store = Arc::new(ArtisanStore::in_memory());
//! store.upsert(
//!     ArtisanRecord::new(1, "Ada")
//!         .with_coordinate(Coordinate::new(40.01, -73.0)?)
//!         .with_specialties(["Plumbing"])
//!         .with_rating(4.8),
//! );
//!
//! let pages = PaginationAdapter::new(DiscoveryService::new(store));
//! let criteria = SearchCriteria::new(Coordinate::new(40.0, -73.0)?).with_radius_km(10.0);
//! let page = pages.page(criteria, PageRequest::new(1, 10)?).await?;
//! assert_eq!(page.total, 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Structure
//!
//! - [`nearby-core`](nearby_core) - geodistance, filters, ranking, discovery, pagination
//! - [`nearby-storage`](nearby_storage) - in-memory artisan store, JSON snapshots, HTTP geocoder
//! - [`nearby-api`](nearby_api) - actix-web REST API

// Re-export core types
pub use nearby_core::{
    distance, ArtisanId, ArtisanRecord, AvailabilityFilter, BoundingBox, CandidateSource,
    Coordinate, Discovery, DiscoveryService, Error, GeocodedAddress, Geocoder, GeocodingError,
    LocationService, LocationStore, LocationUpdate, NearbyRanker, Page, PageRequest,
    PaginationAdapter, RankedResult, Result, SearchCriteria,
};

// Re-export storage
pub use nearby_storage::{ArtisanStore, GeocoderConfig, HttpGeocoder};

// Re-export API
pub use nearby_api::{AppState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ArtisanId, ArtisanRecord, ArtisanStore, AvailabilityFilter, Coordinate, DiscoveryService,
        Error, PageRequest, PaginationAdapter, RankedResult, Result, SearchCriteria,
    };
}
