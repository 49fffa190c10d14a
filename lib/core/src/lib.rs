//! # Nearby Core
//!
//! Core library for nearby artisan discovery.
//!
//! This crate provides the search engine that matches clients to artisans
//! around them:
//!
//! - [`geo`] - [`Coordinate`], haversine [`distance`] and the [`BoundingBox`] prefilter
//! - [`filter`] - specialty, rating and availability predicates
//! - [`rank`] - the [`NearbyRanker`] total order (distance, rating, id)
//! - [`DiscoveryService`] - retrieval, radius enforcement, filtering and ranking
//! - [`PaginationAdapter`] - page/page-size access over a discovery
//! - [`LocationService`] - geocoding and artisan location updates
//!
//! Storage and geocoding are collaborators behind the [`CandidateSource`],
//! [`LocationStore`] and [`Geocoder`] traits.
//!
//! ## Example
//!
//! ```rust,no_run
//! use nearby_core::{Coordinate, DiscoveryService, SearchCriteria, CandidateSource};
//! use std::sync::Arc;
//!
//! # async fn run(source: Arc<dyn CandidateSource>) -> nearby_core::Result<()> {
//! let service = DiscoveryService::new(source);
//! let criteria = SearchCriteria::new(Coordinate::new(40.0, -73.0)?)
//!     .with_radius_km(10.0)
//!     .with_specialties(["plumbing"])
//!     .with_min_rating(Some(4.0))
//!     .with_cap(20);
//! let discovery = service.search(&criteria).await?;
//! println!("{} of {} matches", discovery.results.len(), discovery.total_found);
//! # Ok(())
//! # }
//! ```

pub mod artisan;
pub mod criteria;
pub mod discovery;
pub mod error;
pub mod filter;
pub mod geo;
pub mod location;
pub mod pagination;
pub mod rank;
pub mod source;

pub use artisan::{ArtisanId, ArtisanRecord};
pub use criteria::{AvailabilityFilter, SearchCriteria};
pub use discovery::{Discovery, DiscoveryService};
pub use error::{Error, GeocodingError, Result};
pub use filter::{ArtisanFilter, Filter, FilterCondition};
pub use geo::{distance, BoundingBox, Coordinate, EARTH_RADIUS_KM};
pub use location::{LocationService, LocationUpdate};
pub use pagination::{Page, PageRequest, PaginationAdapter};
pub use rank::{NearbyRanker, RankedResult};
pub use source::{CandidateSource, GeocodedAddress, Geocoder, LocationStore};
