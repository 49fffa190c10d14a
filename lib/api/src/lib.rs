//! # Nearby API
//!
//! actix-web REST surface of the discovery engine. `GET /artisans/nearby`
//! (paged) and `POST /artisans/nearby` (single shot) share one
//! [`nearby_core::DiscoveryService`], so page 1 of size `k` always equals the
//! first `k` results of the POST search for the same inputs.

pub mod rest;

pub use rest::{AppState, RestApi};
