use actix_cors::Cors;
use actix_web::error::InternalError;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use nearby_core::{
    ArtisanId, AvailabilityFilter, Coordinate, DiscoveryService, Error, GeocodingError, Geocoder,
    LocationService, LocationUpdate, PageRequest, PaginationAdapter, RankedResult, SearchCriteria,
};
use nearby_storage::ArtisanStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

const DEFAULT_RADIUS_KM: f64 = 25.0;
const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}

fn default_page() -> usize {
    nearby_core::pagination::DEFAULT_PAGE
}

fn default_page_size() -> usize {
    nearby_core::pagination::DEFAULT_PAGE_SIZE
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Flat query parameters of `GET /artisans/nearby`
#[derive(Debug, Deserialize)]
struct NearbyQuery {
    lat: f64,
    lon: f64,
    #[serde(default = "default_radius_km")]
    radius_km: f64,
    skill: Option<String>,
    min_rating: Option<f64>,
    available: Option<bool>,
    #[serde(default = "default_page")]
    page: usize,
    #[serde(default = "default_page_size")]
    page_size: usize,
}

/// Body of `POST /artisans/nearby`
#[derive(Debug, Deserialize)]
struct NearbyRequest {
    latitude: f64,
    longitude: f64,
    #[serde(default = "default_radius_km")]
    radius_km: f64,
    #[serde(default)]
    specialties: Option<Vec<String>>,
    #[serde(default)]
    min_rating: Option<f64>,
    #[serde(default)]
    is_available: Option<bool>,
    #[serde(default = "default_limit")]
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct GeocodeRequest {
    address: String,
}

#[derive(Serialize)]
struct GeocodeResponse {
    latitude: f64,
    longitude: f64,
    formatted_address: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct ArtisanOut {
    id: u64,
    name: String,
    bio: Option<String>,
    hourly_rate: Option<f64>,
    location: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    specialties: Vec<String>,
    rating: Option<f64>,
    is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance_km: Option<f64>,
}

impl ArtisanOut {
    fn from_record(artisan: nearby_core::ArtisanRecord, distance_km: Option<f64>) -> Self {
        Self {
            id: artisan.id.0,
            latitude: artisan.coordinate.map(|c| c.latitude()),
            longitude: artisan.coordinate.map(|c| c.longitude()),
            specialties: artisan.specialties.unwrap_or_default(),
            name: artisan.name,
            bio: artisan.bio,
            hourly_rate: artisan.hourly_rate,
            location: artisan.location,
            rating: artisan.rating,
            is_available: artisan.is_available,
            // Display only; ranking used the full-precision distance
            distance_km: distance_km.map(|d| (d * 100.0).round() / 100.0),
        }
    }
}

impl From<RankedResult> for ArtisanOut {
    fn from(result: RankedResult) -> Self {
        Self::from_record(result.artisan, Some(result.distance_km))
    }
}

#[derive(Serialize, Deserialize)]
struct PaginatedArtisans {
    items: Vec<ArtisanOut>,
    total: usize,
    page: usize,
    page_size: usize,
}

#[derive(Serialize, Deserialize)]
struct NearbyArtisansResponse {
    artisans: Vec<ArtisanOut>,
    total_found: usize,
}

/// Shared services behind every route
#[derive(Clone)]
pub struct AppState {
    store: Arc<ArtisanStore>,
    discovery: DiscoveryService,
    pages: PaginationAdapter,
    locations: LocationService,
}

impl AppState {
    pub fn new(store: Arc<ArtisanStore>, geocoder: Arc<dyn Geocoder>) -> Self {
        let discovery = DiscoveryService::new(store.clone());
        Self {
            pages: PaginationAdapter::new(discovery.clone()),
            locations: LocationService::new(store.clone(), geocoder),
            discovery,
            store,
        }
    }
}

pub struct RestApi;

impl RestApi {
    pub async fn start(state: AppState, bind: &str, port: u16) -> std::io::Result<()> {
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .configure(|cfg| RestApi::configure(cfg, state.clone()))
        })
        .bind((bind, port))?
        .run()
        .await
    }

    /// Register state, extractor error handlers and routes
    pub fn configure(cfg: &mut web::ServiceConfig, state: AppState) {
        cfg.app_data(web::Data::new(state))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                let body = serde_json::json!({ "error": err.to_string() });
                InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
            }))
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                let body = serde_json::json!({ "error": err.to_string() });
                InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
            }))
            .route("/health", web::get().to(health))
            .route("/artisans/nearby", web::get().to(get_nearby_artisans))
            .route("/artisans/nearby", web::post().to(find_nearby_artisans))
            .route("/artisans/geocode", web::post().to(geocode_address))
            .route("/artisans/{id}/location", web::put().to(update_location));
    }
}

fn error_response(e: &Error) -> HttpResponse {
    if !e.is_client_error() {
        warn!("Request failed: {}", e);
    }
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        Error::Validation(_) => HttpResponse::BadRequest().json(body),
        Error::ArtisanNotFound(_) => HttpResponse::NotFound().json(body),
        Error::Geocoding(GeocodingError::AddressNotFound(_)) => HttpResponse::NotFound().json(body),
        Error::Geocoding(GeocodingError::Unavailable(_)) => {
            HttpResponse::ServiceUnavailable().json(body)
        }
        Error::Retrieval(_) | Error::Io(_) | Error::Serialization(_) => {
            HttpResponse::InternalServerError().json(body)
        }
    }
}

async fn health(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "artisans": state.store.len(),
    })))
}

/// Page-based search: fetches `page * page_size` ranked results and returns one page of them.
async fn get_nearby_artisans(
    state: web::Data<AppState>,
    query: web::Query<NearbyQuery>,
) -> ActixResult<HttpResponse> {
    let query = query.into_inner();

    let prepared = Coordinate::new(query.lat, query.lon).and_then(|origin| {
        let criteria = SearchCriteria::new(origin)
            .with_radius_km(query.radius_km)
            .with_specialties(query.skill.as_deref())
            .with_min_rating(query.min_rating)
            .with_availability(AvailabilityFilter::from_request(query.available));
        let request = PageRequest::new(query.page, query.page_size)?;
        Ok((criteria, request))
    });
    let (criteria, request) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => return Ok(error_response(&e)),
    };

    match state.pages.page(criteria, request).await {
        Ok(page) => Ok(HttpResponse::Ok().json(PaginatedArtisans {
            items: page.items.into_iter().map(ArtisanOut::from).collect(),
            total: page.total,
            page: page.page,
            page_size: page.page_size,
        })),
        Err(e) => Ok(error_response(&e)),
    }
}

/// Single-shot search: the full ranked set up to `limit`.
async fn find_nearby_artisans(
    state: web::Data<AppState>,
    req: web::Json<NearbyRequest>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();

    if !(1..=MAX_LIMIT).contains(&req.limit) {
        return Ok(error_response(&Error::validation(format!(
            "limit must be within [1, {}], got {}",
            MAX_LIMIT, req.limit
        ))));
    }
    let origin = match Coordinate::new(req.latitude, req.longitude) {
        Ok(origin) => origin,
        Err(e) => return Ok(error_response(&e)),
    };
    let criteria = SearchCriteria::new(origin)
        .with_radius_km(req.radius_km)
        .with_specialties(req.specialties.unwrap_or_default())
        .with_min_rating(req.min_rating)
        .with_availability(AvailabilityFilter::from_request(req.is_available))
        .with_cap(req.limit);

    match state.discovery.search(&criteria).await {
        Ok(discovery) => Ok(HttpResponse::Ok().json(NearbyArtisansResponse {
            artisans: discovery.results.into_iter().map(ArtisanOut::from).collect(),
            total_found: discovery.total_found,
        })),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn geocode_address(
    state: web::Data<AppState>,
    req: web::Json<GeocodeRequest>,
) -> ActixResult<HttpResponse> {
    match state.locations.geocode(&req.address).await {
        Ok(geocoded) => Ok(HttpResponse::Ok().json(GeocodeResponse {
            latitude: geocoded.coordinate.latitude(),
            longitude: geocoded.coordinate.longitude(),
            formatted_address: geocoded.display_name,
        })),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn update_location(
    state: web::Data<AppState>,
    path: web::Path<u64>,
    req: web::Json<LocationUpdate>,
) -> ActixResult<HttpResponse> {
    let id = ArtisanId(path.into_inner());
    match state.locations.update_location(id, req.into_inner()).await {
        Ok(record) => Ok(HttpResponse::Ok().json(ArtisanOut::from_record(record, None))),
        Err(e) => Ok(error_response(&e)),
    }
}
