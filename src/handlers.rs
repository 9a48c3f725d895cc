use crate::config::Config;
use crate::errors::{AppError, ResultExt};
use crate::models::{
    CompareResponse, Coordinate, DirectionsParams, GeocodeParams, LocationSearchParams,
    LocationSuggestion, RideQuoteRequest, RideSearchState, RouteSummary,
};
use crate::quotes;
use crate::services::{NominatimService, OsrmService};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use moka::future::Cache;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state injected into handlers.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Quote payload cache (TTL from config), keyed by the canonical search key.
    pub quote_cache: Cache<String, String>,
    /// The most recent search; overwritten on every compare call.
    pub search_state: RwLock<RideSearchState>,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "ride-compare-api",
            "version": "0.1.0"
        })),
    )
}

/// GET /api/v1/rides/compare
///
/// Validates the search query, records it as the current search, and runs
/// the comparison workflow. Upstream trouble never produces a 5xx here;
/// the workflow degrades to the synthetic fallback set with a notice.
pub async fn compare_rides(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RideQuoteRequest>,
) -> Result<Json<CompareResponse>, AppError> {
    tracing::info!("GET /rides/compare - params: {:?}", params);

    let plan = params.validate()?;
    state.search_state.write().await.record(plan.clone());

    let response = quotes::compare_rides(&state, &plan).await;
    Ok(Json(response))
}

/// GET /api/v1/locations/search
///
/// Location autocomplete backed by Nominatim. Queries shorter than 3
/// characters yield an empty list.
pub async fn search_locations(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationSearchParams>,
) -> Result<Json<Vec<LocationSuggestion>>, AppError> {
    tracing::info!("GET /locations/search - q: '{}'", params.q);

    let service = NominatimService::new(&state.config);
    let suggestions = service
        .search(&params.q, 5)
        .await
        .context("Location search failed")?;

    Ok(Json(suggestions))
}

/// GET /api/v1/locations/geocode
///
/// Resolves a free-text address to a coordinate; 404 when Nominatim has no
/// hit for it.
pub async fn geocode(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<Coordinate>, AppError> {
    tracing::info!("GET /locations/geocode - address: '{}'", params.address);

    let service = NominatimService::new(&state.config);
    let coordinate = service
        .geocode(&params.address)
        .await
        .context("Geocoding failed")?
        .ok_or_else(|| {
            AppError::NotFound(format!("No coordinates found for '{}'", params.address))
        })?;

    Ok(Json(coordinate))
}

/// GET /api/v1/routes/directions
///
/// Driving route summary between pickup and drop, backed by OSRM.
pub async fn route_directions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DirectionsParams>,
) -> Result<Json<RouteSummary>, AppError> {
    tracing::info!("GET /routes/directions - params: {:?}", params);

    let pickup = Coordinate {
        latitude: params.pickup_lat,
        longitude: params.pickup_lng,
    };
    let drop = Coordinate {
        latitude: params.drop_lat,
        longitude: params.drop_lng,
    };

    let service = OsrmService::new(&state.config);
    let summary = service
        .directions(&pickup, &drop)
        .await
        .context("Failed to fetch route from OSRM")?;

    Ok(Json(summary))
}
