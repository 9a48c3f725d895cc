use crate::config::Config;
use crate::errors::AppError;
use crate::models::{Coordinate, LocationSuggestion, QuotePlan, RouteSummary};
use reqwest::Client;
use serde_json::Value;

/// Sent on every Nominatim request; the public instance rejects anonymous
/// clients.
const USER_AGENT: &str = "ride-compare-api/0.1 (+https://github.com/ride-compare)";

pub struct QuoteApiService {
    client: Client,
    base_url: String,
}

impl QuoteApiService {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.quotes_base_url.clone(),
        }
    }

    /// Fetches the raw provider quote payload for a validated search.
    ///
    /// The aggregator expects its query parameters in a fixed order with
    /// coordinates rendered to 6 decimal places. The body is read as text
    /// first so a non-JSON body surfaces as [`AppError::DecodeError`]
    /// rather than being conflated with a transport failure.
    pub async fn fetch_ride_options(&self, plan: &QuotePlan) -> Result<Value, AppError> {
        let pickup_lat = format!("{:.6}", plan.pickup.latitude);
        let pickup_lng = format!("{:.6}", plan.pickup.longitude);
        let drop_lat = format!("{:.6}", plan.drop.latitude);
        let drop_lng = format!("{:.6}", plan.drop.longitude);

        // Build URL with proper parameter encoding; parameter order matters
        // to the aggregator, start place first.
        let url = reqwest::Url::parse_with_params(
            &format!("{}/ride-options", self.base_url),
            &[
                ("start_place", plan.start_place.trim()),
                ("destination_place", plan.destination_place.trim()),
                ("pickup_lat", pickup_lat.as_str()),
                ("pickup_lng", pickup_lng.as_str()),
                ("drop_lat", drop_lat.as_str()),
                ("drop_lng", drop_lng.as_str()),
            ],
        )
        .map_err(|e| AppError::ExternalApiError(format!("Failed to build URL: {}", e)))?;

        tracing::info!(
            "Fetching ride quotes: '{}' -> '{}'",
            plan.start_place,
            plan.destination_place
        );

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Quote API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Quote API returned error {}: {}", status, error_text);
            return Err(AppError::ExternalApiError(format!(
                "Quote API returned status {}: {}",
                status, error_text
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Failed to read response: {}", e)))?;

        let payload: Value = serde_json::from_str(&text).map_err(|e| {
            AppError::DecodeError(format!("Quote API returned a non-JSON body: {}", e))
        })?;

        tracing::debug!("Quote API payload keys: {:?}", payload_keys(&payload));
        Ok(payload)
    }
}

fn payload_keys(payload: &Value) -> Vec<&str> {
    match payload.as_object() {
        Some(map) => map.keys().map(String::as_str).collect(),
        None => Vec::new(),
    }
}

pub struct NominatimService {
    client: Client,
    base_url: String,
}

impl NominatimService {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.nominatim_base_url.clone(),
        }
    }

    /// Autocomplete search. Queries shorter than 3 characters return an
    /// empty list without touching the network.
    pub async fn search(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<Vec<LocationSuggestion>, AppError> {
        if query.trim().chars().count() < 3 {
            return Ok(Vec::new());
        }

        let limit_text = limit.to_string();
        let hits = self
            .search_raw(query, &[("limit", limit_text.as_str()), ("addressdetails", "1")])
            .await?;

        Ok(hits.iter().filter_map(suggestion_from_hit).collect())
    }

    /// Resolves an address to coordinates; `None` when Nominatim has no hit.
    pub async fn geocode(&self, address: &str) -> Result<Option<Coordinate>, AppError> {
        if address.trim().is_empty() {
            return Ok(None);
        }

        let hits = self.search_raw(address, &[("limit", "1")]).await?;
        Ok(hits.first().and_then(coordinate_from_hit))
    }

    async fn search_raw(
        &self,
        query: &str,
        extra: &[(&str, &str)],
    ) -> Result<Vec<Value>, AppError> {
        let mut params = vec![("format", "json"), ("q", query)];
        params.extend_from_slice(extra);

        let url =
            reqwest::Url::parse_with_params(&format!("{}/search", self.base_url), &params)
                .map_err(|e| AppError::ExternalApiError(format!("Failed to build URL: {}", e)))?;

        tracing::info!("Nominatim search for '{}'", query);

        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!("Nominatim returned non-success status {}", status);
            return Err(AppError::ExternalApiError(format!(
                "Nominatim returned status {}",
                status
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::DecodeError(format!("Failed to parse Nominatim response: {}", e)))
    }
}

/// Maps one Nominatim hit into a suggestion; malformed hits are skipped.
fn suggestion_from_hit(hit: &Value) -> Option<LocationSuggestion> {
    let display_name = hit.get("display_name")?.as_str()?;
    let coordinate = coordinate_from_hit(hit)?;
    let id = match hit.get("place_id")? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => return None,
    };

    Some(LocationSuggestion {
        id,
        name: display_name
            .split(',')
            .next()
            .unwrap_or(display_name)
            .trim()
            .to_string(),
        address: display_name.to_string(),
        latitude: coordinate.latitude,
        longitude: coordinate.longitude,
    })
}

/// Nominatim renders coordinates as strings ("12.9716").
fn coordinate_from_hit(hit: &Value) -> Option<Coordinate> {
    let latitude = hit.get("lat")?.as_str()?.parse().ok()?;
    let longitude = hit.get("lon")?.as_str()?.parse().ok()?;
    Some(Coordinate {
        latitude,
        longitude,
    })
}

pub struct OsrmService {
    client: Client,
    base_url: String,
}

impl OsrmService {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.osrm_base_url.clone(),
        }
    }

    /// Fetches a driving route summary between two points.
    pub async fn directions(
        &self,
        pickup: &Coordinate,
        drop: &Coordinate,
    ) -> Result<RouteSummary, AppError> {
        // OSRM takes lon,lat pairs in the path.
        let path = format!(
            "{}/route/v1/driving/{:.6},{:.6};{:.6},{:.6}",
            self.base_url,
            pickup.longitude,
            pickup.latitude,
            drop.longitude,
            drop.latitude
        );
        let url = reqwest::Url::parse_with_params(
            &path,
            &[("overview", "full"), ("geometries", "geojson")],
        )
        .map_err(|e| AppError::ExternalApiError(format!("Failed to build URL: {}", e)))?;

        tracing::info!("Fetching OSRM route");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("OSRM request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalApiError(format!(
                "OSRM returned status {}",
                status
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::DecodeError(format!("Failed to parse OSRM response: {}", e)))?;

        if body.get("code").and_then(Value::as_str) != Some("Ok") {
            return Err(AppError::ExternalApiError(format!(
                "OSRM reported failure code {:?}",
                body.get("code")
            )));
        }

        let route = body
            .get("routes")
            .and_then(Value::as_array)
            .and_then(|routes| routes.first())
            .ok_or_else(|| AppError::NotFound("No route between the given points".to_string()))?;

        Ok(RouteSummary {
            distance_meters: route.get("distance").and_then(Value::as_f64).unwrap_or(0.0),
            duration_seconds: route.get("duration").and_then(Value::as_f64).unwrap_or(0.0),
            geometry: route.get("geometry").cloned().unwrap_or(Value::Null),
        })
    }
}
