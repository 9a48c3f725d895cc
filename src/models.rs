use crate::errors::AppError;
use crate::fallback::fallback_rides;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============ Query Models ============

/// Raw ride comparison query as received on the wire.
///
/// Field names match the upstream quote API contract exactly
/// (`start_place`, `destination_place`, `pickup_lat`, ...). Coordinates are
/// optional at the edge and validated into a [`QuotePlan`] before dispatch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RideQuoteRequest {
    /// Display name of the pickup location.
    pub start_place: String,
    /// Display name of the drop location.
    pub destination_place: String,
    pub pickup_lat: Option<f64>,
    pub pickup_lng: Option<f64>,
    pub drop_lat: Option<f64>,
    pub drop_lng: Option<f64>,
}

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A validated ride comparison query, ready for dispatch to the quote API.
#[derive(Debug, Clone, Serialize)]
pub struct QuotePlan {
    pub start_place: String,
    pub destination_place: String,
    pub pickup: Coordinate,
    pub drop: Coordinate,
}

impl RideQuoteRequest {
    /// Validates the raw query into a [`QuotePlan`].
    ///
    /// Both place names must be non-empty after trimming, and every
    /// coordinate must be present, finite, and non-zero. A value of exactly
    /// zero degrees is rejected: the upstream clients use 0 as an "unset"
    /// placeholder, so it never denotes a real pickup or drop point here.
    pub fn validate(&self) -> Result<QuotePlan, AppError> {
        let start_place = self.start_place.trim();
        if start_place.is_empty() {
            return Err(AppError::BadRequest(
                "Missing source location name".to_string(),
            ));
        }

        let destination_place = self.destination_place.trim();
        if destination_place.is_empty() {
            return Err(AppError::BadRequest(
                "Missing destination location name".to_string(),
            ));
        }

        let pickup = validated_coordinate(self.pickup_lat, self.pickup_lng, "pickup")?;
        let drop = validated_coordinate(self.drop_lat, self.drop_lng, "drop")?;

        Ok(QuotePlan {
            start_place: start_place.to_string(),
            destination_place: destination_place.to_string(),
            pickup,
            drop,
        })
    }
}

fn validated_coordinate(
    lat: Option<f64>,
    lng: Option<f64>,
    which: &str,
) -> Result<Coordinate, AppError> {
    let (Some(latitude), Some(longitude)) = (lat, lng) else {
        return Err(AppError::BadRequest(format!(
            "Missing {} coordinates",
            which
        )));
    };

    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(AppError::BadRequest(format!(
            "Invalid {} coordinates",
            which
        )));
    }

    // Zero is the "unset" sentinel, not a location.
    if latitude == 0.0 || longitude == 0.0 {
        return Err(AppError::BadRequest(format!(
            "Invalid {} coordinates (zeros detected)",
            which
        )));
    }

    Ok(Coordinate {
        latitude,
        longitude,
    })
}

impl QuotePlan {
    /// Cache key for the quote payload of this exact search.
    ///
    /// Uses the same 6-decimal rendering as the upstream request so that two
    /// searches that would produce identical requests share one cache entry.
    pub fn cache_key(&self) -> String {
        format!(
            "quotes:{}:{}:{:.6},{:.6}:{:.6},{:.6}",
            self.start_place,
            self.destination_place,
            self.pickup.latitude,
            self.pickup.longitude,
            self.drop.latitude,
            self.drop.longitude
        )
    }
}

// ============ Ride Option Models ============

/// A single normalized ride option in the shared display shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RideOption {
    /// Unique within one normalization pass, e.g. `"uber-0"`.
    pub id: String,
    /// Provider display name ("Uber", "Rapido", "Ola", ...).
    pub company: String,
    /// Provider-specific vehicle/service label, e.g. "UberGo".
    #[serde(rename = "fleetType")]
    pub fleet_type: String,
    /// Free-text arrival estimate; empty when unavailable.
    pub eta: String,
    /// Currency-prefixed display price, e.g. "₹289" or "₹284-294".
    pub price: String,
    /// Cross-provider category bucket used for filtering.
    pub category: String,
}

/// Where the rides in a [`CompareResponse`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// Normalized from a live provider response.
    Live,
    /// The fixed synthetic set substituted when live data is unavailable.
    Fallback,
}

/// Response payload for the ride comparison endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    pub success: bool,
    pub source: DataSource,
    /// User-facing notice explaining why estimated prices are shown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub rides: Vec<RideOption>,
}

impl CompareResponse {
    /// A successful response carrying live, normalized ride options.
    pub fn live(rides: Vec<RideOption>) -> Self {
        Self {
            success: true,
            source: DataSource::Live,
            notice: None,
            rides,
        }
    }

    /// A response carrying the synthetic fallback set and a notice for the user.
    pub fn fallback(notice: impl Into<String>) -> Self {
        Self {
            success: true,
            source: DataSource::Fallback,
            notice: Some(notice.into()),
            rides: fallback_rides(),
        }
    }
}

// ============ Location Models ============

/// An autocomplete suggestion produced from a Nominatim search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationSuggestion {
    pub id: String,
    /// Short label (display name up to the first comma).
    pub name: String,
    /// Full display address.
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Driving route summary produced from an OSRM response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// GeoJSON route geometry, passed through untouched.
    pub geometry: Value,
}

// ============ Request Parameter Models ============

/// Query parameters for the location autocomplete endpoint.
#[derive(Debug, Deserialize)]
pub struct LocationSearchParams {
    pub q: String,
}

/// Query parameters for the geocoding endpoint.
#[derive(Debug, Deserialize)]
pub struct GeocodeParams {
    pub address: String,
}

/// Query parameters for the route directions endpoint.
#[derive(Debug, Deserialize)]
pub struct DirectionsParams {
    pub pickup_lat: f64,
    pub pickup_lng: f64,
    pub drop_lat: f64,
    pub drop_lng: f64,
}

// ============ Search State ============

/// The most recent search, owned by the application state.
///
/// Replaces the single in-memory "current ride data" record the mobile app
/// kept: each search overwrites the previous one, last writer wins.
#[derive(Debug, Default)]
pub struct RideSearchState {
    pub plan: Option<QuotePlan>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl RideSearchState {
    /// Records `plan` as the current search.
    pub fn record(&mut self, plan: QuotePlan) {
        self.plan = Some(plan);
        self.updated_at = Some(Utc::now());
    }
}
