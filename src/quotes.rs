//! Ride comparison workflow.
//!
//! Ties the pieces together for one search: fetch the raw quote payload
//! (through the TTL cache), decode, normalize, and apply the fallback
//! policy. Upstream trouble never escapes this module as an error; every
//! failure class degrades to the synthetic fallback set with a notice
//! telling the user which kind of trouble it was.

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::{CompareResponse, QuotePlan};
use crate::normalizer::normalize;
use crate::services::QuoteApiService;
use serde_json::Value;
use std::sync::Arc;

/// Shown when the upstream request failed outright.
pub const CONNECTION_ERROR_NOTICE: &str =
    "Couldn't fetch real-time prices. Showing estimated prices instead.";

/// Shown when the upstream body was not decodable as JSON.
pub const INVALID_DATA_NOTICE: &str =
    "Invalid data received. Showing estimated prices instead.";

/// Shown when the payload decoded fine but yielded no usable options.
pub const NO_RIDES_NOTICE: &str =
    "No ride options were found from the providers. Showing estimated prices instead.";

/// Runs the full comparison workflow for a validated search.
///
/// Fallback policy, applied in order:
/// - transport failure (connect error, non-2xx) -> fallback set, connection notice;
/// - undecodable body -> fallback set, invalid-data notice;
/// - decoded envelope reporting `success: false` -> fallback set, the
///   upstream's own error message;
/// - zero options after normalization -> fallback set, no-rides notice;
/// - otherwise the normalized options verbatim.
pub async fn compare_rides(state: &Arc<AppState>, plan: &QuotePlan) -> CompareResponse {
    let payload = match fetch_quotes(state, plan).await {
        Ok(payload) => payload,
        Err(AppError::DecodeError(msg)) => {
            tracing::warn!("Quote payload not decodable: {}", msg);
            return CompareResponse::fallback(INVALID_DATA_NOTICE);
        }
        Err(e) => {
            tracing::warn!("Quote request failed: {}", e);
            return CompareResponse::fallback(CONNECTION_ERROR_NOTICE);
        }
    };

    if matches!(payload.get("success"), Some(Value::Bool(false))) {
        let message = match payload.get("error").and_then(Value::as_str) {
            Some(error) => format!("API Error: {}", error),
            None => "Could not load ride prices".to_string(),
        };
        tracing::warn!("Quote API reported failure: {}", message);
        return CompareResponse::fallback(format!(
            "{}. Showing estimated prices instead.",
            message
        ));
    }

    let rides = normalize(&payload);
    if rides.is_empty() {
        tracing::info!("Payload yielded no usable options, serving the fallback set");
        return CompareResponse::fallback(NO_RIDES_NOTICE);
    }

    tracing::info!("Normalized {} ride options", rides.len());
    CompareResponse::live(rides)
}

/// Returns the quote payload for `plan`, consulting the response cache
/// first. Cache entries are the serialized payload text; unreadable
/// entries are discarded and refetched.
async fn fetch_quotes(state: &Arc<AppState>, plan: &QuotePlan) -> Result<Value, AppError> {
    let cache_key = plan.cache_key();

    if let Some(cached) = state.quote_cache.get(&cache_key).await {
        match serde_json::from_str(&cached) {
            Ok(payload) => {
                tracing::debug!("Quote cache HIT for {}", cache_key);
                return Ok(payload);
            }
            Err(e) => {
                tracing::warn!("Discarding unreadable cache entry for {}: {}", cache_key, e);
            }
        }
    }

    let service = QuoteApiService::new(&state.config);
    let payload = service.fetch_ride_options(plan).await?;

    state
        .quote_cache
        .insert(cache_key, payload.to_string())
        .await;

    Ok(payload)
}
