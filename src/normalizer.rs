//! Provider response normalization.
//!
//! The quote aggregator fronts several unaffiliated provider backends, and
//! the payload shape drifts accordingly: an optional `{success, data}`
//! envelope, provider blocks nested one level deeper than expected, `price`
//! vs `fare` field names, and occasionally a flat array of records instead
//! of provider blocks. Normalization runs an ordered chain of shape
//! matchers over the decoded JSON and emits whatever usable options it
//! finds. It is total: malformed fields skip the offending element,
//! malformed shapes fall through to the next matcher, and the worst case is
//! an empty list (which the caller turns into the fallback set).

use crate::categories::classify;
use crate::models::RideOption;
use serde_json::Value;

/// Normalizes a raw aggregator payload into ride options.
///
/// Stage order:
/// 1. unwrap a `data` envelope (one level, objects only);
/// 2. primary extraction of the known `Uber`/`Rapido` blocks;
/// 3. only if that found nothing: unwrap one further optional `data` level
///    and run the secondary extraction (`Rapido` by `fare`, `Uber` with a
///    derived price band, then a flat-array sweep).
///
/// Options are returned in emission order; the two passes deliberately
/// process providers in different orders (Uber first in the primary pass,
/// Rapido first in the secondary pass).
pub fn normalize(raw: &Value) -> Vec<RideOption> {
    let unwrapped = match raw.get("data") {
        Some(inner) if inner.is_object() => inner,
        _ => raw,
    };

    let rides = primary_pass(unwrapped);
    if !rides.is_empty() {
        return rides;
    }

    // The secondary pass re-examines the payload with the providers one
    // optional level deeper; unlike the first unwrap this one also accepts
    // non-object values so a `data: [...]` array reaches the flat sweep.
    let nested = match unwrapped.get("data") {
        Some(inner) if !inner.is_null() => inner,
        _ => unwrapped,
    };
    secondary_pass(nested)
}

/// Known-shape extraction: `Uber` then `Rapido`, fixed ETA placeholders,
/// `price` preferred over `fare` for Rapido.
fn primary_pass(raw: &Value) -> Vec<RideOption> {
    let mut rides = Vec::new();

    if let Some(options) = provider_options(raw, "Uber") {
        for (index, option) in options.iter().enumerate() {
            let fleet = text_field(option, "fleet");
            let price = text_field(option, "price");
            if let (Some(fleet), Some(price)) = (fleet, price) {
                rides.push(RideOption {
                    id: format!("uber-{}", index),
                    company: "Uber".to_string(),
                    fleet_type: fleet.clone(),
                    eta: "4-8 min".to_string(),
                    price,
                    category: classify(&fleet).to_string(),
                });
            }
        }
    }

    if let Some(options) = provider_options(raw, "Rapido") {
        for (index, option) in options.iter().enumerate() {
            let fleet = text_field(option, "fleet");
            // Rapido quotes arrive under either name.
            let price = text_field(option, "price").or_else(|| text_field(option, "fare"));
            match (fleet, price) {
                (Some(fleet), Some(price)) => rides.push(RideOption {
                    id: format!("rapido-{}", index),
                    company: "Rapido".to_string(),
                    fleet_type: fleet.clone(),
                    eta: "3-6 min".to_string(),
                    price,
                    category: classify(&fleet).to_string(),
                }),
                _ => tracing::debug!("Skipping Rapido option with missing fields"),
            }
        }
    }

    rides
}

/// Loose-shape extraction, only reached when the primary pass found
/// nothing: `Rapido` strictly by `fare`, `Uber` with a derived price band
/// and no ETA, then a flat array of `{company, type, price|fare}` records.
fn secondary_pass(raw: &Value) -> Vec<RideOption> {
    let mut rides = Vec::new();

    if let Some(options) = provider_options(raw, "Rapido") {
        for (index, option) in options.iter().enumerate() {
            let fleet = text_field(option, "fleet");
            let fare = text_field(option, "fare");
            if let (Some(fleet), Some(fare)) = (fleet, fare) {
                rides.push(RideOption {
                    id: format!("rapido-{}", index),
                    company: "Rapido".to_string(),
                    fleet_type: fleet.clone(),
                    eta: String::new(),
                    price: fare,
                    category: classify(&fleet).to_string(),
                });
            }
        }
    }

    if let Some(options) = provider_options(raw, "Uber") {
        for (index, option) in options.iter().enumerate() {
            let fleet = text_field(option, "fleet");
            let price = text_field(option, "price");
            if let (Some(fleet), Some(price)) = (fleet, price) {
                rides.push(RideOption {
                    id: format!("uber-{}", index),
                    company: "Uber".to_string(),
                    fleet_type: fleet.clone(),
                    eta: String::new(),
                    price: price_band(&price),
                    category: classify(&fleet).to_string(),
                });
            }
        }
    }

    if let Some(items) = raw.as_array() {
        for (index, item) in items.iter().enumerate() {
            let company = text_field(item, "company");
            let fleet_type = text_field(item, "type");
            let price = text_field(item, "price").or_else(|| text_field(item, "fare"));
            if let (Some(company), Some(fleet_type), Some(price)) = (company, fleet_type, price) {
                let eta = text_field(item, "eta").unwrap_or_else(|| "5-8 min".to_string());
                rides.push(RideOption {
                    id: format!("ride-{}", index),
                    company,
                    fleet_type: fleet_type.clone(),
                    eta,
                    price,
                    category: classify(&fleet_type).to_string(),
                });
            }
        }
    }

    rides
}

fn provider_options<'a>(raw: &'a Value, provider: &str) -> Option<&'a Vec<Value>> {
    raw.get(provider)?.get("options")?.as_array()
}

/// Reads a display-text field, tolerating providers that send numbers where
/// strings are expected. Empty strings and zero count as absent.
fn text_field(option: &Value, key: &str) -> Option<String> {
    match option.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => n.as_f64().filter(|v| *v != 0.0).map(|v| v.to_string()),
        _ => None,
    }
}

/// Derives a "₹min-max" band from a quoted price string.
///
/// The numeric magnitude is whatever remains after stripping everything but
/// digits and the decimal point; a positive finite value becomes
/// `₹floor(v-5)-ceil(v+5)` with the lower bound clamped at zero. Anything
/// unparseable keeps the original string.
pub fn price_band(original: &str) -> String {
    let magnitude: String = original
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    match magnitude.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => {
            let lower = (value - 5.0).floor().max(0.0) as i64;
            let upper = (value + 5.0).ceil() as i64;
            format!("₹{}-{}", lower, upper)
        }
        _ => original.to_string(),
    }
}
