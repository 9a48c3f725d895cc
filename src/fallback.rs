//! Fixed synthetic ride options served when live data is unavailable.
//!
//! The set is a frozen constant: same ids, labels, prices, and categories
//! on every call, so screens and snapshot assertions see identical output
//! whether the upstream was unreachable, returned garbage, or simply had
//! no rides. The category labels here are part of the frozen fixture and
//! are not re-derived through classification.

use crate::models::RideOption;

/// Returns the six-option synthetic fallback set.
pub fn fallback_rides() -> Vec<RideOption> {
    vec![
        RideOption {
            id: "uber-1".to_string(),
            company: "Uber".to_string(),
            fleet_type: "UberGo".to_string(),
            eta: "4 min".to_string(),
            price: "₹289".to_string(),
            category: "Economy".to_string(),
        },
        RideOption {
            id: "uber-2".to_string(),
            company: "Uber".to_string(),
            fleet_type: "Premier".to_string(),
            eta: "6 min".to_string(),
            price: "₹349".to_string(),
            category: "Comfort".to_string(),
        },
        RideOption {
            id: "uber-3".to_string(),
            company: "Uber".to_string(),
            fleet_type: "UberXL".to_string(),
            eta: "8 min".to_string(),
            price: "₹480".to_string(),
            category: "Extra Large".to_string(),
        },
        RideOption {
            id: "rapido-1".to_string(),
            company: "Rapido".to_string(),
            fleet_type: "Bike".to_string(),
            eta: "3 min".to_string(),
            price: "₹120".to_string(),
            category: "Bike".to_string(),
        },
        RideOption {
            id: "ola-1".to_string(),
            company: "Ola".to_string(),
            fleet_type: "Micro".to_string(),
            eta: "5 min".to_string(),
            price: "₹279".to_string(),
            category: "Economy".to_string(),
        },
        RideOption {
            id: "ola-2".to_string(),
            company: "Ola".to_string(),
            fleet_type: "Prime Sedan".to_string(),
            eta: "7 min".to_string(),
            price: "₹339".to_string(),
            category: "Comfort".to_string(),
        },
    ]
}
