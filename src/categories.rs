//! Fleet-type category table and classification.
//!
//! Providers label the same class of vehicle differently ("UberGo",
//! "Go Sedan", "Prime Sedan"); the category table maps those labels into
//! the cross-provider buckets the client filters by.

/// A category bucket plus the fleet-type substrings that select it.
#[derive(Debug, Clone, Copy)]
pub struct FleetCategory {
    pub name: &'static str,
    /// Case-insensitive match substrings. Empty means "matches everything"
    /// (only the reserved "All" filter uses that).
    pub types: &'static [&'static str],
}

/// Ordered category table. Order is load-bearing: classification returns
/// the first category whose substrings match.
pub const FLEET_CATEGORIES: &[FleetCategory] = &[
    FleetCategory {
        name: "All",
        types: &[],
    },
    FleetCategory {
        name: "Two-Wheeler",
        types: &["Bike", "Moto", "Moto Saver"],
    },
    FleetCategory {
        name: "Auto",
        types: &["Auto"],
    },
    FleetCategory {
        name: "Economy",
        types: &["Mini", "Uber Go", "Go Sedan"],
    },
    FleetCategory {
        name: "Standard",
        types: &["Cab Non AC", "Prime", "Premier"],
    },
    FleetCategory {
        name: "Premium",
        types: &["Cab Premium", "Black", "Uber Pet"],
    },
    FleetCategory {
        name: "Large",
        types: &["XL", "UberXL", "XL+ (Innova)"],
    },
];

/// Category returned when no table entry matches.
pub const DEFAULT_CATEGORY: &str = "Standard";

/// Classifies a provider fleet-type label into a canonical category.
///
/// Matching is case-insensitive substring containment with whitespace
/// folded out of both sides, so "UberGo" and "Uber Go4" both select the
/// table's "Uber Go" entry. The reserved "All" filter entry is skipped.
/// Total: every input maps to some category, unknown labels map to
/// [`DEFAULT_CATEGORY`].
pub fn classify(fleet_type: &str) -> &'static str {
    let needle = fold(fleet_type);

    for category in FLEET_CATEGORIES {
        if category.name == "All" {
            continue;
        }
        if category
            .types
            .iter()
            .any(|fleet| needle.contains(&fold(fleet)))
        {
            return category.name;
        }
    }

    DEFAULT_CATEGORY
}

fn fold(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}
