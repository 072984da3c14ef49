//! Price rate model
//!
//! Represents the per-kilometer and per-kilogram prices a tenant charges.
//! At most one rate of each kind is active per tenant at any time.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Discriminator between the two rate kinds
///
/// Serialized as `"km"` / `"kg"`, matching the URL segments and the
/// storage column values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateKind {
    /// Price per kilometer driven
    #[serde(rename = "km")]
    Distance,
    /// Price per kilogram of cargo
    #[serde(rename = "kg")]
    Weight,
}

impl RateKind {
    /// Storage/URL representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RateKind::Distance => "km",
            RateKind::Weight => "kg",
        }
    }

    /// Parse from the storage/URL representation (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "km" => Some(RateKind::Distance),
            "kg" => Some(RateKind::Weight),
            _ => None,
        }
    }
}

impl fmt::Display for RateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Price rate entity
///
/// One row of a tenant's rate history. Creating a new rate activates it
/// and deactivates every sibling of the same kind; historical rows stay
/// around so old values remain visible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRate {
    /// Unique identifier
    pub id: i32,

    /// Owning tenant
    pub tenant_id: Uuid,

    /// Rate kind (per-km or per-kg)
    pub kind: RateKind,

    /// Price per unit (currency per km or per kg)
    pub value: Decimal,

    /// Whether this rate is the one currently applied to new trips
    pub active: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for PriceRate {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            tenant_id: Uuid::nil(),
            kind: RateKind::Distance,
            value: Decimal::ZERO,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        assert_eq!(RateKind::from_str("km"), Some(RateKind::Distance));
        assert_eq!(RateKind::from_str("KG"), Some(RateKind::Weight));
        assert_eq!(RateKind::from_str("miles"), None);
        assert_eq!(RateKind::Distance.as_str(), "km");
        assert_eq!(RateKind::Weight.to_string(), "kg");
    }

    #[test]
    fn test_kind_serde_representation() {
        let json = serde_json::to_string(&RateKind::Distance).unwrap();
        assert_eq!(json, "\"km\"");

        let kind: RateKind = serde_json::from_str("\"kg\"").unwrap();
        assert_eq!(kind, RateKind::Weight);
    }

    #[test]
    fn test_default_rate_is_active() {
        let rate = PriceRate::default();
        assert!(rate.active);
        assert_eq!(rate.value, Decimal::ZERO);
    }
}
