//! Departure fee band model
//!
//! A flat fee added to a trip based on which distance band the trip's
//! total kilometers falls into. Several bands may be active at once,
//! each covering a distinct inclusive [start_km, end_km] range.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Departure fee band entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartureFeeBand {
    /// Unique identifier
    pub id: i32,

    /// Owning tenant
    pub tenant_id: Uuid,

    /// Inclusive lower bound of the covered distance range (km)
    pub start_km: i32,

    /// Inclusive upper bound of the covered distance range (km)
    pub end_km: i32,

    /// Flat fee charged for trips within the range
    pub value: Decimal,

    /// Whether this band participates in fee resolution
    pub active: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl DepartureFeeBand {
    /// Check whether a trip distance falls inside this band (inclusive)
    #[inline]
    pub fn contains(&self, total_km: Decimal) -> bool {
        Decimal::from(self.start_km) <= total_km && total_km <= Decimal::from(self.end_km)
    }

    /// Check whether two ranges share at least one kilometer
    #[inline]
    pub fn overlaps(&self, start_km: i32, end_km: i32) -> bool {
        self.start_km <= end_km && start_km <= self.end_km
    }

    /// Width of the covered range in kilometers
    pub fn span_km(&self) -> i32 {
        self.end_km - self.start_km
    }
}

impl Default for DepartureFeeBand {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            tenant_id: Uuid::nil(),
            start_km: 0,
            end_km: 0,
            value: Decimal::ZERO,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
