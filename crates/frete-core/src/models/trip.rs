//! Trip model
//!
//! One recorded freight movement: odometer readings, cargo weight, and
//! the price breakdown computed from the rates active at recording time.
//! The applied rates are snapshots; they never change when the tenant's
//! pricing configuration changes later.

use crate::pricing::TripCost;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trip entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trip {
    /// Unique identifier
    pub id: i64,

    /// Owning tenant
    pub tenant_id: Uuid,

    /// Trip date (no time component)
    pub date: NaiveDate,

    /// Optional short cargo code
    pub cargo: Option<String>,

    /// Odometer reading at departure
    pub start_km: Decimal,

    /// Odometer reading at arrival
    pub end_km: Decimal,

    /// Total distance (end_km - start_km)
    pub total_km: Decimal,

    /// Cargo weight in kilograms
    pub weight: Decimal,

    /// Per-km rate applied at recording time
    pub applied_distance_rate: Decimal,

    /// Per-kg rate applied at recording time
    pub applied_weight_rate: Decimal,

    /// Departure fee applied at recording time
    pub applied_departure_fee: Decimal,

    /// Total computed price
    pub total_price: Decimal,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    /// Snapshot a computed cost breakdown onto this trip
    ///
    /// Copies the distance, applied rates, fee, and total from a
    /// `TripCost`, which is how the immutable price snapshot is taken.
    pub fn apply_cost(&mut self, cost: &TripCost) {
        self.total_km = cost.total_km;
        self.applied_distance_rate = cost.distance_rate;
        self.applied_weight_rate = cost.weight_rate;
        self.applied_departure_fee = cost.departure_fee;
        self.total_price = cost.total_price;
    }

    /// Cost contributed by distance under the snapshotted rate
    #[inline]
    pub fn distance_cost(&self) -> Decimal {
        self.total_km * self.applied_distance_rate
    }

    /// Cost contributed by weight under the snapshotted rate
    #[inline]
    pub fn weight_cost(&self) -> Decimal {
        self.weight * self.applied_weight_rate
    }

    /// Check that the stored total matches the snapshotted components
    pub fn breakdown_is_consistent(&self) -> bool {
        self.distance_cost() + self.weight_cost() + self.applied_departure_fee == self.total_price
    }
}

impl Default for Trip {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            tenant_id: Uuid::nil(),
            date: now.date_naive(),
            cargo: None,
            start_km: Decimal::ZERO,
            end_km: Decimal::ZERO,
            total_km: Decimal::ZERO,
            weight: Decimal::ZERO,
            applied_distance_rate: Decimal::ZERO,
            applied_weight_rate: Decimal::ZERO,
            applied_departure_fee: Decimal::ZERO,
            total_price: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Aggregated totals for a tenant's trips over a date range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// Number of trips in the period
    pub trips: i64,

    /// Sum of trip distances
    pub total_km: Decimal,

    /// Sum of cargo weights
    pub total_weight: Decimal,

    /// Sum of trip prices
    pub total_revenue: Decimal,
}

impl PeriodTotals {
    /// Totals for an empty period
    pub fn empty() -> Self {
        Self {
            trips: 0,
            total_km: Decimal::ZERO,
            total_weight: Decimal::ZERO,
            total_revenue: Decimal::ZERO,
        }
    }
}

/// One day of a period report's chart series
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBreakdownPoint {
    /// Trip date
    pub date: NaiveDate,

    /// Trips recorded that day
    pub trips: i64,

    /// Kilometers driven that day
    pub total_km: Decimal,

    /// Revenue recorded that day
    pub revenue: Decimal,
}
