//! Trip DTOs
//!
//! Request and response types for trip recording and quoting. The quote
//! request mirrors the trip form fields; the cost response exposes the
//! full breakdown because the form shows every component before the
//! user commits the trip.

use chrono::{DateTime, NaiveDate, Utc};
use frete_core::models::Trip;
use frete_core::pricing::{TripCost, TripInput};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Quote request (pure preview, nothing persisted)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuoteRequest {
    /// Odometer reading at departure
    pub start_km: Decimal,

    /// Odometer reading at arrival
    pub end_km: Decimal,

    /// Cargo weight in kilograms
    pub weight: Decimal,
}

impl QuoteRequest {
    /// Convert to the engine input
    pub fn to_input(&self) -> TripInput {
        TripInput {
            start_km: self.start_km,
            end_km: self.end_km,
            weight: self.weight,
        }
    }
}

/// Trip creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TripCreateRequest {
    /// Trip date
    pub date: NaiveDate,

    /// Optional short cargo code
    #[validate(length(max = 50, message = "Cargo code is too long"))]
    pub cargo: Option<String>,

    /// Odometer reading at departure
    pub start_km: Decimal,

    /// Odometer reading at arrival
    pub end_km: Decimal,

    /// Cargo weight in kilograms
    pub weight: Decimal,
}

impl TripCreateRequest {
    /// Convert to the engine input
    pub fn to_input(&self) -> TripInput {
        TripInput {
            start_km: self.start_km,
            end_km: self.end_km,
            weight: self.weight,
        }
    }
}

/// Trip update request
///
/// Same shape as creation: editing re-prices the trip against the rates
/// active at edit time.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TripUpdateRequest {
    /// Trip date
    pub date: NaiveDate,

    /// Optional short cargo code
    #[validate(length(max = 50, message = "Cargo code is too long"))]
    pub cargo: Option<String>,

    /// Odometer reading at departure
    pub start_km: Decimal,

    /// Odometer reading at arrival
    pub end_km: Decimal,

    /// Cargo weight in kilograms
    pub weight: Decimal,
}

impl TripUpdateRequest {
    /// Convert to the engine input
    pub fn to_input(&self) -> TripInput {
        TripInput {
            start_km: self.start_km,
            end_km: self.end_km,
            weight: self.weight,
        }
    }
}

/// Trip cost breakdown response
#[derive(Debug, Clone, Serialize)]
pub struct TripCostResponse {
    /// Total distance
    pub total_km: Decimal,

    /// Applied per-km rate
    pub distance_rate: Decimal,

    /// Applied per-kg rate
    pub weight_rate: Decimal,

    /// Distance component
    pub distance_cost: Decimal,

    /// Weight component
    pub weight_cost: Decimal,

    /// Departure fee component
    pub departure_fee: Decimal,

    /// Total price
    pub total_price: Decimal,
}

impl From<TripCost> for TripCostResponse {
    fn from(cost: TripCost) -> Self {
        Self {
            total_km: cost.total_km,
            distance_rate: cost.distance_rate,
            weight_rate: cost.weight_rate,
            distance_cost: cost.distance_cost,
            weight_cost: cost.weight_cost,
            departure_fee: cost.departure_fee,
            total_price: cost.total_price,
        }
    }
}

/// Trip response
#[derive(Debug, Clone, Serialize)]
pub struct TripResponse {
    /// Trip ID
    pub id: i64,

    /// Trip date
    pub date: NaiveDate,

    /// Cargo code
    pub cargo: Option<String>,

    /// Odometer reading at departure
    pub start_km: Decimal,

    /// Odometer reading at arrival
    pub end_km: Decimal,

    /// Total distance
    pub total_km: Decimal,

    /// Cargo weight
    pub weight: Decimal,

    /// Snapshotted per-km rate
    pub applied_distance_rate: Decimal,

    /// Snapshotted per-kg rate
    pub applied_weight_rate: Decimal,

    /// Snapshotted departure fee
    pub applied_departure_fee: Decimal,

    /// Total price
    pub total_price: Decimal,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        Self {
            id: trip.id,
            date: trip.date,
            cargo: trip.cargo,
            start_km: trip.start_km,
            end_km: trip.end_km,
            total_km: trip.total_km,
            weight: trip.weight,
            applied_distance_rate: trip.applied_distance_rate,
            applied_weight_rate: trip.applied_weight_rate,
            applied_departure_fee: trip.applied_departure_fee,
            total_price: trip.total_price,
            created_at: trip.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_request_to_input() {
        let req = QuoteRequest {
            start_km: dec!(100),
            end_km: dec!(350),
            weight: dec!(1000),
        };

        let input = req.to_input();
        assert_eq!(input.start_km, dec!(100));
        assert_eq!(input.end_km, dec!(350));
        assert_eq!(input.weight, dec!(1000));
    }

    #[test]
    fn test_cargo_length_validation() {
        let req = TripCreateRequest {
            date: NaiveDate::from_ymd_opt(2025, 11, 24).unwrap(),
            cargo: Some("x".repeat(51)),
            start_km: dec!(0),
            end_km: dec!(10),
            weight: dec!(100),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_cost_response_conversion() {
        let cost = TripCost {
            total_km: dec!(250),
            distance_rate: dec!(2.50),
            weight_rate: dec!(0.10),
            distance_cost: dec!(625.00),
            weight_cost: dec!(100.00),
            departure_fee: dec!(157.00),
            total_price: dec!(882.00),
        };

        let response = TripCostResponse::from(cost);
        assert_eq!(response.total_price, dec!(882.00));
        assert_eq!(
            response.total_price,
            response.distance_cost + response.weight_cost + response.departure_fee
        );
    }
}
