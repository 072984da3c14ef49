//! Trip pricing engine
//!
//! Pure computation of a trip's financial breakdown from the tenant's
//! active pricing configuration. No side effects: the trip form calls
//! this on every input change, so the same inputs must always produce
//! the same breakdown.
//!
//! Rules:
//! - a missing active rate contributes zero, it is not an error
//! - the departure fee comes from the active band containing the trip
//!   distance; with overlapping bands the smallest start_km wins, then
//!   the smallest end_km, then the smallest id
//! - a negative distance (end_km < start_km) is rejected as invalid
//!   input instead of producing a negative cost

use crate::error::AppError;
use crate::models::DepartureFeeBand;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Raw trip form inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripInput {
    /// Odometer reading at departure
    pub start_km: Decimal,

    /// Odometer reading at arrival
    pub end_km: Decimal,

    /// Cargo weight in kilograms
    pub weight: Decimal,
}

/// A tenant's active pricing configuration
///
/// Assembled from the active per-km rate, active per-kg rate, and the
/// active departure fee bands. Missing rates are represented as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Active price per kilometer (zero when no rate is active)
    pub distance_rate: Decimal,

    /// Active price per kilogram (zero when no rate is active)
    pub weight_rate: Decimal,

    /// Active departure fee bands, ordered by start_km
    pub fee_bands: Vec<DepartureFeeBand>,
}

impl PricingConfig {
    /// Configuration for a tenant with nothing set up yet
    pub fn empty() -> Self {
        Self {
            distance_rate: Decimal::ZERO,
            weight_rate: Decimal::ZERO,
            fee_bands: Vec::new(),
        }
    }
}

/// Computed trip cost breakdown
///
/// Carries the applied rates alongside the cost components so callers
/// can snapshot the full pricing context onto a persisted trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripCost {
    /// Total distance (end_km - start_km)
    pub total_km: Decimal,

    /// Per-km rate that was applied
    pub distance_rate: Decimal,

    /// Per-kg rate that was applied
    pub weight_rate: Decimal,

    /// total_km * distance_rate
    pub distance_cost: Decimal,

    /// weight * weight_rate
    pub weight_cost: Decimal,

    /// Departure fee of the matching band, or zero
    pub departure_fee: Decimal,

    /// Sum of the three components
    pub total_price: Decimal,
}

/// Resolve the departure fee band for a trip distance
///
/// Scans active bands whose inclusive range contains `total_km` and
/// picks the winner under the deterministic tie-break
/// (start_km, end_km, id) ascending. Returns `None` when no active band
/// matches.
pub fn resolve_departure_fee(
    bands: &[DepartureFeeBand],
    total_km: Decimal,
) -> Option<&DepartureFeeBand> {
    bands
        .iter()
        .filter(|band| band.active && band.contains(total_km))
        .min_by_key(|band| (band.start_km, band.end_km, band.id))
}

/// Compute the financial breakdown of a single trip
///
/// # Errors
///
/// Returns `AppError::InvalidInput` when any input is negative or when
/// `end_km < start_km`.
pub fn compute_trip_cost(input: &TripInput, config: &PricingConfig) -> Result<TripCost, AppError> {
    if input.start_km < Decimal::ZERO {
        return Err(AppError::InvalidInput(
            "start_km must be non-negative".to_string(),
        ));
    }
    if input.end_km < Decimal::ZERO {
        return Err(AppError::InvalidInput(
            "end_km must be non-negative".to_string(),
        ));
    }
    if input.weight < Decimal::ZERO {
        return Err(AppError::InvalidInput(
            "weight must be non-negative".to_string(),
        ));
    }
    if input.end_km < input.start_km {
        return Err(AppError::InvalidInput(format!(
            "end_km ({}) must be greater than or equal to start_km ({})",
            input.end_km, input.start_km
        )));
    }

    let total_km = input.end_km - input.start_km;
    let distance_cost = total_km * config.distance_rate;
    let weight_cost = input.weight * config.weight_rate;
    let departure_fee = resolve_departure_fee(&config.fee_bands, total_km)
        .map(|band| band.value)
        .unwrap_or(Decimal::ZERO);

    Ok(TripCost {
        total_km,
        distance_rate: config.distance_rate,
        weight_rate: config.weight_rate,
        distance_cost,
        weight_cost,
        departure_fee,
        total_price: distance_cost + weight_cost + departure_fee,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn band(id: i32, start_km: i32, end_km: i32, value: Decimal) -> DepartureFeeBand {
        DepartureFeeBand {
            id,
            start_km,
            end_km,
            value,
            ..Default::default()
        }
    }

    fn input(start_km: Decimal, end_km: Decimal, weight: Decimal) -> TripInput {
        TripInput {
            start_km,
            end_km,
            weight,
        }
    }

    #[test]
    fn test_full_breakdown() {
        // 250 km at 2.50/km + 1000 kg at 0.10/kg + band [200,400] fee
        let config = PricingConfig {
            distance_rate: dec!(2.50),
            weight_rate: dec!(0.10),
            fee_bands: vec![band(1, 200, 400, dec!(157.00))],
        };

        let cost = compute_trip_cost(&input(dec!(100), dec!(350), dec!(1000)), &config).unwrap();

        assert_eq!(cost.total_km, dec!(250));
        assert_eq!(cost.distance_cost, dec!(625.00));
        assert_eq!(cost.weight_cost, dec!(100.00));
        assert_eq!(cost.departure_fee, dec!(157.00));
        assert_eq!(cost.total_price, dec!(882.00));
    }

    #[test]
    fn test_no_matching_band_means_zero_fee() {
        let config = PricingConfig {
            distance_rate: dec!(2.50),
            weight_rate: dec!(0.10),
            fee_bands: vec![band(1, 0, 200, dec!(157.00))],
        };

        let cost = compute_trip_cost(&input(dec!(100), dec!(350), dec!(1000)), &config).unwrap();

        assert_eq!(cost.departure_fee, Decimal::ZERO);
        assert_eq!(cost.total_price, dec!(725.00));
    }

    #[test]
    fn test_negative_distance_rejected() {
        let config = PricingConfig::empty();
        let result = compute_trip_cost(&input(dec!(500), dec!(300), dec!(1000)), &config);

        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_negative_inputs_rejected() {
        let config = PricingConfig::empty();

        assert!(compute_trip_cost(&input(dec!(-1), dec!(100), dec!(10)), &config).is_err());
        assert!(compute_trip_cost(&input(dec!(0), dec!(-100), dec!(10)), &config).is_err());
        assert!(compute_trip_cost(&input(dec!(0), dec!(100), dec!(-10)), &config).is_err());
    }

    #[test]
    fn test_overlapping_bands_smallest_start_wins() {
        // At 250 km both bands match; the one starting at 200 wins.
        let config = PricingConfig {
            distance_rate: Decimal::ZERO,
            weight_rate: Decimal::ZERO,
            fee_bands: vec![
                band(2, 250, 400, dec!(150.00)),
                band(1, 200, 300, dec!(100.00)),
            ],
        };

        let cost = compute_trip_cost(&input(dec!(0), dec!(250), dec!(0)), &config).unwrap();
        assert_eq!(cost.departure_fee, dec!(100.00));
    }

    #[test]
    fn test_tie_break_on_equal_start() {
        // Same start_km: the narrower band wins.
        let config = PricingConfig {
            distance_rate: Decimal::ZERO,
            weight_rate: Decimal::ZERO,
            fee_bands: vec![
                band(7, 200, 500, dec!(150.00)),
                band(9, 200, 300, dec!(80.00)),
            ],
        };

        let cost = compute_trip_cost(&input(dec!(0), dec!(250), dec!(0)), &config).unwrap();
        assert_eq!(cost.departure_fee, dec!(80.00));
    }

    #[test]
    fn test_inactive_band_ignored() {
        let mut inactive = band(1, 200, 400, dec!(157.00));
        inactive.active = false;

        let config = PricingConfig {
            distance_rate: Decimal::ZERO,
            weight_rate: Decimal::ZERO,
            fee_bands: vec![inactive],
        };

        let cost = compute_trip_cost(&input(dec!(0), dec!(250), dec!(0)), &config).unwrap();
        assert_eq!(cost.departure_fee, Decimal::ZERO);
    }

    #[test]
    fn test_missing_rates_contribute_zero() {
        let config = PricingConfig {
            distance_rate: Decimal::ZERO,
            weight_rate: Decimal::ZERO,
            fee_bands: vec![band(1, 0, 400, dec!(50.00))],
        };

        let cost = compute_trip_cost(&input(dec!(100), dec!(350), dec!(1000)), &config).unwrap();

        assert_eq!(cost.distance_cost, Decimal::ZERO);
        assert_eq!(cost.weight_cost, Decimal::ZERO);
        assert_eq!(cost.total_price, dec!(50.00));
    }

    #[test]
    fn test_zero_distance_trip() {
        let config = PricingConfig {
            distance_rate: dec!(2.50),
            weight_rate: dec!(0.10),
            fee_bands: vec![band(1, 0, 200, dec!(25.00))],
        };

        // start == end is legal; the [0, 200] band covers 0 km.
        let cost = compute_trip_cost(&input(dec!(500), dec!(500), dec!(80)), &config).unwrap();

        assert_eq!(cost.total_km, Decimal::ZERO);
        assert_eq!(cost.distance_cost, Decimal::ZERO);
        assert_eq!(cost.weight_cost, dec!(8.00));
        assert_eq!(cost.departure_fee, dec!(25.00));
    }

    #[test]
    fn test_band_boundaries_inclusive() {
        let config = PricingConfig {
            distance_rate: Decimal::ZERO,
            weight_rate: Decimal::ZERO,
            fee_bands: vec![band(1, 200, 400, dec!(157.00))],
        };

        let at_start = compute_trip_cost(&input(dec!(0), dec!(200), dec!(0)), &config).unwrap();
        assert_eq!(at_start.departure_fee, dec!(157.00));

        let at_end = compute_trip_cost(&input(dec!(0), dec!(400), dec!(0)), &config).unwrap();
        assert_eq!(at_end.departure_fee, dec!(157.00));
    }

    #[test]
    fn test_deterministic_for_identical_inputs() {
        let config = PricingConfig {
            distance_rate: dec!(1.75),
            weight_rate: dec!(0.05),
            fee_bands: vec![band(1, 0, 1000, dec!(30.00))],
        };
        let trip = input(dec!(12.5), dec!(487.5), dec!(4887.10));

        let first = compute_trip_cost(&trip, &config).unwrap();
        let second = compute_trip_cost(&trip, &config).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_total_is_sum_of_components() {
        let config = PricingConfig {
            distance_rate: dec!(3.21),
            weight_rate: dec!(0.07),
            fee_bands: vec![band(1, 100, 300, dec!(42.42))],
        };

        let cost = compute_trip_cost(&input(dec!(10), dec!(260), dec!(321)), &config).unwrap();

        assert_eq!(
            cost.total_price,
            cost.distance_cost + cost.weight_cost + cost.departure_fee
        );
    }

    #[test]
    fn test_fractional_kilometers() {
        let config = PricingConfig {
            distance_rate: dec!(2.00),
            weight_rate: Decimal::ZERO,
            fee_bands: vec![],
        };

        let cost = compute_trip_cost(&input(dec!(100.25), dec!(150.75), dec!(0)), &config).unwrap();

        assert_eq!(cost.total_km, dec!(50.50));
        assert_eq!(cost.distance_cost, dec!(101.00));
    }
}
