//! Report and dashboard DTOs
//!
//! Response types for the period summary and dashboard endpoints.

use crate::dto::trip::TripResponse;
use chrono::NaiveDate;
use frete_core::models::{DailyBreakdownPoint, PeriodTotals};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Report query parameters
///
/// Both dates default to the current month when omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportParams {
    /// Inclusive period start
    pub start_date: Option<NaiveDate>,

    /// Inclusive period end
    pub end_date: Option<NaiveDate>,
}

/// Per-trip averages for a period
#[derive(Debug, Clone, Serialize)]
pub struct PeriodAverages {
    /// Average distance per trip
    pub avg_km: Decimal,

    /// Average weight per trip
    pub avg_weight: Decimal,

    /// Average revenue per trip
    pub avg_revenue: Decimal,
}

impl PeriodAverages {
    /// Compute averages from period totals (all zero for empty periods)
    pub fn from_totals(totals: &PeriodTotals) -> Self {
        if totals.trips == 0 {
            return Self {
                avg_km: Decimal::ZERO,
                avg_weight: Decimal::ZERO,
                avg_revenue: Decimal::ZERO,
            };
        }

        let count = Decimal::from(totals.trips);
        Self {
            avg_km: totals.total_km / count,
            avg_weight: totals.total_weight / count,
            avg_revenue: totals.total_revenue / count,
        }
    }
}

/// One day of the report's chart series
#[derive(Debug, Clone, Serialize)]
pub struct DailyPointResponse {
    /// Trip date
    pub date: NaiveDate,

    /// Trips that day
    pub trips: i64,

    /// Kilometers that day
    pub total_km: Decimal,

    /// Revenue that day
    pub revenue: Decimal,
}

impl From<DailyBreakdownPoint> for DailyPointResponse {
    fn from(point: DailyBreakdownPoint) -> Self {
        Self {
            date: point.date,
            trips: point.trips,
            total_km: point.total_km,
            revenue: point.revenue,
        }
    }
}

/// Period summary response
#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummaryResponse {
    /// Inclusive period start
    pub start_date: NaiveDate,

    /// Inclusive period end
    pub end_date: NaiveDate,

    /// Aggregated totals
    pub totals: PeriodTotals,

    /// Per-trip averages
    pub averages: PeriodAverages,

    /// Per-day chart series
    pub daily: Vec<DailyPointResponse>,

    /// Trip detail rows
    pub trips: Vec<TripResponse>,
}

/// Dashboard response (current-month totals)
#[derive(Debug, Clone, Serialize)]
pub struct DashboardResponse {
    /// First day of the current month
    pub start_date: NaiveDate,

    /// Last day of the current month
    pub end_date: NaiveDate,

    /// Aggregated totals
    pub totals: PeriodTotals,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_averages_from_totals() {
        let totals = PeriodTotals {
            trips: 4,
            total_km: dec!(1000),
            total_weight: dec!(4887.10),
            total_revenue: dec!(3528.00),
        };

        let averages = PeriodAverages::from_totals(&totals);
        assert_eq!(averages.avg_km, dec!(250));
        assert_eq!(averages.avg_revenue, dec!(882.00));
    }

    #[test]
    fn test_averages_of_empty_period() {
        let averages = PeriodAverages::from_totals(&PeriodTotals::empty());
        assert_eq!(averages.avg_km, Decimal::ZERO);
        assert_eq!(averages.avg_weight, Decimal::ZERO);
        assert_eq!(averages.avg_revenue, Decimal::ZERO);
    }
}
