//! Report handlers
//!
//! HTTP handlers for the period summary endpoint. The summary feeds the
//! report screen and its export: totals, per-trip averages, a per-day
//! chart series, and the trip detail rows for the chosen date range.

use crate::dto::report::{DailyPointResponse, PeriodAverages, PeriodSummaryResponse, ReportParams};
use crate::dto::trip::TripResponse;
use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use frete_auth::AuthenticatedUser;
use frete_core::traits::TripRepository;
use frete_core::AppError;
use frete_db::PgTripRepository;
use sqlx::PgPool;
use tracing::{debug, instrument};

/// Inclusive first/last day of the month containing `today`
pub(crate) fn current_month_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today.with_day(1).unwrap_or(today);

    let next_month_start = if start.month() == 12 {
        NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
    };

    let end = next_month_start
        .map(|d| d - Duration::days(1))
        .unwrap_or(today);

    (start, end)
}

/// Resolve the requested period, defaulting to the current month
fn resolve_period(params: &ReportParams) -> Result<(NaiveDate, NaiveDate), AppError> {
    let (month_start, month_end) = current_month_range(Utc::now().date_naive());

    let start = params.start_date.unwrap_or(month_start);
    let end = params.end_date.unwrap_or(month_end);

    if end < start {
        return Err(AppError::InvalidInput(format!(
            "end_date ({}) must be greater than or equal to start_date ({})",
            end, start
        )));
    }

    Ok((start, end))
}

/// Period summary report
///
/// GET /api/v1/reports/summary?start_date&end_date
#[instrument(skip(pool, user))]
pub async fn period_summary(
    pool: web::Data<PgPool>,
    query: web::Query<ReportParams>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (start, end) = resolve_period(&query)?;

    debug!(
        tenant = %user.tenant_id,
        start = %start,
        end = %end,
        "Building period summary"
    );

    let repo = PgTripRepository::new(pool.get_ref().clone());

    let totals = repo.period_totals(user.tenant_id, start, end).await?;
    let averages = PeriodAverages::from_totals(&totals);
    let daily = repo.daily_breakdown(user.tenant_id, start, end).await?;
    let trips = repo.list_range(user.tenant_id, start, end).await?;

    let response = PeriodSummaryResponse {
        start_date: start,
        end_date: end,
        totals,
        averages,
        daily: daily.into_iter().map(DailyPointResponse::from).collect(),
        trips: trips.into_iter().map(TripResponse::from).collect(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/reports").route("/summary", web::get().to(period_summary)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_month_range() {
        let (start, end) = current_month_range(NaiveDate::from_ymd_opt(2025, 11, 24).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 11, 30).unwrap());
    }

    #[test]
    fn test_current_month_range_december() {
        let (start, end) = current_month_range(NaiveDate::from_ymd_opt(2025, 12, 5).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn test_current_month_range_leap_february() {
        let (start, end) = current_month_range(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_resolve_period_rejects_inverted_range() {
        let params = ReportParams {
            start_date: NaiveDate::from_ymd_opt(2025, 11, 30),
            end_date: NaiveDate::from_ymd_opt(2025, 11, 1),
        };
        assert!(matches!(
            resolve_period(&params),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_resolve_period_explicit_range() {
        let params = ReportParams {
            start_date: NaiveDate::from_ymd_opt(2025, 10, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 10, 15),
        };
        let (start, end) = resolve_period(&params).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 10, 15).unwrap());
    }
}
