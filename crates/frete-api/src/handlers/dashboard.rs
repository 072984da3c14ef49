//! Dashboard handlers
//!
//! HTTP handlers for the landing-page dashboard: the current month's
//! trip count, kilometers, weight, and revenue for the caller's tenant.

use crate::dto::report::DashboardResponse;
use crate::dto::ApiResponse;
use crate::handlers::reports::current_month_range;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use frete_auth::AuthenticatedUser;
use frete_core::traits::TripRepository;
use frete_core::AppError;
use frete_db::PgTripRepository;
use sqlx::PgPool;
use tracing::{debug, instrument};

/// Current-month totals
///
/// GET /api/v1/dashboard
#[instrument(skip(pool, user))]
pub async fn dashboard(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (start, end) = current_month_range(Utc::now().date_naive());

    debug!(tenant = %user.tenant_id, start = %start, end = %end, "Building dashboard");

    let repo = PgTripRepository::new(pool.get_ref().clone());
    let totals = repo.period_totals(user.tenant_id, start, end).await?;

    let response = DashboardResponse {
        start_date: start,
        end_date: end,
        totals,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Configure dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(dashboard));
}
