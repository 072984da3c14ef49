//! Departure fee band handlers
//!
//! HTTP handlers for the fee band administration surface. Ranges that
//! would overlap another active band come back as 409 from the
//! repository; the handlers additionally reject inverted ranges and
//! negative values before touching the database.

use crate::dto::fee_band::{FeeBandCreateRequest, FeeBandResponse, FeeBandUpdateRequest};
use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use frete_auth::{AdminUser, AuthenticatedUser};
use frete_core::models::DepartureFeeBand;
use frete_core::traits::{FeeBandRepository, PricingService};
use frete_core::AppError;
use frete_db::PgFeeBandRepository;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Reject inverted ranges and negative fees
fn check_range(start_km: i32, end_km: i32, value: Decimal) -> Result<(), AppError> {
    if end_km < start_km {
        return Err(AppError::InvalidInput(format!(
            "end_km ({}) must be greater than or equal to start_km ({})",
            end_km, start_km
        )));
    }
    if value < Decimal::ZERO {
        return Err(AppError::InvalidInput(
            "Fee value must be non-negative".to_string(),
        ));
    }
    Ok(())
}

/// List a tenant's fee bands
///
/// GET /api/v1/fee-bands
#[instrument(skip(pool, user))]
pub async fn list_bands(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    debug!(tenant = %user.tenant_id, "Listing fee bands");

    let repo = PgFeeBandRepository::new(pool.get_ref().clone());
    let bands = repo.list(user.tenant_id).await?;

    let response: Vec<FeeBandResponse> = bands.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Create a new active fee band
///
/// POST /api/v1/fee-bands
#[instrument(skip(pool, pricing, admin, req))]
pub async fn create_band(
    pool: web::Data<PgPool>,
    pricing: web::Data<Arc<dyn PricingService>>,
    admin: AdminUser,
    req: web::Json<FeeBandCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Fee band creation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;
    check_range(req.start_km, req.end_km, req.value)?;

    debug!(
        start_km = req.start_km,
        end_km = req.end_km,
        tenant = %admin.tenant_id,
        "Creating fee band"
    );

    let repo = PgFeeBandRepository::new(pool.get_ref().clone());
    let created = repo.create(&req.to_band(admin.tenant_id)).await?;

    pricing.invalidate(admin.tenant_id).await?;

    info!(
        id = created.id,
        start_km = created.start_km,
        end_km = created.end_km,
        admin = %admin.username,
        "Fee band created"
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(FeeBandResponse::from(created))))
}

/// Update a fee band's range and value
///
/// PUT /api/v1/fee-bands/{id}
#[instrument(skip(pool, pricing, admin, req))]
pub async fn update_band(
    pool: web::Data<PgPool>,
    pricing: web::Data<Arc<dyn PricingService>>,
    path: web::Path<i32>,
    admin: AdminUser,
    req: web::Json<FeeBandUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let band_id = path.into_inner();

    req.validate().map_err(|e| {
        warn!("Fee band update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;
    check_range(req.start_km, req.end_km, req.value)?;

    debug!(id = band_id, "Updating fee band");

    let repo = PgFeeBandRepository::new(pool.get_ref().clone());
    let existing = repo
        .find_by_id(admin.tenant_id, band_id)
        .await?
        .ok_or_else(|| AppError::BandNotFound(band_id.to_string()))?;

    let updated = repo
        .update(&DepartureFeeBand {
            start_km: req.start_km,
            end_km: req.end_km,
            value: req.value,
            ..existing
        })
        .await?;

    pricing.invalidate(admin.tenant_id).await?;

    info!(id = band_id, admin = %admin.username, "Fee band updated");

    Ok(HttpResponse::Ok().json(ApiResponse::success(FeeBandResponse::from(updated))))
}

/// Toggle a fee band's activation state
///
/// POST /api/v1/fee-bands/{id}/toggle
#[instrument(skip(pool, pricing, admin))]
pub async fn toggle_band(
    pool: web::Data<PgPool>,
    pricing: web::Data<Arc<dyn PricingService>>,
    path: web::Path<i32>,
    admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let band_id = path.into_inner();

    let repo = PgFeeBandRepository::new(pool.get_ref().clone());
    let band = repo
        .find_by_id(admin.tenant_id, band_id)
        .await?
        .ok_or_else(|| AppError::BandNotFound(band_id.to_string()))?;

    debug!(id = band_id, active = !band.active, "Toggling fee band");

    let toggled = repo
        .set_active(admin.tenant_id, band_id, !band.active)
        .await?;

    pricing.invalidate(admin.tenant_id).await?;

    info!(
        id = band_id,
        active = toggled.active,
        admin = %admin.username,
        "Fee band toggled"
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(FeeBandResponse::from(toggled))))
}

/// Delete a fee band (hard delete)
///
/// DELETE /api/v1/fee-bands/{id}
#[instrument(skip(pool, pricing, admin))]
pub async fn delete_band(
    pool: web::Data<PgPool>,
    pricing: web::Data<Arc<dyn PricingService>>,
    path: web::Path<i32>,
    admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let band_id = path.into_inner();

    debug!(id = band_id, admin = %admin.username, "Deleting fee band");

    let repo = PgFeeBandRepository::new(pool.get_ref().clone());
    let deleted = repo.delete(admin.tenant_id, band_id).await?;

    if !deleted {
        return Err(AppError::BandNotFound(band_id.to_string()));
    }

    pricing.invalidate(admin.tenant_id).await?;

    info!(id = band_id, admin = %admin.username, "Fee band deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Configure fee band routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/fee-bands")
            .route("", web::get().to(list_bands))
            .route("", web::post().to(create_band))
            .route("/{id}", web::put().to(update_band))
            .route("/{id}/toggle", web::post().to(toggle_band))
            .route("/{id}", web::delete().to(delete_band)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_check_range() {
        assert!(check_range(0, 200, dec!(157.00)).is_ok());
        assert!(check_range(200, 200, dec!(0)).is_ok());
        assert!(matches!(
            check_range(300, 200, dec!(10)),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            check_range(0, 200, dec!(-1)),
            Err(AppError::InvalidInput(_))
        ));
    }
}
