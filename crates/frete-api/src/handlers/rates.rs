//! Price rate handlers
//!
//! HTTP handlers for the per-km and per-kg rate administration surface.
//! The kind is a path segment ("km" or "kg"); every operation is scoped
//! to the caller's tenant. Mutations invalidate the tenant's cached
//! pricing configuration so new quotes see the change immediately.

use crate::dto::rate::{RateCreateRequest, RateResponse, RateUpdateRequest};
use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use frete_auth::{AdminUser, AuthenticatedUser};
use frete_core::models::RateKind;
use frete_core::traits::{PricingService, RateRepository};
use frete_core::AppError;
use frete_db::PgRateRepository;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Parse the {kind} path segment
fn parse_kind(kind: &str) -> Result<RateKind, AppError> {
    RateKind::from_str(kind)
        .ok_or_else(|| AppError::InvalidInput(format!("Unknown rate kind: {}", kind)))
}

/// Reject negative rate values before they reach the repository
fn check_value(value: Decimal) -> Result<(), AppError> {
    if value < Decimal::ZERO {
        return Err(AppError::InvalidInput(
            "Rate value must be non-negative".to_string(),
        ));
    }
    Ok(())
}

/// List a tenant's rate history of one kind
///
/// GET /api/v1/rates/{kind}
#[instrument(skip(pool, user))]
pub async fn list_rates(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let kind = parse_kind(&path.into_inner())?;

    debug!(kind = %kind, tenant = %user.tenant_id, "Listing rates");

    let repo = PgRateRepository::new(pool.get_ref().clone());
    let rates = repo.list(user.tenant_id, kind).await?;

    let response: Vec<RateResponse> = rates.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Create a new rate, activating it and superseding the current one
///
/// POST /api/v1/rates/{kind}
#[instrument(skip(pool, pricing, admin, req))]
pub async fn create_rate(
    pool: web::Data<PgPool>,
    pricing: web::Data<Arc<dyn PricingService>>,
    path: web::Path<String>,
    admin: AdminUser,
    req: web::Json<RateCreateRequest>,
) -> Result<HttpResponse, AppError> {
    let kind = parse_kind(&path.into_inner())?;

    req.validate().map_err(|e| {
        warn!("Rate creation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;
    check_value(req.value)?;

    debug!(kind = %kind, value = %req.value, tenant = %admin.tenant_id, "Creating rate");

    let repo = PgRateRepository::new(pool.get_ref().clone());
    let created = repo.activate(admin.tenant_id, kind, req.value).await?;

    pricing.invalidate(admin.tenant_id).await?;

    info!(
        id = created.id,
        kind = %kind,
        admin = %admin.username,
        "Rate created and activated"
    );

    let response = RateResponse::from(created);
    Ok(HttpResponse::Created().json(ApiResponse::success(response)))
}

/// Edit a rate's value in place (activation state unchanged)
///
/// PUT /api/v1/rates/{kind}/{id}
#[instrument(skip(pool, pricing, admin, req))]
pub async fn update_rate(
    pool: web::Data<PgPool>,
    pricing: web::Data<Arc<dyn PricingService>>,
    path: web::Path<(String, i32)>,
    admin: AdminUser,
    req: web::Json<RateUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let (kind, rate_id) = path.into_inner();
    let kind = parse_kind(&kind)?;

    req.validate().map_err(|e| {
        warn!("Rate update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;
    check_value(req.value)?;

    debug!(id = rate_id, value = %req.value, "Updating rate value");

    let repo = PgRateRepository::new(pool.get_ref().clone());
    let updated = repo
        .update_value(admin.tenant_id, kind, rate_id, req.value)
        .await?;

    pricing.invalidate(admin.tenant_id).await?;

    info!(id = rate_id, admin = %admin.username, "Rate value updated");

    Ok(HttpResponse::Ok().json(ApiResponse::success(RateResponse::from(updated))))
}

/// Toggle a rate's activation state
///
/// POST /api/v1/rates/{kind}/{id}/toggle
#[instrument(skip(pool, pricing, admin))]
pub async fn toggle_rate(
    pool: web::Data<PgPool>,
    pricing: web::Data<Arc<dyn PricingService>>,
    path: web::Path<(String, i32)>,
    admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let (kind, rate_id) = path.into_inner();
    let kind = parse_kind(&kind)?;

    let repo = PgRateRepository::new(pool.get_ref().clone());
    let rate = repo
        .find_by_id(admin.tenant_id, kind, rate_id)
        .await?
        .ok_or_else(|| AppError::RateNotFound(rate_id.to_string()))?;

    debug!(id = rate_id, active = !rate.active, "Toggling rate");

    let toggled = repo
        .set_active(admin.tenant_id, kind, rate_id, !rate.active)
        .await?;

    pricing.invalidate(admin.tenant_id).await?;

    info!(
        id = rate_id,
        active = toggled.active,
        admin = %admin.username,
        "Rate toggled"
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(RateResponse::from(toggled))))
}

/// Delete a rate (hard delete)
///
/// DELETE /api/v1/rates/{kind}/{id}
#[instrument(skip(pool, pricing, admin))]
pub async fn delete_rate(
    pool: web::Data<PgPool>,
    pricing: web::Data<Arc<dyn PricingService>>,
    path: web::Path<(String, i32)>,
    admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let (kind, rate_id) = path.into_inner();
    let kind = parse_kind(&kind)?;

    debug!(id = rate_id, admin = %admin.username, "Deleting rate");

    let repo = PgRateRepository::new(pool.get_ref().clone());
    let deleted = repo.delete(admin.tenant_id, kind, rate_id).await?;

    if !deleted {
        return Err(AppError::RateNotFound(rate_id.to_string()));
    }

    pricing.invalidate(admin.tenant_id).await?;

    info!(id = rate_id, admin = %admin.username, "Rate deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Configure rate routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/rates/{kind}")
            .route("", web::get().to(list_rates))
            .route("", web::post().to(create_rate))
            .route("/{id}", web::put().to(update_rate))
            .route("/{id}/toggle", web::post().to(toggle_rate))
            .route("/{id}", web::delete().to(delete_rate)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("km").unwrap(), RateKind::Distance);
        assert_eq!(parse_kind("kg").unwrap(), RateKind::Weight);
        assert!(matches!(
            parse_kind("miles"),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_check_value() {
        assert!(check_value(dec!(2.50)).is_ok());
        assert!(check_value(Decimal::ZERO).is_ok());
        assert!(matches!(
            check_value(dec!(-0.01)),
            Err(AppError::InvalidInput(_))
        ));
    }
}
