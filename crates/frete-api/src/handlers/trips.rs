//! Trip handlers
//!
//! HTTP handlers for trip recording. The quote endpoint is the pure
//! preview the trip form re-runs on every input change; creating or
//! editing a trip re-runs the same computation and snapshots the
//! breakdown onto the stored row. Stored trips are never re-priced when
//! the tenant's rates change afterwards.

use crate::dto::trip::{
    QuoteRequest, TripCostResponse, TripCreateRequest, TripResponse, TripUpdateRequest,
};
use crate::dto::{ApiResponse, PaginationParams};
use actix_web::{web, HttpResponse};
use frete_auth::AuthenticatedUser;
use frete_core::models::Trip;
use frete_core::traits::{PricingService, TripRepository};
use frete_core::AppError;
use frete_db::PgTripRepository;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Compute a cost preview without persisting anything
///
/// POST /api/v1/trips/quote
#[instrument(skip(pricing, user, req))]
pub async fn quote_trip(
    pricing: web::Data<Arc<dyn PricingService>>,
    user: AuthenticatedUser,
    req: web::Json<QuoteRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Quote validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let cost = pricing.quote(user.tenant_id, &req.to_input()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(TripCostResponse::from(cost))))
}

/// List trips with pagination, newest date first
///
/// GET /api/v1/trips
#[instrument(skip(pool, user))]
pub async fn list_trips(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(
        page = query.page,
        per_page = query.per_page,
        tenant = %user.tenant_id,
        "Listing trips"
    );

    let repo = PgTripRepository::new(pool.get_ref().clone());
    let (trips, total) = repo
        .list(user.tenant_id, query.limit(), query.offset())
        .await?;

    let response: Vec<TripResponse> = trips.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(query.paginate(response, total)))
}

/// Record a new trip
///
/// POST /api/v1/trips
#[instrument(skip(pool, pricing, user, req))]
pub async fn create_trip(
    pool: web::Data<PgPool>,
    pricing: web::Data<Arc<dyn PricingService>>,
    user: AuthenticatedUser,
    req: web::Json<TripCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Trip creation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(date = %req.date, tenant = %user.tenant_id, "Creating trip");

    // Price against the rates active right now and snapshot the result.
    let cost = pricing.quote(user.tenant_id, &req.to_input()).await?;

    let mut trip = Trip {
        tenant_id: user.tenant_id,
        date: req.date,
        cargo: req.cargo.clone(),
        start_km: req.start_km,
        end_km: req.end_km,
        weight: req.weight,
        ..Default::default()
    };
    trip.apply_cost(&cost);

    let repo = PgTripRepository::new(pool.get_ref().clone());
    let created = repo.create(&trip).await?;

    info!(
        id = created.id,
        total = %created.total_price,
        user = %user.username,
        "Trip recorded"
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(TripResponse::from(created))))
}

/// Edit a trip, re-pricing it against the currently active rates
///
/// PUT /api/v1/trips/{id}
#[instrument(skip(pool, pricing, user, req))]
pub async fn update_trip(
    pool: web::Data<PgPool>,
    pricing: web::Data<Arc<dyn PricingService>>,
    path: web::Path<i64>,
    user: AuthenticatedUser,
    req: web::Json<TripUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let trip_id = path.into_inner();

    req.validate().map_err(|e| {
        warn!("Trip update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let repo = PgTripRepository::new(pool.get_ref().clone());
    let existing = repo
        .find_by_id(user.tenant_id, trip_id)
        .await?
        .ok_or_else(|| AppError::TripNotFound(trip_id.to_string()))?;

    debug!(id = trip_id, "Updating trip");

    let cost = pricing.quote(user.tenant_id, &req.to_input()).await?;

    let mut trip = Trip {
        date: req.date,
        cargo: req.cargo.clone(),
        start_km: req.start_km,
        end_km: req.end_km,
        weight: req.weight,
        ..existing
    };
    trip.apply_cost(&cost);

    let updated = repo.update(&trip).await?;

    info!(
        id = updated.id,
        total = %updated.total_price,
        user = %user.username,
        "Trip updated"
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(TripResponse::from(updated))))
}

/// Delete a trip (hard delete)
///
/// DELETE /api/v1/trips/{id}
#[instrument(skip(pool, user))]
pub async fn delete_trip(
    pool: web::Data<PgPool>,
    path: web::Path<i64>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let trip_id = path.into_inner();

    debug!(id = trip_id, user = %user.username, "Deleting trip");

    let repo = PgTripRepository::new(pool.get_ref().clone());
    let deleted = repo.delete(user.tenant_id, trip_id).await?;

    if !deleted {
        return Err(AppError::TripNotFound(trip_id.to_string()));
    }

    info!(id = trip_id, user = %user.username, "Trip deleted");
    Ok(HttpResponse::NoContent().finish())
}

/// Configure trip routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/trips")
            .route("", web::get().to(list_trips))
            .route("", web::post().to(create_trip))
            .route("/quote", web::post().to(quote_trip))
            .route("/{id}", web::put().to(update_trip))
            .route("/{id}", web::delete().to(delete_trip)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trip_request_validation() {
        let valid = TripCreateRequest {
            date: NaiveDate::from_ymd_opt(2025, 11, 24).unwrap(),
            cargo: Some("GR-114".to_string()),
            start_km: dec!(100),
            end_km: dec!(350),
            weight: dec!(1000),
        };
        assert!(valid.validate().is_ok());
    }
}
