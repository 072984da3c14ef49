//! Common traits for repositories and services
//!
//! Defines abstractions for database access and business logic. Every
//! repository method that touches pricing or trip data takes the owning
//! tenant id; repositories must never return rows across tenants.

use crate::error::AppError;
use crate::models::{
    DailyBreakdownPoint, DepartureFeeBand, PeriodTotals, PriceRate, RateKind, Trip, User,
};
use crate::pricing::{PricingConfig, TripCost, TripInput};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// Price rate repository
#[async_trait]
pub trait RateRepository: Send + Sync {
    /// List a tenant's rate history of one kind, newest first
    async fn list(&self, tenant: Uuid, kind: RateKind) -> Result<Vec<PriceRate>, AppError>;

    /// Find a rate by id within a tenant and kind
    async fn find_by_id(
        &self,
        tenant: Uuid,
        kind: RateKind,
        id: i32,
    ) -> Result<Option<PriceRate>, AppError>;

    /// Find the currently active rate of one kind, if any
    async fn find_active(
        &self,
        tenant: Uuid,
        kind: RateKind,
    ) -> Result<Option<PriceRate>, AppError>;

    /// Insert a new active rate, deactivating every sibling of the same
    /// kind in the same transaction
    async fn activate(
        &self,
        tenant: Uuid,
        kind: RateKind,
        value: Decimal,
    ) -> Result<PriceRate, AppError>;

    /// Change a rate's value without touching its activation state
    async fn update_value(
        &self,
        tenant: Uuid,
        kind: RateKind,
        id: i32,
        value: Decimal,
    ) -> Result<PriceRate, AppError>;

    /// Toggle a rate's activation state; activating deactivates every
    /// sibling of the same kind in the same transaction
    async fn set_active(
        &self,
        tenant: Uuid,
        kind: RateKind,
        id: i32,
        active: bool,
    ) -> Result<PriceRate, AppError>;

    /// Hard delete a rate
    async fn delete(&self, tenant: Uuid, kind: RateKind, id: i32) -> Result<bool, AppError>;
}

/// Departure fee band repository
#[async_trait]
pub trait FeeBandRepository: Send + Sync {
    /// List all of a tenant's bands, ordered by start_km
    async fn list(&self, tenant: Uuid) -> Result<Vec<DepartureFeeBand>, AppError>;

    /// List only the active bands, ordered by start_km
    async fn find_active(&self, tenant: Uuid) -> Result<Vec<DepartureFeeBand>, AppError>;

    /// Find a band by id within a tenant
    async fn find_by_id(&self, tenant: Uuid, id: i32) -> Result<Option<DepartureFeeBand>, AppError>;

    /// Insert a new active band; fails with `BandOverlap` when the range
    /// overlaps an existing active band
    async fn create(&self, band: &DepartureFeeBand) -> Result<DepartureFeeBand, AppError>;

    /// Update a band's range and value; same overlap rule as `create`
    async fn update(&self, band: &DepartureFeeBand) -> Result<DepartureFeeBand, AppError>;

    /// Toggle a band's activation state; activating re-checks overlap
    /// against the other active bands
    async fn set_active(
        &self,
        tenant: Uuid,
        id: i32,
        active: bool,
    ) -> Result<DepartureFeeBand, AppError>;

    /// Hard delete a band
    async fn delete(&self, tenant: Uuid, id: i32) -> Result<bool, AppError>;
}

/// Trip repository
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// List a tenant's trips, newest date first, with total count
    async fn list(
        &self,
        tenant: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Trip>, i64), AppError>;

    /// List trips inside an inclusive date range, oldest first
    async fn list_range(
        &self,
        tenant: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Trip>, AppError>;

    /// Find a trip by id within a tenant
    async fn find_by_id(&self, tenant: Uuid, id: i64) -> Result<Option<Trip>, AppError>;

    /// Insert a new trip with its snapshotted breakdown
    async fn create(&self, trip: &Trip) -> Result<Trip, AppError>;

    /// Update a trip (re-snapshotted breakdown included)
    async fn update(&self, trip: &Trip) -> Result<Trip, AppError>;

    /// Hard delete a trip
    async fn delete(&self, tenant: Uuid, id: i64) -> Result<bool, AppError>;

    /// Aggregate totals over an inclusive date range
    async fn period_totals(
        &self,
        tenant: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PeriodTotals, AppError>;

    /// Per-day aggregates over an inclusive date range, oldest first
    async fn daily_breakdown(
        &self,
        tenant: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyBreakdownPoint>, AppError>;
}

/// User repository
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// List users with pagination and total count
    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<User>, i64), AppError>;

    /// Find user by id
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError>;

    /// Find user by username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Create a new user
    async fn create(&self, user: &User) -> Result<User, AppError>;

    /// Update an existing user
    async fn update(&self, user: &User) -> Result<User, AppError>;

    /// Toggle a user's active flag
    async fn set_active(&self, id: i32, active: bool) -> Result<User, AppError>;

    /// Update last login timestamp
    async fn update_last_login(&self, id: i32) -> Result<(), AppError>;

    /// Hard delete a user
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}

/// Pricing service
///
/// Assembles a tenant's active pricing configuration and computes trip
/// quotes with the pure engine.
#[async_trait]
pub trait PricingService: Send + Sync {
    /// Load the tenant's active pricing configuration
    async fn active_config(&self, tenant: Uuid) -> Result<PricingConfig, AppError>;

    /// Compute a trip cost preview from the active configuration
    async fn quote(&self, tenant: Uuid, input: &TripInput) -> Result<TripCost, AppError>;

    /// Drop the tenant's cached configuration after a pricing change
    async fn invalidate(&self, tenant: Uuid) -> Result<(), AppError>;
}

/// Cache service trait
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Get value from cache
    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError>;

    /// Set value in cache with TTL
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> Result<(), AppError>;

    /// Delete value from cache
    async fn delete(&self, key: &str) -> Result<bool, AppError>;

    /// Check if key exists
    async fn exists(&self, key: &str) -> Result<bool, AppError>;

    /// Set expiration
    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<bool, AppError>;
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            total,
            page,
            per_page,
            total_pages,
        }
    }
}
