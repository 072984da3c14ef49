//! Departure fee band DTOs
//!
//! Request and response types for fee band management.

use chrono::{DateTime, Utc};
use frete_core::models::DepartureFeeBand;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Fee band creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FeeBandCreateRequest {
    /// Inclusive lower bound of the covered distance range (km)
    #[validate(range(min = 0, message = "start_km must be non-negative"))]
    pub start_km: i32,

    /// Inclusive upper bound of the covered distance range (km)
    #[validate(range(min = 0, message = "end_km must be non-negative"))]
    pub end_km: i32,

    /// Flat fee charged for trips within the range
    pub value: Decimal,
}

impl FeeBandCreateRequest {
    /// Convert to a DepartureFeeBand entity for the given tenant
    pub fn to_band(&self, tenant_id: Uuid) -> DepartureFeeBand {
        DepartureFeeBand {
            tenant_id,
            start_km: self.start_km,
            end_km: self.end_km,
            value: self.value,
            ..Default::default()
        }
    }
}

/// Fee band update request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FeeBandUpdateRequest {
    /// Inclusive lower bound of the covered distance range (km)
    #[validate(range(min = 0, message = "start_km must be non-negative"))]
    pub start_km: i32,

    /// Inclusive upper bound of the covered distance range (km)
    #[validate(range(min = 0, message = "end_km must be non-negative"))]
    pub end_km: i32,

    /// Flat fee charged for trips within the range
    pub value: Decimal,
}

/// Fee band response
#[derive(Debug, Clone, Serialize)]
pub struct FeeBandResponse {
    /// Band ID
    pub id: i32,

    /// Inclusive lower bound (km)
    pub start_km: i32,

    /// Inclusive upper bound (km)
    pub end_km: i32,

    /// Flat fee
    pub value: Decimal,

    /// Whether this band participates in fee resolution
    pub active: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<DepartureFeeBand> for FeeBandResponse {
    fn from(band: DepartureFeeBand) -> Self {
        Self {
            id: band.id,
            start_km: band.start_km,
            end_km: band.end_km,
            value: band.value,
            active: band.active,
            created_at: band.created_at,
            updated_at: band.updated_at,
        }
    }
}
