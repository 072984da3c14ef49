//! Price rate DTOs
//!
//! Request and response types for per-km and per-kg rate management.
//! Negative values are rejected by the handlers before they reach the
//! repository.

use chrono::{DateTime, Utc};
use frete_core::models::{PriceRate, RateKind};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Rate creation request
///
/// Creating a rate activates it and supersedes the current active rate
/// of the same kind.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RateCreateRequest {
    /// Price per unit (currency per km or per kg)
    pub value: Decimal,
}

/// Rate value update request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RateUpdateRequest {
    /// New price per unit
    pub value: Decimal,
}

/// Rate response
#[derive(Debug, Clone, Serialize)]
pub struct RateResponse {
    /// Rate ID
    pub id: i32,

    /// Rate kind ("km" or "kg")
    pub kind: RateKind,

    /// Price per unit
    pub value: Decimal,

    /// Whether this rate is currently applied to new trips
    pub active: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<PriceRate> for RateResponse {
    fn from(rate: PriceRate) -> Self {
        Self {
            id: rate.id,
            kind: rate.kind,
            value: rate.value,
            active: rate.active,
            created_at: rate.created_at,
            updated_at: rate.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_response_conversion() {
        let rate = PriceRate {
            id: 7,
            kind: RateKind::Weight,
            value: dec!(0.10),
            active: true,
            ..Default::default()
        };

        let response = RateResponse::from(rate);
        assert_eq!(response.id, 7);
        assert_eq!(response.kind, RateKind::Weight);
        assert_eq!(response.value, dec!(0.10));
        assert!(response.active);
    }
}
