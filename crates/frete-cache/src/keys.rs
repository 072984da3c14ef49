//! Cache key constants and builders for the freight backend
//!
//! Provides standardized key naming patterns for cached entities,
//! ensuring consistency across the application and preventing key
//! collisions.
//!
//! # Key Patterns
//!
//! - `pricing:{tenant_id}` - Assembled active pricing configuration per tenant
//!
//! # Example
//!
//! ```
//! use frete_cache::keys;
//! use uuid::Uuid;
//!
//! let tenant = Uuid::nil();
//! let key = keys::pricing_config_key(tenant);
//! assert_eq!(key, format!("pricing:{}", tenant));
//! ```

use uuid::Uuid;

/// Prefix for cached pricing configuration
///
/// Format: `pricing:{tenant_id}`
pub const PRICING_CONFIG_PREFIX: &str = "pricing";

/// Build a cache key for a tenant's pricing configuration
pub fn pricing_config_key(tenant_id: Uuid) -> String {
    format!("{}:{}", PRICING_CONFIG_PREFIX, tenant_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_config_key() {
        let tenant = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            pricing_config_key(tenant),
            "pricing:550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn test_keys_are_tenant_scoped() {
        let a = pricing_config_key(Uuid::new_v4());
        let b = pricing_config_key(Uuid::new_v4());
        assert_ne!(a, b);
    }
}
