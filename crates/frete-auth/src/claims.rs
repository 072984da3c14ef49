//! JWT Claims structure
//!
//! Defines the claims structure used in JWT tokens for authentication.
//! Besides the username and role, the claims carry the user's tenant id;
//! every handler scopes its queries by the tenant taken from here.

use chrono::{Duration, Utc};
use frete_core::models::UserRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// User role
    pub role: UserRole,

    /// Tenant the user's data belongs to
    pub tenant_id: Uuid,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create new claims for a user
    ///
    /// # Examples
    ///
    /// ```
    /// use frete_auth::Claims;
    /// use frete_core::models::UserRole;
    /// use uuid::Uuid;
    ///
    /// let claims = Claims::new("admin", UserRole::Admin, Uuid::nil());
    /// assert_eq!(claims.sub, "admin");
    /// assert_eq!(claims.role, UserRole::Admin);
    /// ```
    pub fn new(username: &str, role: UserRole, tenant_id: Uuid) -> Self {
        let now = Utc::now();

        Self {
            sub: username.to_string(),
            role,
            tenant_id,
            iat: now.timestamp(),
            exp: 0, // Will be set by JwtService
        }
    }

    /// Create new claims with custom expiration duration
    pub fn with_expiration(
        username: &str,
        role: UserRole,
        tenant_id: Uuid,
        expires_in_secs: i64,
    ) -> Self {
        let now = Utc::now();
        let exp = now + Duration::seconds(expires_in_secs);

        Self {
            sub: username.to_string(),
            role,
            tenant_id,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp();
        self.exp <= now
    }

    /// Get the username from the claims
    pub fn username(&self) -> &str {
        &self.sub
    }

    /// Get the user role
    pub fn role(&self) -> UserRole {
        self.role
    }

    /// Check if user has admin privileges
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Check if user has superadmin privileges
    pub fn is_superadmin(&self) -> bool {
        self.role.is_superadmin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_creation() {
        let tenant = Uuid::new_v4();
        let claims = Claims::new("testuser", UserRole::Operator, tenant);
        assert_eq!(claims.sub, "testuser");
        assert_eq!(claims.role, UserRole::Operator);
        assert_eq!(claims.tenant_id, tenant);
        assert!(claims.iat > 0);
    }

    #[test]
    fn test_claims_with_expiration() {
        let claims = Claims::with_expiration("admin", UserRole::Admin, Uuid::nil(), 3600);
        assert!(!claims.is_expired());

        let now = Utc::now().timestamp();
        assert!(claims.exp > now);
        assert!(claims.exp <= now + 3600);
    }

    #[test]
    fn test_expired_claims() {
        let mut claims = Claims::new("user", UserRole::Operator, Uuid::nil());
        claims.exp = (Utc::now() - Duration::hours(1)).timestamp();
        assert!(claims.is_expired());
    }

    #[test]
    fn test_role_checks() {
        let operator_claims = Claims::new("operator", UserRole::Operator, Uuid::nil());
        assert!(!operator_claims.is_admin());
        assert!(!operator_claims.is_superadmin());

        let admin_claims = Claims::new("admin", UserRole::Admin, Uuid::nil());
        assert!(admin_claims.is_admin());
        assert!(!admin_claims.is_superadmin());

        let superadmin_claims = Claims::new("superadmin", UserRole::Superadmin, Uuid::nil());
        assert!(superadmin_claims.is_admin());
        assert!(superadmin_claims.is_superadmin());
    }

    #[test]
    fn test_tenant_survives_serde() {
        let tenant = Uuid::new_v4();
        let claims = Claims::with_expiration("user", UserRole::Operator, tenant, 3600);

        let json = serde_json::to_string(&claims).unwrap();
        let decoded: Claims = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.tenant_id, tenant);
        assert_eq!(decoded, claims);
    }
}
