//! Authentication and authorization for the freight backend
//!
//! This crate provides JWT-based authentication, password hashing with Argon2,
//! and Actix-web middleware for role-based access control. Tokens carry the
//! user's tenant id, which is how every downstream query is scoped.
//!
//! # Features
//!
//! - JWT token creation and validation
//! - Argon2 password hashing and verification
//! - Request extractors for authenticated users
//! - Role-based access control (RBAC)
//!
//! # Examples
//!
//! ## Creating a JWT token
//!
//! ```no_run
//! use frete_auth::{Claims, JwtService};
//! use frete_core::models::UserRole;
//! use uuid::Uuid;
//!
//! let jwt_service = JwtService::new("your-secret-key", 3600);
//! let claims = Claims::new("admin", UserRole::Admin, Uuid::new_v4());
//! let token = jwt_service.create_token(&claims)?;
//! # Ok::<(), frete_core::error::AppError>(())
//! ```
//!
//! ## Password hashing
//!
//! ```no_run
//! use frete_auth::PasswordService;
//!
//! let password_service = PasswordService::new();
//! let hash = password_service.hash_password("secure_password")?;
//! let is_valid = password_service.verify_password("secure_password", &hash)?;
//! assert!(is_valid);
//! # Ok::<(), frete_core::error::AppError>(())
//! ```

pub mod claims;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use claims::Claims;
pub use jwt::JwtService;
pub use middleware::{AdminUser, AuthenticatedUser, SuperadminUser};
pub use password::PasswordService;

#[cfg(test)]
mod tests {
    use super::*;
    use frete_core::models::UserRole;
    use uuid::Uuid;

    #[test]
    fn test_integration_jwt_and_password() {
        let password_service = PasswordService::new();
        let jwt_service = JwtService::new("test-secret-key-12345", 3600);

        // Test password hashing
        let password = "my_secure_password";
        let hash = password_service.hash_password(password).unwrap();
        assert!(password_service.verify_password(password, &hash).unwrap());
        assert!(!password_service
            .verify_password("wrong_password", &hash)
            .unwrap());

        // Test JWT creation and validation
        let tenant = Uuid::new_v4();
        let claims = Claims::new("testuser", UserRole::Admin, tenant);
        let token = jwt_service.create_token(&claims).unwrap();
        let decoded_claims = jwt_service.validate_token(&token).unwrap();

        assert_eq!(decoded_claims.sub, "testuser");
        assert_eq!(decoded_claims.role, UserRole::Admin);
        assert_eq!(decoded_claims.tenant_id, tenant);
    }
}
