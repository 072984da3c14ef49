//! User administration DTOs
//!
//! Request types for the superadmin user management endpoints. Responses
//! reuse `UserInfo` from frete-core.

use serde::Deserialize;
use validator::Validate;

/// User creation request
///
/// A fresh tenant id is provisioned for every new user.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserCreateRequest {
    /// Username (unique, immutable after creation)
    #[validate(length(
        min = 3,
        max = 100,
        message = "Username must be between 3 and 100 characters"
    ))]
    pub username: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    /// Display name
    pub nome: Option<String>,

    /// Company name shown on reports
    pub empresa: Option<String>,

    /// Role (operator, admin, superadmin)
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "operator".to_string()
}

/// User update request
///
/// The username cannot be changed; the password is only changed when
/// provided.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UserUpdateRequest {
    /// New password (omit to keep the current one)
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,

    /// Display name
    pub nome: Option<String>,

    /// Company name shown on reports
    pub empresa: Option<String>,

    /// Role (operator, admin, superadmin)
    pub role: Option<String>,

    /// Active flag
    pub ativo: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let valid = UserCreateRequest {
            username: "jsilva".to_string(),
            password: "secret-password".to_string(),
            nome: Some("João da Silva".to_string()),
            empresa: Some("Silva Transportes".to_string()),
            role: "operator".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_username = UserCreateRequest {
            username: "ab".to_string(),
            password: "secret-password".to_string(),
            nome: None,
            empresa: None,
            role: "operator".to_string(),
        };
        assert!(short_username.validate().is_err());

        let short_password = UserCreateRequest {
            username: "jsilva".to_string(),
            password: "abc".to_string(),
            nome: None,
            empresa: None,
            role: "operator".to_string(),
        };
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_update_request_optional_password() {
        let no_password: UserUpdateRequest =
            serde_json::from_str(r#"{"nome": "Novo Nome"}"#).unwrap();
        assert!(no_password.validate().is_ok());
        assert!(no_password.password.is_none());

        let short_password: UserUpdateRequest =
            serde_json::from_str(r#"{"password": "abc"}"#).unwrap();
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn test_default_role() {
        let req: UserCreateRequest = serde_json::from_str(
            r#"{"username": "jsilva", "password": "secret-password"}"#,
        )
        .unwrap();
        assert_eq!(req.role, "operator");
    }
}
