//! User model
//!
//! Represents system users for authentication and authorization. Every
//! non-superadmin user belongs to exactly one tenant; all pricing and
//! trip data the user sees is partitioned by that tenant id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// User role enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Standard operator with access to the tenant's own data
    #[default]
    Operator,
    /// Administrator of a tenant (pricing configuration included)
    Admin,
    /// Super administrator with cross-tenant user management
    Superadmin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Operator => write!(f, "operator"),
            UserRole::Admin => write!(f, "admin"),
            UserRole::Superadmin => write!(f, "superadmin"),
        }
    }
}

impl UserRole {
    /// Parse from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "operator" => Some(UserRole::Operator),
            "admin" => Some(UserRole::Admin),
            "superadmin" => Some(UserRole::Superadmin),
            _ => None,
        }
    }

    /// Check if role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Superadmin)
    }

    /// Check if role has superadmin privileges
    pub fn is_superadmin(&self) -> bool {
        matches!(self, UserRole::Superadmin)
    }

    /// Get role hierarchy level (higher = more privileges)
    pub fn level(&self) -> u8 {
        match self {
            UserRole::Operator => 1,
            UserRole::Admin => 2,
            UserRole::Superadmin => 3,
        }
    }

    /// Check if this role can manage another role
    pub fn can_manage(&self, other: &UserRole) -> bool {
        self.level() > other.level()
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i32,

    /// Username (unique, for login)
    pub username: String,

    /// Password hash (never expose in API responses)
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Display name
    pub nome: Option<String>,

    /// Company name shown on reports
    pub empresa: Option<String>,

    /// User role
    pub role: UserRole,

    /// Tenant this user's data belongs to
    pub tenant_id: Uuid,

    /// Whether user is active
    pub ativo: bool,

    /// Last login timestamp
    pub ultimo_login: Option<DateTime<Utc>>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Name to show in the UI (falls back to the username)
    pub fn display_name(&self) -> &str {
        self.nome.as_deref().unwrap_or(&self.username)
    }

    /// Check if user can perform admin actions
    pub fn can_admin(&self) -> bool {
        self.ativo && self.role.is_admin()
    }

    /// Check if user can perform superadmin actions
    pub fn can_superadmin(&self) -> bool {
        self.ativo && self.role.is_superadmin()
    }

    /// Check if user is active and can login
    pub fn can_login(&self) -> bool {
        self.ativo
    }
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            username: String::new(),
            password_hash: String::new(),
            nome: None,
            empresa: None,
            role: UserRole::Operator,
            tenant_id: Uuid::nil(),
            ativo: true,
            ultimo_login: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// User info for API responses (without sensitive data)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i32,
    pub username: String,
    pub nome: Option<String>,
    pub empresa: Option<String>,
    pub role: String,
    pub tenant_id: Uuid,
    pub ativo: bool,
    pub ultimo_login: Option<DateTime<Utc>>,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            nome: user.nome,
            empresa: user.empresa,
            role: user.role.to_string(),
            tenant_id: user.tenant_id,
            ativo: user.ativo,
            ultimo_login: user.ultimo_login,
        }
    }
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            nome: user.nome.clone(),
            empresa: user.empresa.clone(),
            role: user.role.to_string(),
            tenant_id: user.tenant_id,
            ativo: user.ativo,
            ultimo_login: user.ultimo_login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(UserRole::from_str("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::from_str("SUPERADMIN"), Some(UserRole::Superadmin));
        assert_eq!(UserRole::from_str("operator"), Some(UserRole::Operator));
        assert_eq!(UserRole::from_str("root"), None);
    }

    #[test]
    fn test_role_hierarchy() {
        assert!(UserRole::Superadmin.can_manage(&UserRole::Admin));
        assert!(UserRole::Admin.can_manage(&UserRole::Operator));
        assert!(!UserRole::Admin.can_manage(&UserRole::Admin));
        assert!(!UserRole::Operator.can_manage(&UserRole::Admin));
    }

    #[test]
    fn test_privilege_checks() {
        assert!(UserRole::Admin.is_admin());
        assert!(UserRole::Superadmin.is_admin());
        assert!(!UserRole::Operator.is_admin());
        assert!(UserRole::Superadmin.is_superadmin());
        assert!(!UserRole::Admin.is_superadmin());
    }

    #[test]
    fn test_inactive_user_loses_privileges() {
        let user = User {
            role: UserRole::Admin,
            ativo: false,
            ..Default::default()
        };
        assert!(!user.can_admin());
        assert!(!user.can_login());
    }

    #[test]
    fn test_display_name_fallback() {
        let mut user = User {
            username: "jsilva".to_string(),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "jsilva");

        user.nome = Some("João da Silva".to_string());
        assert_eq!(user.display_name(), "João da Silva");
    }

    #[test]
    fn test_user_info_hides_password() {
        let user = User {
            username: "jsilva".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));

        let info = UserInfo::from(&user);
        assert_eq!(info.username, "jsilva");
    }
}
