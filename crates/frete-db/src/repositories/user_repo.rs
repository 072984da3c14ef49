//! User repository implementation
//!
//! Provides PostgreSQL-backed storage for user authentication and
//! administration. Users are the only entity queried without a tenant
//! predicate: user administration is a superadmin surface that spans
//! tenants.

use chrono::Utc;
use frete_core::{
    models::{User, UserRole},
    traits::UserRepository,
    AppError, AppResult,
};
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of UserRepository
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Parse user role from string
    fn parse_role(s: &str) -> UserRole {
        UserRole::from_str(s).unwrap_or(UserRole::Operator)
    }

    fn map_row(row: sqlx::postgres::PgRow) -> User {
        User {
            id: row.get("id"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            nome: row.get("nome"),
            empresa: row.get("empresa"),
            role: Self::parse_role(row.get("role")),
            tenant_id: row.get("tenant_id"),
            ativo: row.get("ativo"),
            ultimo_login: row.get("ultimo_login"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

const USER_COLUMNS: &str = r#"
    id, username, password_hash, nome, empresa, role, tenant_id, ativo,
    ultimo_login,
    COALESCE(created_at, NOW()) as created_at,
    COALESCE(updated_at, NOW()) as updated_at
"#;

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn list(&self, limit: i64, offset: i64) -> AppResult<(Vec<User>, i64)> {
        debug!("Listing users with limit {} offset {}", limit, offset);

        let rows = sqlx::query(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM usuarios
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        ))
        .bind(limit)
        .bind(offset)
        .map(Self::map_row)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing users: {}", e);
            AppError::Database(format!("Failed to fetch users: {}", e))
        })?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM usuarios")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting users: {}", e);
                AppError::Database(format!("Failed to count users: {}", e))
            })?;

        Ok((rows, total.0))
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        debug!("Finding user by id: {}", id);

        let result = sqlx::query(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM usuarios
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .map(Self::map_row)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding user {}: {}", id, e);
            AppError::Database(format!("Failed to find user: {}", e))
        })?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        debug!("Finding user by username: {}", username);

        let result = sqlx::query(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM usuarios
            WHERE username = $1
            "#,
        ))
        .bind(username)
        .map(Self::map_row)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding user {}: {}", username, e);
            AppError::Database(format!("Failed to find user: {}", e))
        })?;

        Ok(result)
    }

    #[instrument(skip(self, user))]
    async fn create(&self, user: &User) -> AppResult<User> {
        debug!("Creating user: {}", user.username);

        let result = sqlx::query(&format!(
            r#"
            INSERT INTO usuarios (username, password_hash, nome, empresa, role, tenant_id, ativo)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.nome)
        .bind(&user.empresa)
        .bind(user.role.to_string())
        .bind(user.tenant_id)
        .bind(user.ativo)
        .map(Self::map_row)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                // 23505 = unique_violation (duplicate username)
                if db_err.code().as_deref() == Some("23505") {
                    return AppError::AlreadyExists(format!(
                        "Username {} is already taken",
                        user.username
                    ));
                }
            }
            error!("Database error creating user: {}", e);
            AppError::Database(format!("Failed to create user: {}", e))
        })?;

        Ok(result)
    }

    #[instrument(skip(self, user))]
    async fn update(&self, user: &User) -> AppResult<User> {
        debug!("Updating user: {}", user.id);

        let result = sqlx::query(&format!(
            r#"
            UPDATE usuarios
            SET password_hash = $2,
                nome = $3,
                empresa = $4,
                role = $5,
                ativo = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(user.id)
        .bind(&user.password_hash)
        .bind(&user.nome)
        .bind(&user.empresa)
        .bind(user.role.to_string())
        .bind(user.ativo)
        .map(Self::map_row)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating user {}: {}", user.id, e);
            AppError::Database(format!("Failed to update user: {}", e))
        })?
        .ok_or_else(|| AppError::UserNotFound(user.id.to_string()))?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn set_active(&self, id: i32, active: bool) -> AppResult<User> {
        debug!("Setting user {} active = {}", id, active);

        let result = sqlx::query(&format!(
            r#"
            UPDATE usuarios
            SET ativo = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(active)
        .map(Self::map_row)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error toggling user {}: {}", id, e);
            AppError::Database(format!("Failed to toggle user: {}", e))
        })?
        .ok_or_else(|| AppError::UserNotFound(id.to_string()))?;

        Ok(result)
    }

    #[instrument(skip(self))]
    async fn update_last_login(&self, id: i32) -> AppResult<()> {
        debug!("Updating last login for user {}", id);

        sqlx::query("UPDATE usuarios SET ultimo_login = $2 WHERE id = $1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error updating last login for {}: {}", id, e);
                AppError::Database(format!("Failed to update last login: {}", e))
            })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> AppResult<bool> {
        debug!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting user {}: {}", id, e);
                AppError::Database(format!("Failed to delete user: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role_fallback() {
        assert_eq!(PgUserRepository::parse_role("admin"), UserRole::Admin);
        assert_eq!(
            PgUserRepository::parse_role("superadmin"),
            UserRole::Superadmin
        );
        assert_eq!(PgUserRepository::parse_role("banana"), UserRole::Operator);
    }
}
