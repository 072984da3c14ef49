//! Price rate repository implementation
//!
//! Provides PostgreSQL-backed storage for per-km and per-kg rates.
//! The activation paths (create-as-active and toggle-on) deactivate
//! every sibling of the same kind inside one transaction, so a tenant
//! never ends up with zero or two active rates of a kind.

use chrono::{DateTime, Utc};
use frete_core::{
    models::{PriceRate, RateKind},
    traits::RateRepository,
    AppError, AppResult,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use tracing::{debug, error, info, instrument};

/// PostgreSQL implementation of RateRepository
pub struct PgRateRepository {
    pool: PgPool,
}

impl PgRateRepository {
    /// Create a new rate repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const RATE_COLUMNS: &str = r#"
    id, tenant_id, tipo, valor, ativo, created_at, updated_at
"#;

#[async_trait]
impl RateRepository for PgRateRepository {
    #[instrument(skip(self))]
    async fn list(&self, tenant: Uuid, kind: RateKind) -> AppResult<Vec<PriceRate>> {
        debug!("Listing {} rates for tenant {}", kind, tenant);

        let rows = sqlx::query_as::<sqlx::Postgres, PriceRateRow>(&format!(
            r#"
            SELECT {RATE_COLUMNS}
            FROM precos
            WHERE tenant_id = $1 AND tipo = $2
            ORDER BY created_at DESC, id DESC
            "#,
        ))
        .bind(tenant)
        .bind(kind.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing rates: {}", e);
            AppError::Database(format!("Failed to fetch rates: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(
        &self,
        tenant: Uuid,
        kind: RateKind,
        id: i32,
    ) -> AppResult<Option<PriceRate>> {
        debug!("Finding rate {} for tenant {}", id, tenant);

        let result = sqlx::query_as::<sqlx::Postgres, PriceRateRow>(&format!(
            r#"
            SELECT {RATE_COLUMNS}
            FROM precos
            WHERE id = $1 AND tenant_id = $2 AND tipo = $3
            "#,
        ))
        .bind(id)
        .bind(tenant)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding rate {}: {}", id, e);
            AppError::Database(format!("Failed to find rate: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_active(&self, tenant: Uuid, kind: RateKind) -> AppResult<Option<PriceRate>> {
        debug!("Finding active {} rate for tenant {}", kind, tenant);

        // Newest first mirrors the original lookup; with the one-active
        // invariant in place at most one row can match anyway.
        let result = sqlx::query_as::<sqlx::Postgres, PriceRateRow>(&format!(
            r#"
            SELECT {RATE_COLUMNS}
            FROM precos
            WHERE tenant_id = $1 AND tipo = $2 AND ativo = true
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        ))
        .bind(tenant)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding active rate: {}", e);
            AppError::Database(format!("Failed to find active rate: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn activate(&self, tenant: Uuid, kind: RateKind, value: Decimal) -> AppResult<PriceRate> {
        debug!(
            "Activating new {} rate {} for tenant {}",
            kind, value, tenant
        );

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to start transaction: {}", e);
            AppError::Transaction(format!("Failed to start transaction: {}", e))
        })?;

        // Deactivate the current active rate of this kind, then insert
        // the replacement. Both statements commit together.
        sqlx::query(
            r#"
            UPDATE precos
            SET ativo = false, updated_at = NOW()
            WHERE tenant_id = $1 AND tipo = $2 AND ativo = true
            "#,
        )
        .bind(tenant)
        .bind(kind.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!("Database error deactivating rates: {}", e);
            AppError::Database(format!("Failed to deactivate rates: {}", e))
        })?;

        let row = sqlx::query_as::<sqlx::Postgres, PriceRateRow>(&format!(
            r#"
            INSERT INTO precos (tenant_id, tipo, valor, ativo)
            VALUES ($1, $2, $3, true)
            RETURNING {RATE_COLUMNS}
            "#,
        ))
        .bind(tenant)
        .bind(kind.as_str())
        .bind(value)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!("Database error inserting rate: {}", e);
            AppError::Database(format!("Failed to insert rate: {}", e))
        })?;

        tx.commit().await.map_err(|e| {
            error!("Failed to commit rate activation: {}", e);
            AppError::Transaction(format!("Failed to commit transaction: {}", e))
        })?;

        info!(
            "Activated {} rate {} for tenant {}",
            kind, row.id, tenant
        );

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn update_value(
        &self,
        tenant: Uuid,
        kind: RateKind,
        id: i32,
        value: Decimal,
    ) -> AppResult<PriceRate> {
        debug!("Updating rate {} value to {}", id, value);

        let row = sqlx::query_as::<sqlx::Postgres, PriceRateRow>(&format!(
            r#"
            UPDATE precos
            SET valor = $4, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2 AND tipo = $3
            RETURNING {RATE_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(tenant)
        .bind(kind.as_str())
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating rate {}: {}", id, e);
            AppError::Database(format!("Failed to update rate: {}", e))
        })?
        .ok_or_else(|| AppError::RateNotFound(id.to_string()))?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn set_active(
        &self,
        tenant: Uuid,
        kind: RateKind,
        id: i32,
        active: bool,
    ) -> AppResult<PriceRate> {
        debug!("Setting rate {} active = {}", id, active);

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Failed to start transaction: {}", e);
            AppError::Transaction(format!("Failed to start transaction: {}", e))
        })?;

        if active {
            // Activating an old rate supersedes the current one.
            sqlx::query(
                r#"
                UPDATE precos
                SET ativo = false, updated_at = NOW()
                WHERE tenant_id = $1 AND tipo = $2 AND ativo = true AND id <> $3
                "#,
            )
            .bind(tenant)
            .bind(kind.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("Database error deactivating sibling rates: {}", e);
                AppError::Database(format!("Failed to deactivate rates: {}", e))
            })?;
        }

        let row = sqlx::query_as::<sqlx::Postgres, PriceRateRow>(&format!(
            r#"
            UPDATE precos
            SET ativo = $4, updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2 AND tipo = $3
            RETURNING {RATE_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(tenant)
        .bind(kind.as_str())
        .bind(active)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| {
            error!("Database error toggling rate {}: {}", id, e);
            AppError::Database(format!("Failed to toggle rate: {}", e))
        })?
        .ok_or_else(|| AppError::RateNotFound(id.to_string()))?;

        tx.commit().await.map_err(|e| {
            error!("Failed to commit rate toggle: {}", e);
            AppError::Transaction(format!("Failed to commit transaction: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, tenant: Uuid, kind: RateKind, id: i32) -> AppResult<bool> {
        debug!("Deleting rate {} for tenant {}", id, tenant);

        let result = sqlx::query(
            "DELETE FROM precos WHERE id = $1 AND tenant_id = $2 AND tipo = $3",
        )
        .bind(id)
        .bind(tenant)
        .bind(kind.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error deleting rate {}: {}", id, e);
            AppError::Database(format!("Failed to delete rate: {}", e))
        })?;

        Ok(result.rows_affected() > 0)
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct PriceRateRow {
    id: i32,
    tenant_id: Uuid,
    tipo: String,
    valor: Decimal,
    ativo: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PriceRateRow> for PriceRate {
    fn from(row: PriceRateRow) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            kind: RateKind::from_str(&row.tipo).unwrap_or(RateKind::Distance),
            value: row.valor,
            active: row.ativo,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
