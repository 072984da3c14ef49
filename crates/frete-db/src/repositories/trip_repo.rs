//! Trip repository implementation
//!
//! Provides PostgreSQL-backed storage for recorded trips, including the
//! period aggregates that feed the reports and dashboard endpoints. The
//! price breakdown columns are plain value copies taken at save time;
//! nothing here re-derives them from the pricing tables.

use chrono::{DateTime, NaiveDate, Utc};
use frete_core::{
    models::{DailyBreakdownPoint, PeriodTotals, Trip},
    traits::TripRepository,
    AppError, AppResult,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use tracing::{debug, error, instrument};

/// PostgreSQL implementation of TripRepository
pub struct PgTripRepository {
    pool: PgPool,
}

impl PgTripRepository {
    /// Create a new trip repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const TRIP_COLUMNS: &str = r#"
    id, tenant_id, data, carga, km_inicial, km_final, km_total, peso,
    valor_km, valor_peso, taxa_arrancada, preco_total, created_at, updated_at
"#;

#[async_trait]
impl TripRepository for PgTripRepository {
    #[instrument(skip(self))]
    async fn list(&self, tenant: Uuid, limit: i64, offset: i64) -> AppResult<(Vec<Trip>, i64)> {
        debug!(
            "Listing trips for tenant {} limit {} offset {}",
            tenant, limit, offset
        );

        let rows = sqlx::query_as::<sqlx::Postgres, TripRow>(&format!(
            r#"
            SELECT {TRIP_COLUMNS}
            FROM lancamentos
            WHERE tenant_id = $1
            ORDER BY data DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(tenant)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing trips: {}", e);
            AppError::Database(format!("Failed to fetch trips: {}", e))
        })?;

        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM lancamentos WHERE tenant_id = $1")
            .bind(tenant)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting trips: {}", e);
                AppError::Database(format!("Failed to count trips: {}", e))
            })?;

        Ok((rows.into_iter().map(Into::into).collect(), total.0))
    }

    #[instrument(skip(self))]
    async fn list_range(
        &self,
        tenant: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<Trip>> {
        debug!("Listing trips for tenant {} from {} to {}", tenant, from, to);

        let rows = sqlx::query_as::<sqlx::Postgres, TripRow>(&format!(
            r#"
            SELECT {TRIP_COLUMNS}
            FROM lancamentos
            WHERE tenant_id = $1 AND data >= $2 AND data <= $3
            ORDER BY data, id
            "#,
        ))
        .bind(tenant)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing trips in range: {}", e);
            AppError::Database(format!("Failed to fetch trips: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, tenant: Uuid, id: i64) -> AppResult<Option<Trip>> {
        debug!("Finding trip {} for tenant {}", id, tenant);

        let result = sqlx::query_as::<sqlx::Postgres, TripRow>(&format!(
            r#"
            SELECT {TRIP_COLUMNS}
            FROM lancamentos
            WHERE id = $1 AND tenant_id = $2
            "#,
        ))
        .bind(id)
        .bind(tenant)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding trip {}: {}", id, e);
            AppError::Database(format!("Failed to find trip: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self, trip))]
    async fn create(&self, trip: &Trip) -> AppResult<Trip> {
        debug!("Creating trip for tenant {}", trip.tenant_id);

        let row = sqlx::query_as::<sqlx::Postgres, TripRow>(&format!(
            r#"
            INSERT INTO lancamentos (
                tenant_id, data, carga, km_inicial, km_final, km_total, peso,
                valor_km, valor_peso, taxa_arrancada, preco_total
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {TRIP_COLUMNS}
            "#,
        ))
        .bind(trip.tenant_id)
        .bind(trip.date)
        .bind(&trip.cargo)
        .bind(trip.start_km)
        .bind(trip.end_km)
        .bind(trip.total_km)
        .bind(trip.weight)
        .bind(trip.applied_distance_rate)
        .bind(trip.applied_weight_rate)
        .bind(trip.applied_departure_fee)
        .bind(trip.total_price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating trip: {}", e);
            AppError::Database(format!("Failed to create trip: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, trip))]
    async fn update(&self, trip: &Trip) -> AppResult<Trip> {
        debug!("Updating trip {}", trip.id);

        let row = sqlx::query_as::<sqlx::Postgres, TripRow>(&format!(
            r#"
            UPDATE lancamentos
            SET data = $3,
                carga = $4,
                km_inicial = $5,
                km_final = $6,
                km_total = $7,
                peso = $8,
                valor_km = $9,
                valor_peso = $10,
                taxa_arrancada = $11,
                preco_total = $12,
                updated_at = NOW()
            WHERE id = $1 AND tenant_id = $2
            RETURNING {TRIP_COLUMNS}
            "#,
        ))
        .bind(trip.id)
        .bind(trip.tenant_id)
        .bind(trip.date)
        .bind(&trip.cargo)
        .bind(trip.start_km)
        .bind(trip.end_km)
        .bind(trip.total_km)
        .bind(trip.weight)
        .bind(trip.applied_distance_rate)
        .bind(trip.applied_weight_rate)
        .bind(trip.applied_departure_fee)
        .bind(trip.total_price)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating trip {}: {}", trip.id, e);
            AppError::Database(format!("Failed to update trip: {}", e))
        })?
        .ok_or_else(|| AppError::TripNotFound(trip.id.to_string()))?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, tenant: Uuid, id: i64) -> AppResult<bool> {
        debug!("Deleting trip {} for tenant {}", id, tenant);

        let result = sqlx::query("DELETE FROM lancamentos WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(tenant)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting trip {}: {}", id, e);
                AppError::Database(format!("Failed to delete trip: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn period_totals(
        &self,
        tenant: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<PeriodTotals> {
        debug!(
            "Aggregating totals for tenant {} from {} to {}",
            tenant, from, to
        );

        let row: (i64, Decimal, Decimal, Decimal) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*)::BIGINT,
                COALESCE(SUM(km_total), 0),
                COALESCE(SUM(peso), 0),
                COALESCE(SUM(preco_total), 0)
            FROM lancamentos
            WHERE tenant_id = $1 AND data >= $2 AND data <= $3
            "#,
        )
        .bind(tenant)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error aggregating period totals: {}", e);
            AppError::Database(format!("Failed to aggregate trips: {}", e))
        })?;

        Ok(PeriodTotals {
            trips: row.0,
            total_km: row.1,
            total_weight: row.2,
            total_revenue: row.3,
        })
    }

    #[instrument(skip(self))]
    async fn daily_breakdown(
        &self,
        tenant: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<DailyBreakdownPoint>> {
        debug!(
            "Aggregating daily breakdown for tenant {} from {} to {}",
            tenant, from, to
        );

        let rows: Vec<(NaiveDate, i64, Decimal, Decimal)> = sqlx::query_as(
            r#"
            SELECT
                data,
                COUNT(*)::BIGINT,
                COALESCE(SUM(km_total), 0),
                COALESCE(SUM(preco_total), 0)
            FROM lancamentos
            WHERE tenant_id = $1 AND data >= $2 AND data <= $3
            GROUP BY data
            ORDER BY data
            "#,
        )
        .bind(tenant)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error aggregating daily breakdown: {}", e);
            AppError::Database(format!("Failed to aggregate trips: {}", e))
        })?;

        Ok(rows
            .into_iter()
            .map(|(date, trips, total_km, revenue)| DailyBreakdownPoint {
                date,
                trips,
                total_km,
                revenue,
            })
            .collect())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct TripRow {
    id: i64,
    tenant_id: Uuid,
    data: NaiveDate,
    carga: Option<String>,
    km_inicial: Decimal,
    km_final: Decimal,
    km_total: Decimal,
    peso: Decimal,
    valor_km: Decimal,
    valor_peso: Decimal,
    taxa_arrancada: Decimal,
    preco_total: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TripRow> for Trip {
    fn from(row: TripRow) -> Self {
        Self {
            id: row.id,
            tenant_id: row.tenant_id,
            date: row.data,
            cargo: row.carga,
            start_km: row.km_inicial,
            end_km: row.km_final,
            total_km: row.km_total,
            weight: row.peso,
            applied_distance_rate: row.valor_km,
            applied_weight_rate: row.valor_peso,
            applied_departure_fee: row.taxa_arrancada,
            total_price: row.preco_total,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_row_mapping_preserves_snapshot() {
        let now = Utc::now();
        let row = TripRow {
            id: 10,
            tenant_id: Uuid::nil(),
            data: NaiveDate::from_ymd_opt(2025, 11, 24).unwrap(),
            carga: Some("GR-114".to_string()),
            km_inicial: dec!(100),
            km_final: dec!(350),
            km_total: dec!(250),
            peso: dec!(1000),
            valor_km: dec!(2.50),
            valor_peso: dec!(0.10),
            taxa_arrancada: dec!(157.00),
            preco_total: dec!(882.00),
            created_at: now,
            updated_at: now,
        };

        let trip: Trip = row.into();
        assert_eq!(trip.cargo.as_deref(), Some("GR-114"));
        assert_eq!(trip.applied_distance_rate, dec!(2.50));
        assert!(trip.breakdown_is_consistent());
    }
}
