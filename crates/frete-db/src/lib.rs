//! Freight backend database layer
//!
//! This crate provides PostgreSQL database access and repository implementations
//! for the freight backend. It includes:
//!
//! - Connection pool management with sqlx
//! - Repository implementations for rates, fee bands, trips, and users
//! - The transactional price-activation sequence that keeps at most one
//!   rate of each kind active per tenant
//! - Fee band overlap validation at write time
//!
//! Every query on tenant-owned data carries a `tenant_id` predicate; the
//! reference DDL lives in `schema.sql`.

pub mod pool;
pub mod repositories;

pub use pool::create_pool;
pub use repositories::*;

// Re-export commonly used types
pub use frete_core::{AppError, AppResult};
pub use sqlx::{PgPool, Postgres, Transaction};
