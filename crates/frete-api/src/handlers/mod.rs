//! HTTP handlers
//!
//! Route handlers grouped by surface. Each module exposes a
//! `configure` function that mounts its routes on a service config.

pub mod auth;
pub mod dashboard;
pub mod fee_bands;
pub mod rates;
pub mod reports;
pub mod trips;
pub mod users;

pub use auth::configure as configure_auth;
pub use dashboard::configure as configure_dashboard;
pub use fee_bands::configure as configure_fee_bands;
pub use rates::configure as configure_rates;
pub use reports::configure as configure_reports;
pub use trips::configure as configure_trips;
pub use users::configure as configure_users;
