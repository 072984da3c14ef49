//! Repository implementations
//!
//! PostgreSQL-backed implementations of the repository traits defined
//! in frete-core.

pub mod fee_band_repo;
pub mod rate_repo;
pub mod trip_repo;
pub mod user_repo;

pub use fee_band_repo::PgFeeBandRepository;
pub use rate_repo::PgRateRepository;
pub use trip_repo::PgTripRepository;
pub use user_repo::PgUserRepository;
