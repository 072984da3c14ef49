//! Domain models for the freight backend
//!
//! This module contains all the core domain models used throughout the application.

pub mod fee_band;
pub mod rate;
pub mod trip;
pub mod user;

pub use fee_band::DepartureFeeBand;
pub use rate::{PriceRate, RateKind};
pub use trip::{DailyBreakdownPoint, PeriodTotals, Trip};
pub use user::{User, UserInfo, UserRole};
