//! Data transfer objects for the HTTP API

pub mod auth;
pub mod common;
pub mod fee_band;
pub mod rate;
pub mod report;
pub mod trip;
pub mod user;

pub use common::{ApiResponse, PaginationParams};
