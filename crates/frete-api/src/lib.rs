//! API layer for the freight backend
//!
//! HTTP API handlers for authentication, pricing administration, trip
//! recording and quoting, reports, and user management.

#![forbid(unsafe_code)]

pub mod dto;
pub mod handlers;

// Re-export DTOs (common types)
pub use dto::{ApiResponse, PaginationParams};

// Re-export handler configuration functions
pub use handlers::{
    configure_auth, configure_dashboard, configure_fee_bands, configure_rates, configure_reports,
    configure_trips, configure_users,
};
