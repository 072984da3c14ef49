//! Business logic services for the freight backend
//!
//! This crate contains the services that sit between the HTTP handlers
//! and the repositories.
//!
//! # Architecture
//!
//! Services are designed to be composable and testable:
//! - Each service owns its dependencies (repositories, cache, etc.)
//! - Services are wrapped in Arc for safe sharing across async tasks
//! - All operations are instrumented with tracing
//! - Comprehensive error handling with AppError
//!
//! # Services
//!
//! - `PricingServiceImpl` - active pricing configuration assembly with
//!   Redis caching, and trip cost quoting through the pure engine

pub mod pricing;

pub use pricing::PricingServiceImpl;

/// Business logic constants
pub mod constants {
    /// Cached pricing configuration TTL in seconds (5 minutes)
    ///
    /// The quote endpoint is hit on every trip form keystroke; a short
    /// TTL keeps rate edits visible quickly while absorbing the bursts.
    pub const PRICING_CACHE_TTL: u64 = 300;
}
