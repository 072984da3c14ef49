//! Freight backend core library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the freight management backend. It includes:
//!
//! - Domain models (PriceRate, DepartureFeeBand, Trip, User)
//! - The pure trip pricing engine
//! - Common traits for repositories and services
//! - Unified error handling with HTTP response mapping
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod pricing;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
