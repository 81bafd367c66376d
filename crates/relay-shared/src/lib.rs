//! # Relay Shared
//!
//! Configuration, telemetry and error types shared by every relay crate.

pub mod constants;
pub mod telemetry;
pub mod config;
pub mod error;

pub use config::AppConfig;
pub use error::AppError;
