//! # Relay Core
//!
//! Domain types, ports (repository and client traits) and the services that
//! implement token exchange, conversation resumption and activity processing.

pub mod domain;
pub mod repositories;
pub mod clients;
pub mod services;
pub mod error;

pub use domain::*;
pub use error::DomainError;
