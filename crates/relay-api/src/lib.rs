//! # Relay API
//!
//! HTTP handlers, error mapping and the router.

pub mod handlers;
pub mod error;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
