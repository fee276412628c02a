//! # Anteroom API
//!
//! HTTP application layer - router, handlers, and main entry point.
//!
//! This crate contains:
//! - axum route handlers (sign-in flow and session-gated API)
//! - Application context (dependency injection)
//! - Session-cookie auth extractor and error → response mapping
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - Serves the browser frontend over HTTP

pub mod context;
pub mod error;
pub mod extract;
pub mod routes;
pub mod utils;

// Re-export for convenience
pub use context::*;
pub use error::ApiError;
pub use extract::CurrentUser;
