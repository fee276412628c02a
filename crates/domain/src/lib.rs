//! # Anteroom Domain
//!
//! Business domain types and models for Anteroom.
//!
//! This crate contains:
//! - Domain data types (UserRecord, SessionData, PendingHandshake, ...)
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other Anteroom crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
