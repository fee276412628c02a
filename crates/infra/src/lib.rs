//! # Anteroom Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Database implementations (SQLite user repository and session store)
//! - Identity-provider gateway wrapping the common OAuth client
//! - Configuration loading (environment-first with file fallback)
//! - Error conversions from external crates into the domain taxonomy
//!
//! ## Architecture
//! - Implements traits defined in `anteroom-core`
//! - Depends on `anteroom-common`, `anteroom-domain`, and `anteroom-core`
//! - Contains all "impure" code (I/O, database, network)

pub mod config;
pub mod database;
pub mod errors;
pub mod identity;

// Re-export commonly used items
pub use config::*;
pub use database::*;
pub use errors::*;
pub use identity::*;
