//! # Anteroom Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The sign-in flow (login initiation, callback validation, logout)
//! - User reconciliation and account services
//! - Port/adapter interfaces (traits)
//!
//! ## Architecture Principles
//! - Only depends on `anteroom-common` and `anteroom-domain`
//! - No database, HTTP server, or cookie code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod auth;
pub mod user;

// Infrastructure ports
pub mod health_ports;

// Re-export specific items to avoid ambiguity
pub use auth::ports::{IdentityGateway, SessionStore};
pub use auth::{AuthService, CallbackParams};
pub use health_ports::HealthPort;
pub use user::ports::UserRepository;
pub use user::{ReconciledUser, UserService};
