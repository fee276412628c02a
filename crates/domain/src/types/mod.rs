//! Domain types and models

pub mod config;
pub mod session;
pub mod user;

// Re-export the commonly used types for convenience
pub use config::{
    AppConfig, DatabaseConfig, ProviderSettings, ServerConfig, SessionConfig,
    MIN_SESSION_SECRET_LEN,
};
pub use session::{PendingHandshake, Principal, SessionData};
pub use user::{ProfileUpdate, UserRecord, UserRole, UserSummary};
