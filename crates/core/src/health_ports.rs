//! Service health port.
//!
//! Provides the connectivity checks behind the public health endpoint:
//! database reachability and session-table accessibility.
//!
//! # Example
//!
//! ```no_run
//! use anteroom_core::HealthPort;
//!
//! async fn is_ready(health: &impl HealthPort) -> bool {
//!     health.check_database().await.is_ok() && health.check_sessions().await.is_ok()
//! }
//! ```

use anteroom_domain::Result;
use async_trait::async_trait;

/// Port for service health checks.
///
/// Both checks execute trivial queries; a failure means the backing store
/// is unreachable or the schema is missing, and the service should report
/// itself unhealthy.
#[async_trait]
pub trait HealthPort: Send + Sync {
    /// Verify the database answers a trivial query.
    async fn check_database(&self) -> Result<()>;

    /// Verify the session table is readable.
    async fn check_sessions(&self) -> Result<()>;
}
