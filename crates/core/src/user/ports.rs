//! Port interfaces for user account management
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations for user account operations.

use anteroom_domain::{ProfileUpdate, Result, UserRecord};
use async_trait::async_trait;

/// Trait for user account persistence and retrieval
///
/// `subject_id` is the stable provider identity; `id` is the local primary
/// key. Accounts are never physically deleted, only deactivated.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by local id
    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>>;

    /// Get a user by provider subject id
    async fn find_by_subject(&self, subject_id: &str) -> Result<Option<UserRecord>>;

    /// Insert a new user record
    ///
    /// Returns `ReconciliationConflict` when another record already holds
    /// the same subject id, so callers can fall back to the existing row.
    async fn create(&self, user: &UserRecord) -> Result<()>;

    /// Replace the stored claims snapshot for a user
    async fn update_claims(&self, id: &str, claims: &serde_json::Value) -> Result<()>;

    /// Record a successful sign-in at the given unix-ms timestamp
    async fn update_last_login(&self, id: &str, at: i64) -> Result<()>;

    /// Apply a profile edit, returning the updated record
    ///
    /// Returns `Ok(None)` when no user with that id exists.
    async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<Option<UserRecord>>;

    /// Flip the account's active flag off
    ///
    /// Returns whether a row was affected.
    async fn deactivate(&self, id: &str) -> Result<bool>;

    /// List all active users, newest first
    async fn list_active(&self) -> Result<Vec<UserRecord>>;
}
