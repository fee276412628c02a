//! User account service - core business logic
//!
//! Reconciles provider identities into local user records and serves the
//! profile and administration operations built on top of them.

use std::sync::Arc;

use anteroom_common::auth::ClaimSet;
use anteroom_domain::{
    AnteroomError, ProfileUpdate, Result, UserRecord, UserRole, UserSummary,
};
use tracing::{info, warn};

use super::ports::UserRepository;

/// Outcome of reconciling a provider identity against the local store
#[derive(Debug, Clone)]
pub struct ReconciledUser {
    /// The up-to-date local record for this identity
    pub user: UserRecord,

    /// True when this sign-in created the record
    pub is_new_user: bool,
}

/// User account service
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    /// Create a new user service
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Reconcile a decoded claim set into a local user record
    ///
    /// An existing record (matched on subject id) gets its claims snapshot
    /// replaced and its last-login refreshed. A first-time subject gets a
    /// new record with defaulted names and the `user` role. When two
    /// callbacks race to create the same subject, the loser retries the
    /// lookup once and proceeds as an existing-user sign-in.
    pub async fn reconcile(&self, claims: &ClaimSet) -> Result<ReconciledUser> {
        if let Some(user) = self.repository.find_by_subject(&claims.subject).await? {
            let user = self.refresh_existing(user, claims).await?;
            return Ok(ReconciledUser { user, is_new_user: false });
        }

        let candidate = Self::record_from_claims(claims);
        match self.repository.create(&candidate).await {
            Ok(()) => {
                info!(user_id = %candidate.id, email = %candidate.email, "User record created");
                Ok(ReconciledUser { user: candidate, is_new_user: true })
            }
            Err(AnteroomError::ReconciliationConflict(_)) => {
                // Concurrent first sign-in for this subject; the other
                // writer's row wins.
                warn!(subject_id = %claims.subject, "Create raced an existing record, retrying lookup");
                let user = self
                    .repository
                    .find_by_subject(&claims.subject)
                    .await?
                    .ok_or_else(|| {
                        AnteroomError::Database(format!(
                            "user vanished after conflict for subject {}",
                            claims.subject
                        ))
                    })?;
                let user = self.refresh_existing(user, claims).await?;
                Ok(ReconciledUser { user, is_new_user: false })
            }
            Err(e) => Err(e),
        }
    }

    /// Get a user by local id
    pub async fn get_user(&self, id: &str) -> Result<Option<UserRecord>> {
        self.repository.find_by_id(id).await
    }

    /// Apply a profile edit
    ///
    /// # Errors
    /// `InvalidInput` when no field was provided, `NotFound` when the user
    /// does not exist.
    pub async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<UserRecord> {
        if update.is_empty() {
            return Err(AnteroomError::InvalidInput(
                "At least one field must be provided".to_string(),
            ));
        }

        let updated = self
            .repository
            .update_profile(id, update)
            .await?
            .ok_or_else(|| AnteroomError::NotFound(format!("user {id}")))?;

        info!(user_id = %id, "Profile updated");
        Ok(updated)
    }

    /// Deactivate a user account
    ///
    /// The record stays in place with `is_active` off; existing sessions
    /// lose authorization on their next permission check.
    pub async fn deactivate(&self, id: &str) -> Result<()> {
        let affected = self.repository.deactivate(id).await?;
        if !affected {
            return Err(AnteroomError::NotFound(format!("user {id}")));
        }

        warn!(user_id = %id, "User account deactivated");
        Ok(())
    }

    /// List all active users as frontend-safe summaries, newest first
    pub async fn list_active_users(&self) -> Result<Vec<UserSummary>> {
        let users = self.repository.list_active().await?;
        Ok(users.iter().map(UserRecord::summary).collect())
    }

    /// Role-based permission check for a stored user
    ///
    /// Unknown users and repository failures report as unauthorized rather
    /// than erroring, since the caller is deciding whether to deny.
    pub async fn has_permission(&self, id: &str, permission: &str) -> bool {
        match self.repository.find_by_id(id).await {
            Ok(Some(user)) => user.has_permission(permission),
            Ok(None) => false,
            Err(e) => {
                warn!(user_id = %id, error = %e, "Permission check failed, denying");
                false
            }
        }
    }

    /// Replace the claims snapshot and bump login bookkeeping on the local
    /// copy as well, so callers see the post-sign-in state without a
    /// re-fetch.
    async fn refresh_existing(&self, mut user: UserRecord, claims: &ClaimSet) -> Result<UserRecord> {
        let now = chrono::Utc::now().timestamp_millis();

        self.repository.update_claims(&user.id, &claims.raw).await?;
        self.repository.update_last_login(&user.id, now).await?;

        user.claims = claims.raw.clone();
        user.last_login_at = Some(now);
        user.updated_at = now;
        Ok(user)
    }

    /// Build a fresh record for a first-time subject
    ///
    /// Names fall back from the explicit claims to a split of the display
    /// name, then to "Unknown"/"User". Provider emails arrive verified.
    fn record_from_claims(claims: &ClaimSet) -> UserRecord {
        let now = chrono::Utc::now().timestamp_millis();

        let first_name = claims
            .given_name
            .clone()
            .or_else(|| Self::first_name_from_display(claims.display_name.as_deref()))
            .unwrap_or_else(|| "Unknown".to_string());
        let last_name = claims
            .family_name
            .clone()
            .or_else(|| Self::last_name_from_display(claims.display_name.as_deref()))
            .unwrap_or_else(|| "User".to_string());

        UserRecord {
            id: uuid::Uuid::new_v4().to_string(),
            subject_id: claims.subject.clone(),
            email: claims.email.clone(),
            first_name,
            last_name,
            role: UserRole::User,
            is_active: true,
            email_verified: true,
            claims: claims.raw.clone(),
            created_at: now,
            updated_at: now,
            last_login_at: Some(now),
        }
    }

    fn first_name_from_display(display: Option<&str>) -> Option<String> {
        display.and_then(|name| name.split_whitespace().next()).map(str::to_string)
    }

    fn last_name_from_display(display: Option<&str>) -> Option<String> {
        let name = display?;
        let mut parts = name.split_whitespace();
        parts.next()?;
        let rest = parts.collect::<Vec<_>>().join(" ");
        if rest.is_empty() {
            None
        } else {
            Some(rest)
        }
    }
}
