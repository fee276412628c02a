//! Session state types
//!
//! The blob serialized into a session-store row. A session moves through
//! three shapes: empty (fresh cookie), pending (handshake in flight), and
//! authenticated (principal present). The principal is only ever written by
//! the sign-in path after reconciliation succeeds.

use serde::{Deserialize, Serialize};

use super::user::{UserRecord, UserRole};

/// One-time secrets protecting an in-flight sign-in
///
/// Written at login initiation, consumed at callback. A new login attempt
/// overwrites any previous handshake; only the most recent attempt is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingHandshake {
    pub code_verifier: String,
    pub csrf_state: String,
}

/// Denormalized projection of the signed-in user
///
/// A session-lifetime copy of the user row; profile edits refresh it so the
/// two do not drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
    pub subject_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
}

impl Principal {
    /// Project a user record into its session-resident form
    pub fn from_user(user: &UserRecord) -> Self {
        Self {
            user_id: user.id.clone(),
            subject_id: user.subject_id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role,
        }
    }
}

/// Everything stored under one session id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handshake: Option<PendingHandshake>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
}

impl SessionData {
    /// A session is authenticated exactly when a principal is present
    pub const fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }
}
