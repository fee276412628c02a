//! User account types
//!
//! User records created from identity-provider callbacks and kept in the
//! local database. The provider subject id (`subject_id`) is the stable join
//! key between provider identity and local identity.

use serde::{Deserialize, Serialize};

/// Role assigned to a user account
///
/// Stored as lowercase text; `User` is the default for newly registered
/// accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    /// Text form used in the database and in role checks
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        Self::User
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = crate::errors::AnteroomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(crate::errors::AnteroomError::InvalidInput(format!(
                "Unknown role: {other}"
            ))),
        }
    }
}

/// User record stored in the local database
///
/// Created once per distinct provider subject; the claims snapshot and
/// `last_login_at` are refreshed on every successful sign-in. Rows are never
/// deleted, deactivation flips `is_active`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    /// Subject identifier issued by the identity provider
    pub subject_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub email_verified: bool,
    /// Last claim set received for this user, replaced wholesale on sign-in
    pub claims: serde_json::Value,
    pub created_at: i64,
    pub updated_at: i64,
    pub last_login_at: Option<i64>,
}

impl UserRecord {
    /// Role-based permission check
    ///
    /// Inactive accounts hold no permissions. Admins hold every permission;
    /// regular users can read and update their own profile.
    pub fn has_permission(&self, permission: &str) -> bool {
        if !self.is_active {
            return false;
        }
        match self.role {
            UserRole::Admin => true,
            UserRole::User => matches!(permission, "profile:read" | "profile:update"),
        }
    }

    /// Projection safe to return to the frontend (no claims snapshot)
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            role: self.role,
            is_active: self.is_active,
            email_verified: self.email_verified,
            last_login: self.last_login_at,
            created_at: self.created_at,
        }
    }
}

/// Safe user projection returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub is_active: bool,
    pub email_verified: bool,
    pub last_login: Option<i64>,
    pub created_at: i64,
}

/// Partial profile update, all fields optional
///
/// Callers must supply at least one field; `is_empty` backs that validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl ProfileUpdate {
    /// True when no field was provided
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}
