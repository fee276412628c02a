//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Anteroom
///
/// The handshake-phase variants (`CsrfMismatch` through `SessionWriteFailed`)
/// are produced during login/callback processing and are always collapsed to
/// a coarse redirect code at the HTTP boundary; the full variant is only ever
/// logged server-side.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum AnteroomError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("State mismatch: {0}")]
    CsrfMismatch(String),

    #[error("Missing authorization code: {0}")]
    MissingAuthorizationCode(String),

    #[error("Missing PKCE verifier: {0}")]
    MissingPkceVerifier(String),

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Invalid identity token: {0}")]
    InvalidToken(String),

    #[error("Reconciliation conflict: {0}")]
    ReconciliationConflict(String),

    #[error("Session write failed: {0}")]
    SessionWriteFailed(String),

    #[error("Session destroy failed: {0}")]
    SessionDestroyFailed(String),

    #[error("Authentication required: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Anteroom operations
pub type Result<T> = std::result::Result<T, AnteroomError>;
