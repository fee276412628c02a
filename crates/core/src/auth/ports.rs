//! Port interfaces for the sign-in flow
//!
//! These traits define the boundaries between core sign-in logic and
//! infrastructure implementations: the identity provider gateway and the
//! server-side session store.

use anteroom_common::auth::{PKCEChallenge, TokenSet};
use anteroom_domain::{Result, SessionData};
use async_trait::async_trait;

/// Port for the OAuth identity provider
///
/// Wraps authorization URL construction and the authorization-code
/// exchange. Implementations must never log the client secret, the
/// authorization code, or the PKCE verifier.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Build the browser redirect URL for a login attempt
    fn authorization_url(&self, challenge: &PKCEChallenge) -> String;

    /// Exchange an authorization code and PKCE verifier for tokens
    ///
    /// Codes are single-use; implementations must not retry a failed
    /// exchange.
    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<TokenSet>;
}

/// Port for server-side session persistence
///
/// Sessions are keyed by the opaque id carried in the browser cookie. A
/// session holds at most one pending handshake and at most one
/// authenticated principal.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load session data by id
    ///
    /// Returns `Ok(None)` for unknown or expired sessions.
    async fn load(&self, session_id: &str) -> Result<Option<SessionData>>;

    /// Persist session data under the given id, refreshing its TTL
    async fn save(&self, session_id: &str, data: &SessionData) -> Result<()>;

    /// Destroy the session, removing all server-side state for it
    ///
    /// Destroying an unknown session is not an error.
    async fn destroy(&self, session_id: &str) -> Result<()>;
}
