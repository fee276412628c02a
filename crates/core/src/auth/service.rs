//! Sign-in flow orchestration - core business logic
//!
//! Drives the session through its three shapes: login initiation stores a
//! fresh handshake, the callback trades it for an authenticated principal,
//! and logout destroys the session. Every step goes through the
//! [`IdentityGateway`] and [`SessionStore`] ports.

use std::sync::Arc;

use anteroom_common::auth::{decode_id_token, PKCEChallenge};
use anteroom_domain::{AnteroomError, PendingHandshake, Principal, Result, UserRecord};
use tracing::info;

use super::ports::{IdentityGateway, SessionStore};
use crate::user::UserService;

/// Raw query parameters from the provider redirect, before validation
#[derive(Debug, Clone, Default)]
pub struct CallbackParams {
    /// `code` query parameter, when the provider sent one
    pub code: Option<String>,

    /// `state` query parameter, when the provider sent one
    pub state: Option<String>,
}

/// Sign-in flow service
pub struct AuthService {
    identity: Arc<dyn IdentityGateway>,
    sessions: Arc<dyn SessionStore>,
    users: Arc<UserService>,
}

impl AuthService {
    /// Create a new sign-in service
    pub fn new(
        identity: Arc<dyn IdentityGateway>,
        sessions: Arc<dyn SessionStore>,
        users: Arc<UserService>,
    ) -> Self {
        Self { identity, sessions, users }
    }

    /// Start a login attempt for the given session
    ///
    /// Generates a fresh PKCE challenge and CSRF state, stores them as the
    /// session's pending handshake, and returns the provider authorization
    /// URL to redirect the browser to. Any handshake from an earlier
    /// attempt is overwritten; only the most recent attempt stays valid.
    ///
    /// # Errors
    /// Returns `SessionWriteFailed` when the handshake cannot be persisted,
    /// `Internal` when challenge generation fails.
    pub async fn begin_login(&self, session_id: &str) -> Result<String> {
        let challenge = PKCEChallenge::generate().map_err(AnteroomError::Internal)?;

        let mut session = self.sessions.load(session_id).await?.unwrap_or_default();
        session.handshake = Some(PendingHandshake {
            code_verifier: challenge.code_verifier.clone(),
            csrf_state: challenge.state.clone(),
        });
        self.sessions
            .save(session_id, &session)
            .await
            .map_err(|e| AnteroomError::SessionWriteFailed(e.to_string()))?;

        info!(session_id = %session_id, "Login initiated, redirecting to provider");

        Ok(self.identity.authorization_url(&challenge))
    }

    /// Complete a login attempt from the provider callback
    ///
    /// Validation order, each a hard failure:
    /// 1. a pending handshake exists and `state` matches its CSRF token
    /// 2. `code` is present
    /// 3. the stored PKCE verifier is non-empty
    ///
    /// On success the code is exchanged, claims are decoded, the user is
    /// reconciled, and the principal is written into the session. The
    /// handshake is deleted only after the principal write succeeds, in a
    /// second store write.
    ///
    /// # Errors
    /// Returns the specific handshake-phase variant for each failed step.
    /// Callers must collapse these to a coarse redirect code; the variant
    /// detail is for server-side logs only.
    pub async fn complete_login(
        &self,
        session_id: &str,
        params: &CallbackParams,
    ) -> Result<Principal> {
        let mut session = self.sessions.load(session_id).await?.unwrap_or_default();

        let handshake = session
            .handshake
            .clone()
            .ok_or_else(|| AnteroomError::CsrfMismatch("no pending login for session".into()))?;

        match &params.state {
            Some(state) if *state == handshake.csrf_state => {}
            Some(_) => {
                return Err(AnteroomError::CsrfMismatch(
                    "state does not match stored token".into(),
                ));
            }
            None => return Err(AnteroomError::CsrfMismatch("state parameter absent".into())),
        }

        let code = params
            .code
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| AnteroomError::MissingAuthorizationCode("code parameter absent".into()))?;

        if handshake.code_verifier.is_empty() {
            return Err(AnteroomError::MissingPkceVerifier(
                "no verifier stored for session".into(),
            ));
        }

        let tokens = self.identity.exchange_code(code, &handshake.code_verifier).await?;

        let claims = decode_id_token(&tokens.id_token)
            .map_err(|e| AnteroomError::InvalidToken(e.to_string()))?;

        let outcome = self.users.reconcile(&claims).await?;

        // Materialize the principal first; the handshake is consumed only
        // once the session is authenticated.
        let principal = Principal::from_user(&outcome.user);
        session.principal = Some(principal.clone());
        self.sessions
            .save(session_id, &session)
            .await
            .map_err(|e| AnteroomError::SessionWriteFailed(e.to_string()))?;

        session.handshake = None;
        self.sessions
            .save(session_id, &session)
            .await
            .map_err(|e| AnteroomError::SessionWriteFailed(e.to_string()))?;

        if outcome.is_new_user {
            info!(user_id = %principal.user_id, email = %principal.email, "New user registered and signed in");
        } else {
            info!(user_id = %principal.user_id, email = %principal.email, "Existing user signed in");
        }

        Ok(principal)
    }

    /// Refresh the session's principal from an updated user record
    ///
    /// Keeps the denormalized session copy in step with the user row after
    /// profile edits. A session that is not authenticated is left alone.
    pub async fn refresh_principal(&self, session_id: &str, user: &UserRecord) -> Result<()> {
        let Some(mut session) = self.sessions.load(session_id).await? else {
            return Ok(());
        };
        if session.principal.is_none() {
            return Ok(());
        }

        session.principal = Some(Principal::from_user(user));
        self.sessions
            .save(session_id, &session)
            .await
            .map_err(|e| AnteroomError::SessionWriteFailed(e.to_string()))
    }

    /// Destroy the session, signing the user out
    ///
    /// # Errors
    /// Returns `SessionDestroyFailed` when the store cannot remove the
    /// session; callers surface this as a server error since the cookie
    /// alone must not outlive the server-side state.
    pub async fn logout(&self, session_id: &str) -> Result<()> {
        self.sessions
            .destroy(session_id)
            .await
            .map_err(|e| AnteroomError::SessionDestroyFailed(e.to_string()))?;

        info!(session_id = %session_id, "Session destroyed");
        Ok(())
    }

    /// Load the authenticated principal for a session, if any
    ///
    /// Used by request authorization; an expired or unknown session simply
    /// yields `None`.
    pub async fn current_principal(&self, session_id: &str) -> Result<Option<Principal>> {
        let session = self.sessions.load(session_id).await?;
        Ok(session.and_then(|s| s.principal))
    }
}
