//! OAuth 2.0 types and structures
//!
//! Defines the data structures for the provider handshake: static provider
//! configuration, the raw token-endpoint response, and the validated token
//! set handed to the claims extractor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scopes requested for browser sign-in
pub const SIGN_IN_SCOPES: &str = "openid profile email";

/// Identity-provider configuration for the authorization-code flow
///
/// Endpoint URLs follow the tenant layout
/// `https://{authority}/{tenant_id}/oauth2/v2.0/{authorize|token}`. A
/// scheme-qualified authority (`http://...`) is honored as-is so tests can
/// point the client at a local mock server.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Provider host, e.g. "contoso.ciamlogin.com"
    pub authority: String,

    /// Tenant identifier segment of the endpoint URLs
    pub tenant_id: String,

    /// OAuth client ID
    pub client_id: String,

    /// OAuth client secret (confidential client)
    pub client_secret: String,

    /// Redirect URI registered with the provider
    pub redirect_uri: String,

    /// Scopes to request (space-separated)
    pub scopes: String,
}

impl ProviderConfig {
    /// Create a new provider configuration with the default sign-in scopes
    #[must_use]
    pub fn new(
        authority: String,
        tenant_id: String,
        client_id: String,
        client_secret: String,
        redirect_uri: String,
    ) -> Self {
        Self {
            authority,
            tenant_id,
            client_id,
            client_secret,
            redirect_uri,
            scopes: SIGN_IN_SCOPES.to_string(),
        }
    }

    fn base_url(&self) -> String {
        if self.authority.contains("://") {
            format!("{}/{}", self.authority.trim_end_matches('/'), self.tenant_id)
        } else {
            format!("https://{}/{}", self.authority, self.tenant_id)
        }
    }

    /// Get the authorization endpoint URL
    #[must_use]
    pub fn authorization_url(&self) -> String {
        format!("{}/oauth2/v2.0/authorize", self.base_url())
    }

    /// Get the token endpoint URL
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/oauth2/v2.0/token", self.base_url())
    }
}

/// OAuth token response from the authorization server
///
/// Standard OAuth 2.0 token response format (RFC 6749). Deserializes
/// responses from the tenant token endpoint; `id_token` is optional on the
/// wire but required by the sign-in flow, see [`TokenSet::try_from`].
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    pub token_type: String,
    pub expires_in: i64,
    pub scope: Option<String>,
}

/// Tokens issued by a successful authorization-code exchange
///
/// Unlike the raw wire response, the identity token is mandatory here: the
/// sign-in flow exists to obtain it, and an exchange that omits it is
/// treated as malformed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// ID token (JWT) containing the user claims (OpenID Connect)
    pub id_token: String,

    /// Access token for downstream API calls
    pub access_token: String,

    /// Refresh token, when the provider issues one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Token type (always "Bearer" for OAuth 2.0)
    pub token_type: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// Granted scopes (space-separated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TryFrom<TokenResponse> for TokenSet {
    type Error = String;

    fn try_from(response: TokenResponse) -> Result<Self, Self::Error> {
        let id_token = response
            .id_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| "token response did not include an id_token".to_string())?;

        Ok(Self {
            id_token,
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            token_type: response.token_type,
            expires_in: response.expires_in,
            scope: response.scope,
        })
    }
}

/// OAuth error response from the authorization server
///
/// Standard OAuth 2.0 error response format (RFC 6749 §5.2).
#[derive(Debug, Deserialize)]
pub struct OAuthError {
    pub error: String,
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(desc) => write!(f, "{}: {}", self.error, desc),
            None => write!(f, "{}", self.error),
        }
    }
}

impl std::error::Error for OAuthError {}
