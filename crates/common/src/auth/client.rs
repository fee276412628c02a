//! OAuth 2.0 client implementation with PKCE support
//!
//! Handles browser-based authorization flow with OAuth providers, including:
//! - Browser authorization URL building
//! - Authorization code exchange
//!
//! The client is stateless. The PKCE verifier and `state` token for an
//! in-flight login live in the caller's session, so a single client instance
//! can serve concurrent logins.

use reqwest::Client;

use super::pkce::PKCEChallenge;
use super::types::{OAuthError, ProviderConfig, TokenResponse, TokenSet};

/// Error type for OAuth client operations
#[derive(Debug)]
pub enum OAuthClientError {
    /// HTTP request failed
    RequestFailed(reqwest::Error),

    /// OAuth server returned an error
    OAuthError(OAuthError),

    /// Failed to parse response
    ParseError(String),
}

impl std::fmt::Display for OAuthClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestFailed(e) => write!(f, "HTTP request failed: {e}"),
            Self::OAuthError(e) => write!(f, "OAuth error: {e}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for OAuthClientError {}

impl From<reqwest::Error> for OAuthClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed(err)
    }
}

/// OAuth 2.0 confidential client with PKCE support
///
/// Implements RFC 6749 (OAuth 2.0) and RFC 7636 (PKCE) against tenant-style
/// token endpoints.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: ProviderConfig,
    client: Client,
}

impl OAuthClient {
    /// Create a new OAuth client with the given configuration
    ///
    /// # Arguments
    /// * `config` - Provider configuration (authority, client_id, redirect_uri, etc.)
    ///
    /// # Examples
    /// ```
    /// use anteroom_common::auth::{OAuthClient, ProviderConfig};
    ///
    /// let config = ProviderConfig::new(
    ///     "contoso.ciamlogin.com".to_string(),
    ///     "tenant-id".to_string(),
    ///     "client_id".to_string(),
    ///     "client_secret".to_string(),
    ///     "http://localhost:3001/auth/callback".to_string(),
    /// );
    /// let client = OAuthClient::new(config);
    /// ```
    #[must_use]
    pub fn new(config: ProviderConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { config, client }
    }

    /// Build the authorization URL for browser-based login
    ///
    /// The caller redirects the browser to this URL; the provider redirects
    /// back to `redirect_uri` after authentication. The challenge's verifier
    /// and state must be stored by the caller for callback validation.
    ///
    /// # Examples
    /// ```
    /// # use anteroom_common::auth::pkce::PKCEChallenge;
    /// # use anteroom_common::auth::{OAuthClient, ProviderConfig};
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let config = ProviderConfig::new("contoso.ciamlogin.com".to_string(), "tenant".to_string(), "client".to_string(), "secret".to_string(), "http://localhost".to_string());
    /// let client = OAuthClient::new(config);
    /// let challenge = PKCEChallenge::generate()?;
    /// let url = client.build_authorization_url(&challenge);
    /// // Store challenge.code_verifier and challenge.state, then redirect
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn build_authorization_url(&self, challenge: &PKCEChallenge) -> String {
        let params = vec![
            ("response_type".to_string(), "code".to_string()),
            ("client_id".to_string(), self.config.client_id.clone()),
            ("redirect_uri".to_string(), self.config.redirect_uri.clone()),
            ("scope".to_string(), self.config.scopes.clone()),
            ("state".to_string(), challenge.state.clone()),
            ("code_challenge".to_string(), challenge.code_challenge.clone()),
            ("code_challenge_method".to_string(), challenge.challenge_method().to_string()),
        ];

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.config.authorization_url(), query_string)
    }

    /// Exchange authorization code for tokens
    ///
    /// Called after the user completes browser authorization and is
    /// redirected back, and after the caller has validated the `state`
    /// parameter against its stored copy.
    ///
    /// Authorization codes are single-use, so a failed exchange is never
    /// retried.
    ///
    /// # Arguments
    /// * `code` - Authorization code from redirect callback
    /// * `code_verifier` - PKCE verifier stored at login initiation
    ///
    /// # Returns
    /// `TokenSet` containing id_token, access_token, and refresh_token (if
    /// issued)
    ///
    /// # Errors
    /// Returns error if:
    /// - Token exchange fails
    /// - Response parsing fails
    /// - The response omits the id_token
    pub async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenSet, OAuthClientError> {
        let request_body = vec![
            ("grant_type".to_string(), "authorization_code".to_string()),
            ("client_id".to_string(), self.config.client_id.clone()),
            ("client_secret".to_string(), self.config.client_secret.clone()),
            ("code".to_string(), code.to_string()),
            ("redirect_uri".to_string(), self.config.redirect_uri.clone()),
            ("code_verifier".to_string(), code_verifier.to_string()),
        ];

        let response = self.client.post(self.config.token_url()).form(&request_body).send().await?;

        // Handle OAuth errors
        if !response.status().is_success() {
            let error: OAuthError =
                response.json().await.map_err(|e| OAuthClientError::ParseError(e.to_string()))?;
            return Err(OAuthClientError::OAuthError(error));
        }

        // Parse token response
        let token_response: TokenResponse =
            response.json().await.map_err(|e| OAuthClientError::ParseError(e.to_string()))?;

        TokenSet::try_from(token_response).map_err(OAuthClientError::ParseError)
    }

    /// Get the configured redirect URI
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.config.redirect_uri
    }

    /// Get a reference to the provider configuration
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}
