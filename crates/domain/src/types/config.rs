//! Application configuration
//!
//! Loaded at startup from environment variables (with a config-file
//! fallback, see the infra loader). Provider settings are validated before
//! the server binds; a missing value is fatal, never a per-request error.

use serde::{Deserialize, Serialize};

use crate::errors::{AnteroomError, Result};

/// Minimum length accepted for the session cookie secret
pub const MIN_SESSION_SECRET_LEN: usize = 32;

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub provider: ProviderSettings,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    /// Base URL of the browser application (redirect target after sign-in)
    pub frontend_url: String,
    /// Deployment environment name; "production" turns on the Secure cookie
    pub environment: String,
}

/// Identity-provider settings
///
/// `authority` is the provider host (for example `contoso.ciamlogin.com`);
/// endpoint URLs are `https://{authority}/{tenant_id}/oauth2/v2.0/...`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub authority: String,
    pub tenant_id: String,
    pub client_id: String,
    #[serde(skip_serializing)]
    pub client_secret: String,
    pub redirect_uri: String,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// SQLite settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

/// Session store and cookie settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(skip_serializing)]
    pub secret: String,
    pub cookie_name: String,
    pub ttl_hours: u64,
}

impl AppConfig {
    /// True when running with production hardening (Secure cookies)
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Session lifetime in milliseconds
    pub const fn session_ttl_ms(&self) -> i64 {
        (self.session.ttl_hours * 60 * 60 * 1000) as i64
    }

    /// Validate that every startup-required value is present and usable
    ///
    /// # Errors
    /// Returns `AnteroomError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("provider.authority", &self.provider.authority),
            ("provider.tenant_id", &self.provider.tenant_id),
            ("provider.client_id", &self.provider.client_id),
            ("provider.client_secret", &self.provider.client_secret),
            ("provider.redirect_uri", &self.provider.redirect_uri),
            ("frontend_url", &self.frontend_url),
            ("database.path", &self.database.path),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AnteroomError::Config(format!("Missing required setting: {name}")));
            }
        }
        if self.session.secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(AnteroomError::Config(format!(
                "session.secret must be at least {MIN_SESSION_SECRET_LEN} characters"
            )));
        }
        if self.session.cookie_name.trim().is_empty() {
            return Err(AnteroomError::Config("Missing required setting: session.cookie_name".to_string()));
        }
        if self.database.pool_size == 0 {
            return Err(AnteroomError::Config("database.pool_size must be at least 1".to_string()));
        }
        Ok(())
    }
}
