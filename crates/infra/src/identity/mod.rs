//! Identity-provider gateway
//!
//! Adapts the provider-facing OAuth client to the [`IdentityGateway`] port,
//! translating client errors into the domain taxonomy at the boundary.

use anteroom_common::auth::{OAuthClient, PKCEChallenge, ProviderConfig, TokenSet};
use anteroom_core::IdentityGateway;
use anteroom_domain::{ProviderSettings, Result};
use async_trait::async_trait;

use crate::errors::InfraError;

/// Gateway to the configured identity provider.
pub struct ProviderGateway {
    client: OAuthClient,
}

impl ProviderGateway {
    /// Build a gateway from the application's provider settings.
    pub fn new(settings: &ProviderSettings) -> Self {
        let config = ProviderConfig::new(
            settings.authority.clone(),
            settings.tenant_id.clone(),
            settings.client_id.clone(),
            settings.client_secret.clone(),
            settings.redirect_uri.clone(),
        );
        Self { client: OAuthClient::new(config) }
    }
}

#[async_trait]
impl IdentityGateway for ProviderGateway {
    fn authorization_url(&self, challenge: &PKCEChallenge) -> String {
        self.client.build_authorization_url(challenge)
    }

    async fn exchange_code(&self, code: &str, code_verifier: &str) -> Result<TokenSet> {
        self.client
            .exchange_code(code, code_verifier)
            .await
            .map_err(|e| InfraError::from(e).into())
    }
}
