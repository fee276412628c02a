//! Core OAuth 2.0 + PKCE Infrastructure
//!
//! This module provides the primitives for the browser sign-in flow:
//! PKCE/CSRF generation, authorization URL construction, authorization code
//! exchange, and identity token claim extraction. Session orchestration and
//! user reconciliation live in the service layer; everything here is either
//! pure or a single outbound HTTP call.
//!
//! # Features
//!
//! - **PKCE Flow**: RFC 7636 compliant Proof Key for Code Exchange
//! - **CSRF Protection**: Independent random `state` token per login attempt
//! - **Confidential Client**: Form-encoded code exchange with client secret
//! - **Claims Extraction**: Payload decode with email fallback derivation
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   OAuthClient    │  Authorization URL + code exchange (HTTP)
//! └────────┬─────────┘
//!          │
//!          ├──► PKCE utilities    (verifier/challenge/state generation)
//!          ├──► ProviderConfig    (tenant endpoint layout)
//!          └──► claims            (id_token payload decode)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use anteroom_common::auth::pkce::PKCEChallenge;
//! use anteroom_common::auth::{decode_id_token, OAuthClient, ProviderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProviderConfig::new(
//!         "contoso.ciamlogin.com".to_string(),
//!         "tenant-id".to_string(),
//!         "client_id".to_string(),
//!         "client_secret".to_string(),
//!         "http://localhost:3001/auth/callback".to_string(),
//!     );
//!     let client = OAuthClient::new(config);
//!
//!     // Start login: keep verifier + state, send the browser to the URL
//!     let challenge = PKCEChallenge::generate()?;
//!     let auth_url = client.build_authorization_url(&challenge);
//!     println!("Redirect the browser to: {auth_url}");
//!
//!     // ... provider redirects back with ?code=...&state=... ...
//!
//!     // Complete login after validating state against the stored copy
//!     let tokens = client.exchange_code("authorization_code", &challenge.code_verifier).await?;
//!     let claims = decode_id_token(&tokens.id_token)?;
//!     println!("Signed in as {}", claims.email);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: Core OAuth types (`TokenSet`, `ProviderConfig`, `OAuthError`)
//! - **[`pkce`]**: PKCE challenge generation and validation
//! - **[`client`]**: OAuth HTTP client for authorization and token exchange
//! - **[`claims`]**: Identity token payload decoding and normalization
//!
//! # Security Features
//!
//! - **PKCE**: Prevents authorization code interception
//! - **State Validation**: CSRF protection with cryptographic randomness
//! - **Secret Hygiene**: Client secret, codes, and verifiers are never logged

pub mod claims;
pub mod client;
pub mod pkce;
pub mod types;

// Re-export commonly used types and functions
pub use claims::{decode_id_token, ClaimSet, ClaimsError};
pub use client::{OAuthClient, OAuthClientError};
pub use pkce::PKCEChallenge;
// Re-export PKCE utility functions
pub use pkce::{generate_code_challenge, generate_code_verifier, generate_state, validate_state};
pub use types::{OAuthError, ProviderConfig, TokenResponse, TokenSet};
