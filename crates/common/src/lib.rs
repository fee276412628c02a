//! Common utilities shared across Anteroom crates.
//!
//! Currently this is the OAuth 2.0 + PKCE toolkit: pure handshake
//! primitives and the provider HTTP client, kept free of session and
//! persistence concerns so higher layers can compose them behind ports.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;

// Re-export commonly used types and traits for convenience
pub use auth::{
    decode_id_token, ClaimSet, ClaimsError, OAuthClient, OAuthClientError, OAuthError,
    PKCEChallenge, ProviderConfig, TokenResponse, TokenSet,
};
