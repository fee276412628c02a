//! PKCE (Proof Key for Code Exchange) implementation for OAuth 2.0
//!
//! Implements RFC 7636 for the browser sign-in handshake. The verifier and
//! CSRF state are generated at login initiation, parked in the caller's
//! session, and consumed exactly once at the provider callback.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Generate a cryptographically secure code verifier
///
/// Returns a URL-safe base64-encoded random string of 32 bytes (43 characters).
/// Per RFC 7636, verifiers must be 43-128 characters long.
///
/// # Errors
/// Returns error if random number generation fails (extremely rare)
pub fn generate_code_verifier() -> Result<String, String> {
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    Ok(URL_SAFE_NO_PAD.encode(random_bytes))
}

/// Generate code challenge from verifier using SHA256
///
/// Per RFC 7636, the challenge is BASE64URL(SHA256(ASCII(code_verifier)))
///
/// # Arguments
/// * `verifier` - The code verifier string
///
/// # Errors
/// Returns error if encoding fails
pub fn generate_code_challenge(verifier: &str) -> Result<String, String> {
    let mut hasher = Sha256::new();
    hasher.update(verifier.as_bytes());
    let hash = hasher.finalize();
    Ok(URL_SAFE_NO_PAD.encode(hash))
}

/// Generate a random state token for CSRF protection
///
/// Returns a URL-safe base64-encoded random string of 32 bytes (43 characters).
///
/// # Errors
/// Returns error if random number generation fails (extremely rare)
pub fn generate_state() -> Result<String, String> {
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen()).collect();
    Ok(URL_SAFE_NO_PAD.encode(random_bytes))
}

/// Validate that the state token matches
///
/// Both values are single-use random tokens, so plain equality is
/// sufficient.
///
/// # Arguments
/// * `expected` - The state that was sent in the authorization request
/// * `actual` - The state received in the callback
///
/// # Returns
/// `true` if states match, `false` otherwise
pub fn validate_state(expected: &str, actual: &str) -> bool {
    expected == actual
}

/// PKCE challenge pair for OAuth 2.0 authorization
///
/// Contains the code verifier (sent during token exchange), the code
/// challenge (sent during the authorization request), and the CSRF state
/// that ties the callback to this attempt.
#[derive(Debug, Clone)]
pub struct PKCEChallenge {
    /// Random string (43-128 chars, base64url encoded)
    /// Kept secret until token exchange
    pub code_verifier: String,

    /// SHA256 hash of code_verifier (base64url encoded)
    /// Sent in authorization request for server validation
    pub code_challenge: String,

    /// Random CSRF protection token
    /// Must match between authorization request and callback
    pub state: String,
}

impl PKCEChallenge {
    /// Generate a new PKCE challenge with cryptographically secure random
    /// values
    ///
    /// # Returns
    /// A new `PKCEChallenge` with:
    /// - `code_verifier`: 32 random bytes → 43 chars base64url (within RFC 7636
    ///   43-128 limit)
    /// - `code_challenge`: SHA256(code_verifier) → base64url
    /// - `state`: 32 random bytes → 43 chars base64url for CSRF protection
    ///
    /// # Examples
    /// ```
    /// use anteroom_common::auth::pkce::PKCEChallenge;
    ///
    /// let challenge = PKCEChallenge::generate().expect("Failed to generate PKCE challenge");
    /// assert!(challenge.code_verifier.len() >= 43);
    /// assert!(challenge.code_verifier.len() <= 128);
    /// ```
    ///
    /// # Errors
    /// Returns error if cryptographic random number generation fails (extremely
    /// rare)
    pub fn generate() -> Result<Self, String> {
        let code_verifier = generate_code_verifier()?;
        let code_challenge = generate_code_challenge(&code_verifier)?;
        let state = generate_state()?;

        Ok(Self { code_verifier, code_challenge, state })
    }

    /// Get the challenge method (always "S256" for SHA256)
    #[must_use]
    pub fn challenge_method(&self) -> &str {
        "S256"
    }
}
