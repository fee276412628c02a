//! Identity token claim extraction
//!
//! Decodes the payload segment of a provider id_token (JWT) and normalizes
//! the claims the sign-in flow needs. The token signature is NOT verified
//! against the provider's published key set: the token arrives over TLS
//! directly from the token endpoint, and JWKS validation is a deferred
//! hardening step tracked for a later release.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

/// Error type for claim extraction
#[derive(Debug)]
pub enum ClaimsError {
    /// Token is not a structurally valid JWT
    MalformedToken(String),

    /// Decoded payload carries no usable subject identifier
    MissingSubject,
}

impl std::fmt::Display for ClaimsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedToken(msg) => write!(f, "Malformed identity token: {msg}"),
            Self::MissingSubject => write!(f, "Identity token has no subject claim"),
        }
    }
}

impl std::error::Error for ClaimsError {}

/// Normalized claims decoded from an identity token
///
/// `subject` is always present and non-empty; `email` is always present but
/// may be the synthesized `<subject>@unknown.local` placeholder when the
/// provider supplied no address in any known claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSet {
    /// Stable provider subject identifier (`sub`, falling back to `oid`)
    pub subject: String,

    /// Email address, derived via the fallback chain in [`decode_id_token`]
    pub email: String,

    /// Given name claim, when present
    pub given_name: Option<String>,

    /// Family name claim, when present
    pub family_name: Option<String>,

    /// Display name claim (`name`), when present
    pub display_name: Option<String>,

    /// Full decoded payload, persisted as the user's claims snapshot
    pub raw: Value,
}

/// Decode the payload of an identity token into a [`ClaimSet`]
///
/// The token must have the standard three-segment JWT shape. Only the
/// payload segment is decoded; see the module docs for the signature
/// verification stance.
///
/// Email derivation tries, in order, the first non-empty of: `email`,
/// `emails[0]`, `preferred_username`, `upn`, `mail`, `unique_name`. If all
/// are absent the address is synthesized as `<subject>@unknown.local` so a
/// user record can still be created. Synthesized addresses are unique only
/// as long as the provider never reuses subject ids; an open risk, accepted
/// for now.
///
/// # Errors
/// Returns [`ClaimsError::MalformedToken`] when the token does not decode
/// structurally, and [`ClaimsError::MissingSubject`] when neither `sub` nor
/// `oid` carries a non-empty value.
pub fn decode_id_token(id_token: &str) -> Result<ClaimSet, ClaimsError> {
    let segments: Vec<&str> = id_token.split('.').collect();
    if segments.len() != 3 {
        return Err(ClaimsError::MalformedToken(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let payload = URL_SAFE_NO_PAD
        .decode(segments[1])
        .map_err(|e| ClaimsError::MalformedToken(format!("payload is not base64url: {e}")))?;

    let claims: Value = serde_json::from_slice(&payload)
        .map_err(|e| ClaimsError::MalformedToken(format!("payload is not JSON: {e}")))?;

    let subject = string_claim(&claims, "sub")
        .or_else(|| string_claim(&claims, "oid"))
        .ok_or(ClaimsError::MissingSubject)?;

    let email = derive_email(&claims, &subject);

    Ok(ClaimSet {
        subject,
        email,
        given_name: string_claim(&claims, "given_name"),
        family_name: string_claim(&claims, "family_name"),
        display_name: string_claim(&claims, "name"),
        raw: claims,
    })
}

/// Non-empty string value of a top-level claim
fn string_claim(claims: &Value, key: &str) -> Option<String> {
    claims.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()).map(str::to_string)
}

/// First entry of the `emails` array claim, when present and non-empty
fn first_email_entry(claims: &Value) -> Option<String> {
    claims
        .get("emails")
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn derive_email(claims: &Value, subject: &str) -> String {
    string_claim(claims, "email")
        .or_else(|| first_email_entry(claims))
        .or_else(|| string_claim(claims, "preferred_username"))
        .or_else(|| string_claim(claims, "upn"))
        .or_else(|| string_claim(claims, "mail"))
        .or_else(|| string_claim(claims, "unique_name"))
        .unwrap_or_else(|| format!("{subject}@unknown.local"))
}
