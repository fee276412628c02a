use std::time::Duration;

use anteroom_domain::AnteroomError;
use tracing::{info, warn};

/// Log the outcome of a handler execution with structured fields.
///
/// # Parameters
/// * `handler` - Logical handler identifier (e.g. `"auth::callback"`).
/// * `elapsed` - Duration the handler execution took.
/// * `success` - Whether the handler completed successfully.
///
/// The helper keeps the handlers concise and their timing logs uniform.
/// Callers must avoid forwarding sensitive values in `handler`.
#[inline]
pub fn log_handler_execution(handler: &str, elapsed: Duration, success: bool) {
    let duration_ms = elapsed.as_millis() as u64;

    if success {
        info!(handler, duration_ms, "handler_execution_success");
    } else {
        warn!(handler, duration_ms, "handler_execution_failure");
    }
}

/// Convert an `AnteroomError` into a stable label suitable for metrics/logging.
#[inline]
pub fn error_label(error: &AnteroomError) -> &'static str {
    match error {
        AnteroomError::Config(_) => "config",
        AnteroomError::CsrfMismatch(_) => "csrf_mismatch",
        AnteroomError::MissingAuthorizationCode(_) => "missing_code",
        AnteroomError::MissingPkceVerifier(_) => "missing_verifier",
        AnteroomError::TokenExchangeFailed(_) => "token_exchange_failed",
        AnteroomError::InvalidToken(_) => "invalid_token",
        AnteroomError::ReconciliationConflict(_) => "reconciliation_conflict",
        AnteroomError::SessionWriteFailed(_) => "session_write_failed",
        AnteroomError::SessionDestroyFailed(_) => "session_destroy_failed",
        AnteroomError::Unauthenticated(_) => "unauthenticated",
        AnteroomError::Forbidden(_) => "forbidden",
        AnteroomError::Database(_) => "database",
        AnteroomError::Network(_) => "network",
        AnteroomError::NotFound(_) => "not_found",
        AnteroomError::InvalidInput(_) => "invalid_input",
        AnteroomError::Internal(_) => "internal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_labels_are_stable_and_distinct_per_phase() {
        assert_eq!(error_label(&AnteroomError::CsrfMismatch("state".into())), "csrf_mismatch");
        assert_eq!(
            error_label(&AnteroomError::MissingAuthorizationCode("code".into())),
            "missing_code"
        );
        assert_eq!(
            error_label(&AnteroomError::TokenExchangeFailed("400".into())),
            "token_exchange_failed"
        );
        assert_eq!(error_label(&AnteroomError::Database("io".into())), "database");
    }
}
