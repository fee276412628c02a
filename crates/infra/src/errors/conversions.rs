//! Conversions from external infrastructure errors into domain errors.

use anteroom_common::auth::OAuthClientError;
use anteroom_domain::AnteroomError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// SQLite extended result code for a UNIQUE constraint violation.
///
/// The only non-primary-key unique index in the schema is
/// `users.subject_id`, so this code always means a reconciliation race.
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AnteroomError);

impl From<InfraError> for AnteroomError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AnteroomError> for InfraError {
    fn from(value: AnteroomError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoAnteroomError {
    fn into_anteroom(self) -> AnteroomError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → AnteroomError */
/* -------------------------------------------------------------------------- */

impl IntoAnteroomError for SqlError {
    fn into_anteroom(self) -> AnteroomError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        AnteroomError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        AnteroomError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, SQLITE_CONSTRAINT_UNIQUE) => {
                        AnteroomError::ReconciliationConflict(
                            "another record already holds this subject id".into(),
                        )
                    }
                    (ErrorCode::ConstraintViolation, _) => AnteroomError::Database(format!(
                        "constraint violation (code {}): {}",
                        err.extended_code, message
                    )),
                    _ => AnteroomError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => AnteroomError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                AnteroomError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                AnteroomError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => {
                AnteroomError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidParameterName(parameter_name) => {
                AnteroomError::Database(format!("invalid parameter name: {parameter_name}"))
            }
            RE::InvalidPath(path) => AnteroomError::Database(format!(
                "invalid database path: {}",
                path.to_string_lossy()
            )),
            RE::InvalidQuery => AnteroomError::Database("invalid SQL query".into()),
            other => AnteroomError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_anteroom())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → AnteroomError */
/* -------------------------------------------------------------------------- */

impl IntoAnteroomError for r2d2::Error {
    fn into_anteroom(self) -> AnteroomError {
        AnteroomError::Database(format!("connection pool error: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_anteroom())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → AnteroomError */
/* -------------------------------------------------------------------------- */

impl IntoAnteroomError for serde_json::Error {
    fn into_anteroom(self) -> AnteroomError {
        AnteroomError::Internal(format!("JSON conversion failed: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_anteroom())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → AnteroomError */
/* -------------------------------------------------------------------------- */

impl IntoAnteroomError for HttpError {
    fn into_anteroom(self) -> AnteroomError {
        if self.is_timeout() {
            return AnteroomError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return AnteroomError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            return AnteroomError::Network(format!(
                "HTTP {} {}",
                code,
                status.canonical_reason().unwrap_or("unknown status")
            ));
        }

        AnteroomError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_anteroom())
    }
}

/* -------------------------------------------------------------------------- */
/* OAuthClientError → AnteroomError */
/* -------------------------------------------------------------------------- */

impl IntoAnteroomError for OAuthClientError {
    fn into_anteroom(self) -> AnteroomError {
        match self {
            OAuthClientError::RequestFailed(err) if err.is_timeout() || err.is_connect() => {
                err.into_anteroom()
            }
            OAuthClientError::RequestFailed(err) => {
                AnteroomError::TokenExchangeFailed(format!("transport failure: {err}"))
            }
            OAuthClientError::OAuthError(err) => {
                AnteroomError::TokenExchangeFailed(format!("provider rejected the exchange: {err}"))
            }
            OAuthClientError::ParseError(msg) => {
                AnteroomError::TokenExchangeFailed(format!("malformed token response: {msg}"))
            }
        }
    }
}

impl From<OAuthClientError> for InfraError {
    fn from(value: OAuthClientError) -> Self {
        InfraError(value.into_anteroom())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
