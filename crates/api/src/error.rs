//! Domain error to HTTP response mapping

use anteroom_domain::AnteroomError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::utils::logging::error_label;

/// JSON body for gate rejections and request failures.
#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(rename = "redirectTo", skip_serializing_if = "Option::is_none")]
    redirect_to: Option<&'static str>,
}

/// Error newtype that turns domain failures into HTTP responses at the
/// handler boundary.
///
/// Only the gate and ambient variants surface their message; everything
/// else collapses to a generic 500 with the detail kept server-side in
/// the logs.
#[derive(Debug)]
pub struct ApiError(pub AnteroomError);

impl From<AnteroomError> for ApiError {
    fn from(value: AnteroomError) -> Self {
        ApiError(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, redirect_to) = match self.0 {
            AnteroomError::Unauthenticated(_) => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
                Some("/login"),
            ),
            AnteroomError::Forbidden(message) => (StatusCode::FORBIDDEN, message, None),
            AnteroomError::NotFound(message) => (StatusCode::NOT_FOUND, message, None),
            AnteroomError::InvalidInput(message) => (StatusCode::BAD_REQUEST, message, None),
            other => {
                tracing::error!(
                    error = %other,
                    label = error_label(&other),
                    "request failed"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        (status, Json(ErrorBody { success: false, error, redirect_to })).into_response()
    }
}
