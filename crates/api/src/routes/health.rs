//! Service health endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde_json::json;

use crate::context::AppContext;

/// GET /health
///
/// 200 when the database and the session table both answer trivial
/// queries, 503 otherwise. Unauthenticated so load balancers can probe it.
pub(crate) async fn health(State(context): State<AppContext>) -> Response {
    let database = context.health.check_database().await;
    let sessions = context.health.check_sessions().await;

    let timestamp = Utc::now().to_rfc3339();
    let environment = context.config.environment.clone();

    if database.is_ok() && sessions.is_ok() {
        return Json(json!({
            "status": "OK",
            "timestamp": timestamp,
            "services": {
                "database": "connected",
                "sessions": "connected"
            },
            "environment": environment
        }))
        .into_response();
    }

    if let Err(err) = &database {
        tracing::error!(error = %err, "database health check failed");
    }
    if let Err(err) = &sessions {
        tracing::error!(error = %err, "session health check failed");
    }

    let database_status = if database.is_ok() { "connected" } else { "disconnected" };
    let sessions_status = if sessions.is_ok() { "connected" } else { "disconnected" };

    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(json!({
            "status": "ERROR",
            "timestamp": timestamp,
            "services": {
                "database": database_status,
                "sessions": sessions_status
            },
            "environment": environment,
            "error": "Service unavailable"
        })),
    )
        .into_response()
}
