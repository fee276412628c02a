//! HTTP routes and router assembly

mod auth;
mod health;
mod user;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::context::AppContext;

/// Build the application router with all routes and middleware.
pub fn router(context: AppContext) -> Router {
    let cors = cors_layer(&context);

    Router::new()
        // Sign-in flow
        .route("/auth/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/logout", post(auth::logout))
        // Session-gated API
        .route("/api/profile", get(user::get_profile).put(user::update_profile))
        .route("/api/dashboard", get(user::dashboard))
        .route("/api/premium", get(user::premium))
        .route("/api/users", get(user::list_users))
        // Health check
        .route("/health", get(health::health))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(context)
}

/// CORS for the browser frontend.
///
/// The session cookie travels on every API call, so the frontend origin
/// must be allowed explicitly with credentials; a wildcard origin would be
/// rejected by browsers on credentialed requests.
fn cors_layer(context: &AppContext) -> CorsLayer {
    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    match context.config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => cors = cors.allow_origin(origin),
        Err(_) => {
            tracing::warn!(
                frontend_url = %context.config.frontend_url,
                "frontend_url is not a valid origin; cross-origin requests will be refused"
            );
        }
    }

    cors
}
