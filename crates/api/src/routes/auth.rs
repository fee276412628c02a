//! Sign-in flow handlers: login, provider callback, logout

use std::time::Instant;

use anteroom_core::CallbackParams;
use anteroom_domain::AppConfig;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::PrivateCookieJar;
use serde::Deserialize;
use serde_json::json;
use time::Duration;

use crate::context::AppContext;
use crate::utils::logging::{error_label, log_handler_execution};

/// Query parameters the provider sends back to the redirect URI.
#[derive(Debug, Deserialize)]
pub(crate) struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// GET /auth/login
///
/// Starts a sign-in attempt: stores a fresh PKCE handshake under the
/// session and redirects the browser to the provider authorization URL.
/// The session cookie is (re)set so the callback can find the handshake.
pub(crate) async fn login(
    State(context): State<AppContext>,
    jar: PrivateCookieJar,
) -> Result<(PrivateCookieJar, Redirect), Response> {
    let started = Instant::now();

    let session_id = jar
        .get(&context.config.session.cookie_name)
        .map(|cookie| cookie.value().to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    match context.auth.begin_login(&session_id).await {
        Ok(authorize_url) => {
            log_handler_execution("auth::login", started.elapsed(), true);
            let jar = jar.add(session_cookie(&context.config, &session_id));
            Ok((jar, Redirect::to(&authorize_url)))
        }
        Err(err) => {
            tracing::error!(error = %err, label = error_label(&err), "failed to start login");
            log_handler_execution("auth::login", started.elapsed(), false);
            Err(login_error(&context.config.frontend_url, "login_failed"))
        }
    }
}

/// GET /auth/callback
///
/// Completes the sign-in attempt. Every failure collapses to the coarse
/// `auth_failed` redirect; the precise reason is only ever logged.
pub(crate) async fn callback(
    State(context): State<AppContext>,
    jar: PrivateCookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect, Response> {
    let started = Instant::now();

    if let Some(error) = &query.error {
        let description = query.error_description.as_deref().unwrap_or("no description");
        tracing::warn!(error = %error, description, "provider returned an authorization error");
        log_handler_execution("auth::callback", started.elapsed(), false);
        return Err(login_error(&context.config.frontend_url, "auth_failed"));
    }

    let session_id = jar
        .get(&context.config.session.cookie_name)
        .map(|cookie| cookie.value().to_string())
        .ok_or_else(|| {
            tracing::warn!("callback request without a session cookie");
            log_handler_execution("auth::callback", started.elapsed(), false);
            login_error(&context.config.frontend_url, "auth_failed")
        })?;

    let params = CallbackParams { code: query.code, state: query.state };

    match context.auth.complete_login(&session_id, &params).await {
        Ok(principal) => {
            tracing::info!(user_id = %principal.user_id, "login completed");
            log_handler_execution("auth::callback", started.elapsed(), true);
            Ok(Redirect::to(&format!("{}/dashboard", context.config.frontend_url)))
        }
        Err(err) => {
            tracing::warn!(error = %err, label = error_label(&err), "login failed");
            log_handler_execution("auth::callback", started.elapsed(), false);
            Err(login_error(&context.config.frontend_url, "auth_failed"))
        }
    }
}

/// POST /auth/logout
///
/// Destroys the server-side session and clears the cookie. A request
/// without a cookie still reports success so the client state resets.
pub(crate) async fn logout(State(context): State<AppContext>, jar: PrivateCookieJar) -> Response {
    let started = Instant::now();
    let cookie_name = context.config.session.cookie_name.clone();

    let Some(cookie) = jar.get(&cookie_name) else {
        log_handler_execution("auth::logout", started.elapsed(), true);
        return logout_success(jar, &cookie_name);
    };

    let session_id = cookie.value().to_string();
    match context.auth.logout(&session_id).await {
        Ok(()) => {
            log_handler_execution("auth::logout", started.elapsed(), true);
            logout_success(jar, &cookie_name)
        }
        Err(err) => {
            tracing::error!(error = %err, label = error_label(&err), "logout failed");
            log_handler_execution("auth::logout", started.elapsed(), false);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "Failed to destroy session" })),
            )
                .into_response()
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Helpers */
/* -------------------------------------------------------------------------- */

fn logout_success(jar: PrivateCookieJar, cookie_name: &str) -> Response {
    let jar = jar.remove(clear_session_cookie(cookie_name));
    (
        jar,
        Json(json!({
            "success": true,
            "message": "Logged out successfully",
            "redirectTo": "/login"
        })),
    )
        .into_response()
}

/// Coarse failure redirect; carries no detail beyond the generic code.
fn login_error(frontend_url: &str, code: &str) -> Response {
    let encoded = urlencoding::encode(code);
    Redirect::to(&format!("{frontend_url}/login?error={encoded}")).into_response()
}

/// Session cookie holding the opaque session id.
///
/// Re-adding on every login refreshes the browser-side max-age in step
/// with the rolling server-side expiry.
fn session_cookie(config: &AppConfig, session_id: &str) -> Cookie<'static> {
    Cookie::build((config.session.cookie_name.clone(), session_id.to_string()))
        .http_only(true)
        .secure(config.is_production())
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::hours(config.session.ttl_hours as i64))
        .build()
}

/// Removal cookie for the session.
fn clear_session_cookie(name: &str) -> Cookie<'static> {
    Cookie::build((name.to_string(), ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}
