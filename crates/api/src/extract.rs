//! Session-backed request extractors

use anteroom_domain::{AnteroomError, Principal, UserRole};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::Key;
use axum_extra::extract::PrivateCookieJar;

use crate::context::AppContext;
use crate::error::ApiError;

/// Authenticated principal extracted from the session cookie.
///
/// Use as an axum extractor in route handlers. Rejects with
/// `401 {success:false, error:"Authentication required", redirectTo:"/login"}`
/// when the cookie is absent, the session has expired, or it holds no
/// principal.
///
/// # Example
///
/// ```rust,ignore
/// async fn profile(user: CurrentUser) -> impl IntoResponse {
///     format!("Hello, {}", user.principal.email)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Session id (from cookie).
    pub session_id: String,
    /// Session-resident projection of the signed-in user.
    pub principal: Principal,
}

impl CurrentUser {
    /// Gate for role-restricted routes.
    ///
    /// # Errors
    /// `Forbidden` when the principal's role does not match; the distinction
    /// from the 401 gate matters to clients, so this never produces
    /// `Unauthenticated`.
    pub fn require_role(&self, role: UserRole) -> Result<(), ApiError> {
        if self.principal.role != role {
            return Err(ApiError(AnteroomError::Forbidden(format!("Role '{role}' required"))));
        }
        Ok(())
    }
}

impl FromRequestParts<AppContext> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        context: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let jar: PrivateCookieJar<Key> = PrivateCookieJar::from_request_parts(parts, context)
            .await
            .map_err(|_| unauthenticated())?;

        let session_id = jar
            .get(&context.config.session.cookie_name)
            .map(|cookie| cookie.value().to_string())
            .ok_or_else(unauthenticated)?;

        let principal = context
            .auth
            .current_principal(&session_id)
            .await?
            .ok_or_else(unauthenticated)?;

        Ok(CurrentUser { session_id, principal })
    }
}

fn unauthenticated() -> ApiError {
    ApiError(AnteroomError::Unauthenticated("no active session".to_string()))
}
