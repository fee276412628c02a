//! Session-gated profile, dashboard, and admin handlers

use anteroom_domain::{AnteroomError, ProfileUpdate, UserRole};
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::context::AppContext;
use crate::error::ApiError;
use crate::extract::CurrentUser;

/// GET /api/profile
///
/// Returns the safe projection of the signed-in user's record. The row can
/// disappear between sign-in and this read (deactivation and cleanup run
/// out of band), which surfaces as a 404 rather than a 500.
pub(crate) async fn get_profile(
    State(context): State<AppContext>,
    user: CurrentUser,
) -> Result<Json<Value>, ApiError> {
    let record = context
        .users
        .get_user(&user.principal.user_id)
        .await?
        .ok_or_else(|| ApiError(AnteroomError::NotFound("User not found".to_string())))?;

    Ok(Json(json!({ "success": true, "user": record.summary() })))
}

/// PUT /api/profile
///
/// Applies the provided fields and refreshes the session principal so the
/// denormalized copy does not drift from the record.
pub(crate) async fn update_profile(
    State(context): State<AppContext>,
    user: CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<Value>, ApiError> {
    let record = context.users.update_profile(&user.principal.user_id, &update).await?;

    if let Err(err) = context.auth.refresh_principal(&user.session_id, &record).await {
        // The record update already succeeded; a stale principal self-heals
        // on the next sign-in.
        tracing::warn!(error = %err, "failed to refresh session principal after profile update");
    }

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "user": record.summary()
    })))
}

/// GET /api/dashboard
///
/// Personalized from the session principal only; no repository round-trip.
pub(crate) async fn dashboard(user: CurrentUser) -> Json<Value> {
    let principal = &user.principal;

    Json(json!({
        "success": true,
        "data": {
            "welcomeMessage": format!("Welcome back, {}!", principal.first_name),
            "user": {
                "id": principal.user_id,
                "name": format!("{} {}", principal.first_name, principal.last_name),
                "email": principal.email,
                "role": principal.role
            },
            "features": [
                "OAuth2 Authentication",
                "Session Management",
                "Role-based Access"
            ]
        }
    }))
}

/// GET /api/premium (admin only)
pub(crate) async fn premium(user: CurrentUser) -> Result<Json<Value>, ApiError> {
    user.require_role(UserRole::Admin)?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "message": "Premium Content - Admin Only",
            "features": [
                "Advanced Analytics",
                "Priority Support",
                "Custom Features"
            ]
        }
    })))
}

/// GET /api/users (admin only)
///
/// All active users as safe projections, newest first.
pub(crate) async fn list_users(
    State(context): State<AppContext>,
    user: CurrentUser,
) -> Result<Json<Value>, ApiError> {
    user.require_role(UserRole::Admin)?;

    let users = context.users.list_active_users().await?;
    let count = users.len();

    Ok(Json(json!({ "success": true, "users": users, "count": count })))
}
