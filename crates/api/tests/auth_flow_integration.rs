//! End-to-end sign-in flow coverage against a mock identity provider.
//!
//! Drives the router the way a browser would: login redirect, provider
//! callback, authenticated API calls, logout. Failure paths must always
//! collapse to the coarse `auth_failed` redirect and leave the session
//! unauthenticated.

#![allow(dead_code)]

#[path = "support.rs"]
mod support;

use std::collections::HashMap;

use axum::http::{Method, StatusCode};
use tower::ServiceExt;
use url::Url;

use support::{
    body_json, get, get_with_cookie, location, mount_token_endpoint, post_with_cookie,
    session_cookie_pair, set_cookie_header, setup_test_app, sign_in, state_from_location,
};

const ERROR_REDIRECT: &str = "https://app.example.com/login?error=auth_failed";

#[tokio::test(flavor = "multi_thread")]
async fn login_redirects_to_the_provider_with_a_handshake() {
    let app = setup_test_app().await;

    let response = app.router.clone().oneshot(get("/auth/login")).await.expect("login request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let authorize_url = Url::parse(&location(&response)).expect("authorize URL should parse");
    let expected_prefix =
        format!("{}/tenant-123/oauth2/v2.0/authorize", app.provider.uri());
    assert!(location(&response).starts_with(&expected_prefix));

    let params: HashMap<String, String> = authorize_url.query_pairs().into_owned().collect();
    assert_eq!(params.get("client_id"), Some(&"client-abc".to_string()));
    assert_eq!(params.get("response_type"), Some(&"code".to_string()));
    assert_eq!(params.get("code_challenge_method"), Some(&"S256".to_string()));
    assert!(!params["state"].is_empty());
    assert!(!params["code_challenge"].is_empty());

    let cookie = set_cookie_header(&response);
    assert!(cookie.starts_with("anteroom.session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=86400"));
    // Secure only turns on in production
    assert!(!cookie.contains("Secure"));
}

#[tokio::test(flavor = "multi_thread")]
async fn full_sign_in_flow_establishes_an_authenticated_session() {
    let app = setup_test_app().await;

    let cookie = sign_in(&app, "subject-1", "ada@example.com").await;

    let profile = app
        .router
        .clone()
        .oneshot(get_with_cookie("/api/profile", &cookie))
        .await
        .expect("profile request");
    assert_eq!(profile.status(), StatusCode::OK);

    let body = body_json(profile).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["firstName"], "Ada");
    assert_eq!(body["user"]["role"], "user");
}

#[tokio::test(flavor = "multi_thread")]
async fn callback_with_mismatched_state_fails_closed() {
    let app = setup_test_app().await;

    let login = app.router.clone().oneshot(get("/auth/login")).await.expect("login request");
    let cookie = session_cookie_pair(&login);

    let callback = app
        .router
        .clone()
        .oneshot(get_with_cookie("/auth/callback?code=auth-code-123&state=forged", &cookie))
        .await
        .expect("callback request");
    assert_eq!(callback.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&callback), ERROR_REDIRECT);

    // No principal was written
    let profile = app
        .router
        .clone()
        .oneshot(get_with_cookie("/api/profile", &cookie))
        .await
        .expect("profile request");
    assert_eq!(profile.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread")]
async fn callback_with_missing_code_fails_closed() {
    let app = setup_test_app().await;

    let login = app.router.clone().oneshot(get("/auth/login")).await.expect("login request");
    let cookie = session_cookie_pair(&login);
    let state = state_from_location(&login);

    let callback = app
        .router
        .clone()
        .oneshot(get_with_cookie(&format!("/auth/callback?state={state}"), &cookie))
        .await
        .expect("callback request");
    assert_eq!(callback.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&callback), ERROR_REDIRECT);
}

#[tokio::test(flavor = "multi_thread")]
async fn callback_with_a_provider_error_short_circuits() {
    let app = setup_test_app().await;

    let login = app.router.clone().oneshot(get("/auth/login")).await.expect("login request");
    let cookie = session_cookie_pair(&login);

    let callback_uri = "/auth/callback?error=access_denied&error_description=User%20cancelled";
    let callback = app
        .router
        .clone()
        .oneshot(get_with_cookie(callback_uri, &cookie))
        .await
        .expect("callback request");
    assert_eq!(callback.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&callback), ERROR_REDIRECT);

    // The token endpoint was never called
    let requests = app.provider.received_requests().await.unwrap_or_default();
    assert!(requests.iter().all(|request| request.method != Method::POST));
}

#[tokio::test(flavor = "multi_thread")]
async fn callback_without_a_session_cookie_fails_closed() {
    let app = setup_test_app().await;

    let callback = app
        .router
        .clone()
        .oneshot(get("/auth/callback?code=auth-code-123&state=some-state"))
        .await
        .expect("callback request");
    assert_eq!(callback.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&callback), ERROR_REDIRECT);
}

#[tokio::test(flavor = "multi_thread")]
async fn replayed_callback_fails_after_the_handshake_is_consumed() {
    let app = setup_test_app().await;
    mount_token_endpoint(&app.provider, "subject-1", "ada@example.com").await;

    let login = app.router.clone().oneshot(get("/auth/login")).await.expect("login request");
    let cookie = session_cookie_pair(&login);
    let state = state_from_location(&login);

    let callback_uri = format!("/auth/callback?code=auth-code-123&state={state}");
    let first = app
        .router
        .clone()
        .oneshot(get_with_cookie(&callback_uri, &cookie))
        .await
        .expect("first callback");
    assert_eq!(location(&first), "https://app.example.com/dashboard");

    // The handshake was cleared by the first completion
    let replay = app
        .router
        .clone()
        .oneshot(get_with_cookie(&callback_uri, &cookie))
        .await
        .expect("replayed callback");
    assert_eq!(replay.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&replay), ERROR_REDIRECT);
}

#[tokio::test(flavor = "multi_thread")]
async fn a_new_login_invalidates_the_earlier_handshake() {
    let app = setup_test_app().await;

    let first = app.router.clone().oneshot(get("/auth/login")).await.expect("first login");
    let cookie = session_cookie_pair(&first);
    let stale_state = state_from_location(&first);

    // Second attempt on the same session overwrites the handshake
    let second = app
        .router
        .clone()
        .oneshot(get_with_cookie("/auth/login", &cookie))
        .await
        .expect("second login");
    let fresh_state = state_from_location(&second);
    assert_ne!(stale_state, fresh_state);

    let stale = app
        .router
        .clone()
        .oneshot(get_with_cookie(
            &format!("/auth/callback?code=auth-code-123&state={stale_state}"),
            &cookie,
        ))
        .await
        .expect("stale callback");
    assert_eq!(location(&stale), ERROR_REDIRECT);

    mount_token_endpoint(&app.provider, "subject-1", "ada@example.com").await;
    let fresh = app
        .router
        .clone()
        .oneshot(get_with_cookie(
            &format!("/auth/callback?code=auth-code-123&state={fresh_state}"),
            &cookie,
        ))
        .await
        .expect("fresh callback");
    assert_eq!(location(&fresh), "https://app.example.com/dashboard");
}

#[tokio::test(flavor = "multi_thread")]
async fn logout_destroys_the_session_and_clears_the_cookie() {
    let app = setup_test_app().await;

    let cookie = sign_in(&app, "subject-1", "ada@example.com").await;

    let logout = app
        .router
        .clone()
        .oneshot(post_with_cookie("/auth/logout", &cookie))
        .await
        .expect("logout request");
    assert_eq!(logout.status(), StatusCode::OK);

    let removal = set_cookie_header(&logout);
    assert!(removal.starts_with("anteroom.session="));
    assert!(removal.contains("Max-Age=0"));

    let body = body_json(logout).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Logged out successfully");
    assert_eq!(body["redirectTo"], "/login");

    // The stale cookie no longer authenticates
    let profile = app
        .router
        .clone()
        .oneshot(get_with_cookie("/api/profile", &cookie))
        .await
        .expect("profile request");
    assert_eq!(profile.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread")]
async fn logout_without_a_session_still_reports_success() {
    let app = setup_test_app().await;

    let logout = app
        .router
        .clone()
        .oneshot(
            axum::http::Request::builder()
                .method(Method::POST)
                .uri("/auth/logout")
                .body(axum::body::Body::empty())
                .expect("request should build"),
        )
        .await
        .expect("logout request");
    assert_eq!(logout.status(), StatusCode::OK);

    let body = body_json(logout).await;
    assert_eq!(body["success"], true);
}
