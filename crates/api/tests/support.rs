use anteroom_domain::{
    AppConfig, DatabaseConfig, ProviderSettings, ServerConfig, SessionConfig,
};
use anteroom_lib::{routes, AppContext};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Shared context for router integration tests.
pub struct TestApp {
    /// Router under test, fully wired against the mock provider.
    pub router: Router,
    /// Application context for direct database access in assertions.
    pub context: AppContext,
    /// Mock identity provider serving the token endpoint.
    pub provider: MockServer,
    /// Keep temporary directory alive for the lifetime of the app.
    _temp_dir: TempDir,
}

/// Create a new test app with a fresh database and a mock provider.
pub async fn setup_test_app() -> TestApp {
    let provider = MockServer::start().await;
    let temp_dir = TempDir::new().expect("failed to create temporary database directory");
    let db_path = temp_dir.path().join("anteroom.db");

    let config = AppConfig {
        provider: ProviderSettings {
            authority: provider.uri(),
            tenant_id: "tenant-123".to_string(),
            client_id: "client-abc".to_string(),
            client_secret: "secret-xyz".to_string(),
            redirect_uri: "http://127.0.0.1:3001/auth/callback".to_string(),
        },
        server: ServerConfig { host: "127.0.0.1".to_string(), port: 0 },
        database: DatabaseConfig {
            path: db_path.to_string_lossy().into_owned(),
            pool_size: 4,
        },
        session: SessionConfig {
            secret: "integration-test-session-secret!".to_string(),
            cookie_name: "anteroom.session".to_string(),
            ttl_hours: 24,
        },
        frontend_url: "https://app.example.com".to_string(),
        environment: "development".to_string(),
    };

    let context = AppContext::from_config(config).await.expect("failed to build app context");
    let router = routes::router(context.clone());

    TestApp { router, context, provider, _temp_dir: temp_dir }
}

/// Mount a one-shot token endpoint response carrying a decodable identity
/// token for the given subject. Sequential sign-ins each mount their own.
pub async fn mount_token_endpoint(provider: &MockServer, subject: &str, email: &str) {
    let claims = serde_json::json!({
        "sub": subject,
        "email": email,
        "given_name": "Ada",
        "family_name": "Lovelace",
        "tid": "tenant-123"
    });

    Mock::given(method("POST"))
        .and(path("/tenant-123/oauth2/v2.0/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access-token",
            "id_token": id_token(&claims),
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .up_to_n_times(1)
        .mount(provider)
        .await;
}

/// Structurally valid identity token around the given claims payload. The
/// header and signature segments are placeholders since only the payload
/// is decoded.
pub fn id_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
    format!("{header}.{payload}.signature")
}

/// Drive the full browser sign-in against the mock provider and return the
/// session cookie pair ready to replay on authenticated requests. Each call
/// starts a fresh session.
pub async fn sign_in(app: &TestApp, subject: &str, email: &str) -> String {
    mount_token_endpoint(&app.provider, subject, email).await;

    let login = app.router.clone().oneshot(get("/auth/login")).await.expect("login request");
    assert_eq!(login.status(), StatusCode::SEE_OTHER);

    let cookie = session_cookie_pair(&login);
    let state = state_from_location(&login);

    let callback_uri = format!("/auth/callback?code=auth-code-123&state={state}");
    let callback = app
        .router
        .clone()
        .oneshot(get_with_cookie(&callback_uri, &cookie))
        .await
        .expect("callback request");
    assert_eq!(callback.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&callback), "https://app.example.com/dashboard");

    cookie
}

/// Flip a user's role to admin directly in the database. Takes effect on
/// the next sign-in, when the principal is rebuilt from the record.
pub fn promote_to_admin(context: &AppContext, email: &str) {
    let conn = context.db.get_connection().expect("connection");
    conn.execute_batch(&format!("UPDATE users SET role = 'admin' WHERE email = '{email}'"))
        .expect("failed to promote user");
}

/* -------------------------------------------------------------------------- */
/* Request builders */
/* -------------------------------------------------------------------------- */

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request should build")
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request should build")
}

pub fn post_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request should build")
}

pub fn put_json_with_cookie(uri: &str, cookie: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::PUT)
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request should build")
}

/* -------------------------------------------------------------------------- */
/* Response inspection */
/* -------------------------------------------------------------------------- */

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// The `Location` header of a redirect response.
pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("Location header")
        .to_str()
        .expect("Location is ascii")
        .to_string()
}

/// The full `Set-Cookie` header of a response.
pub fn set_cookie_header(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .expect("cookie is ascii")
        .to_string()
}

/// The leading `name=value` pair of the `Set-Cookie` header, ready to send
/// back in a `Cookie` request header.
pub fn session_cookie_pair(response: &Response<Body>) -> String {
    set_cookie_header(response)
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

/// The `state` query parameter of the provider authorization redirect.
pub fn state_from_location(response: &Response<Body>) -> String {
    let url = Url::parse(&location(response)).expect("Location should parse");
    url.query_pairs()
        .find(|(key, _)| key == "state")
        .map(|(_, value)| value.into_owned())
        .expect("state parameter")
}
