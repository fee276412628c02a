//! In-memory fake implementations for core ports
//!
//! Provides deterministic fakes for the identity gateway, session store,
//! and user repository, plus small fixture builders for claims and tokens.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use anteroom_common::auth::{ClaimSet, PKCEChallenge, TokenSet};
use anteroom_core::auth::ports::{IdentityGateway, SessionStore};
use anteroom_core::user::ports::UserRepository;
use anteroom_domain::{
    AnteroomError, ProfileUpdate, Result as DomainResult, SessionData, UserRecord, UserRole,
};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// In-memory fake for `UserRepository`.
///
/// Enforces subject uniqueness like the real table, and can simulate a
/// concurrent writer winning the insert race.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, UserRecord>>,
    conflict_once: AtomicBool,
}

impl InMemoryUserRepository {
    /// Create an empty fake repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing record.
    pub fn with_user(self, user: UserRecord) -> Self {
        self.users.lock().unwrap().insert(user.id.clone(), user);
        self
    }

    /// Make the next `create` behave as if a concurrent sign-in won the
    /// insert race: the rival row lands in the store and the call fails
    /// with a conflict.
    pub fn trigger_create_conflict(&self) {
        self.conflict_once.store(true, Ordering::SeqCst);
    }

    /// Number of stored records.
    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    /// Fetch a stored record by id.
    pub fn stored(&self, id: &str) -> Option<UserRecord> {
        self.users.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<UserRecord>> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_by_subject(&self, subject_id: &str) -> DomainResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.subject_id == subject_id)
            .cloned())
    }

    async fn create(&self, user: &UserRecord) -> DomainResult<()> {
        let mut users = self.users.lock().unwrap();

        if self.conflict_once.swap(false, Ordering::SeqCst) {
            let mut rival = user.clone();
            rival.id = format!("rival-{}", user.id);
            users.insert(rival.id.clone(), rival);
            return Err(AnteroomError::ReconciliationConflict(format!(
                "subject {} already exists",
                user.subject_id
            )));
        }

        if users.values().any(|u| u.subject_id == user.subject_id) {
            return Err(AnteroomError::ReconciliationConflict(format!(
                "subject {} already exists",
                user.subject_id
            )));
        }

        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn update_claims(&self, id: &str, claims: &serde_json::Value) -> DomainResult<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(id) {
            user.claims = claims.clone();
            user.updated_at = chrono::Utc::now().timestamp_millis();
        }
        Ok(())
    }

    async fn update_last_login(&self, id: &str, at: i64) -> DomainResult<()> {
        if let Some(user) = self.users.lock().unwrap().get_mut(id) {
            user.last_login_at = Some(at);
        }
        Ok(())
    }

    async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> DomainResult<Option<UserRecord>> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.get_mut(id) else {
            return Ok(None);
        };

        if let Some(first_name) = &update.first_name {
            user.first_name = first_name.clone();
        }
        if let Some(last_name) = &update.last_name {
            user.last_name = last_name.clone();
        }
        if let Some(email) = &update.email {
            user.email = email.clone();
        }
        user.updated_at = chrono::Utc::now().timestamp_millis();

        Ok(Some(user.clone()))
    }

    async fn deactivate(&self, id: &str) -> DomainResult<bool> {
        let mut users = self.users.lock().unwrap();
        match users.get_mut(id) {
            Some(user) => {
                user.is_active = false;
                user.updated_at = chrono::Utc::now().timestamp_millis();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_active(&self) -> DomainResult<Vec<UserRecord>> {
        let mut active: Vec<UserRecord> =
            self.users.lock().unwrap().values().filter(|u| u.is_active).cloned().collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(active)
    }
}

/// In-memory fake for `SessionStore`.
///
/// Saves can be budgeted so tests can fail the nth write, and destroy can
/// be forced to fail.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, SessionData>>,
    save_budget: Mutex<Option<usize>>,
    fail_destroy: AtomicBool,
}

impl InMemorySessionStore {
    /// Create an empty fake store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `n` more successful saves, then fail every save after that.
    pub fn fail_saves_after(&self, n: usize) {
        *self.save_budget.lock().unwrap() = Some(n);
    }

    /// Make every destroy fail.
    pub fn fail_destroy(&self) {
        self.fail_destroy.store(true, Ordering::SeqCst);
    }

    /// Peek at stored session data without going through the port.
    pub fn session(&self, id: &str) -> Option<SessionData> {
        self.sessions.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, session_id: &str) -> DomainResult<Option<SessionData>> {
        Ok(self.sessions.lock().unwrap().get(session_id).cloned())
    }

    async fn save(&self, session_id: &str, data: &SessionData) -> DomainResult<()> {
        {
            let mut budget = self.save_budget.lock().unwrap();
            if let Some(remaining) = budget.as_mut() {
                if *remaining == 0 {
                    return Err(AnteroomError::Database("session store offline".to_string()));
                }
                *remaining -= 1;
            }
        }

        self.sessions.lock().unwrap().insert(session_id.to_string(), data.clone());
        Ok(())
    }

    async fn destroy(&self, session_id: &str) -> DomainResult<()> {
        if self.fail_destroy.load(Ordering::SeqCst) {
            return Err(AnteroomError::Database("session store offline".to_string()));
        }
        self.sessions.lock().unwrap().remove(session_id);
        Ok(())
    }
}

/// Scripted fake for `IdentityGateway`.
///
/// Records every exchange call and replays a configured result.
pub struct FakeIdentityGateway {
    exchange_result: Mutex<DomainResult<TokenSet>>,
    captured: Mutex<Vec<(String, String)>>,
}

impl FakeIdentityGateway {
    /// Gateway whose exchange succeeds with an id_token carrying `claims`.
    pub fn returning_claims(claims: &serde_json::Value) -> Self {
        Self {
            exchange_result: Mutex::new(Ok(token_set(&encode_id_token(claims)))),
            captured: Mutex::new(Vec::new()),
        }
    }

    /// Gateway whose exchange fails with the given error.
    pub fn failing(error: AnteroomError) -> Self {
        Self { exchange_result: Mutex::new(Err(error)), captured: Mutex::new(Vec::new()) }
    }

    /// Gateway returning a token that is not a decodable JWT.
    pub fn returning_garbage_token() -> Self {
        Self {
            exchange_result: Mutex::new(Ok(token_set("not-a-jwt"))),
            captured: Mutex::new(Vec::new()),
        }
    }

    /// `(code, verifier)` pairs seen by `exchange_code`, in call order.
    pub fn captured_exchanges(&self) -> Vec<(String, String)> {
        self.captured.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityGateway for FakeIdentityGateway {
    fn authorization_url(&self, challenge: &PKCEChallenge) -> String {
        format!(
            "https://login.example.test/authorize?state={}&code_challenge={}",
            challenge.state, challenge.code_challenge
        )
    }

    async fn exchange_code(&self, code: &str, code_verifier: &str) -> DomainResult<TokenSet> {
        self.captured.lock().unwrap().push((code.to_string(), code_verifier.to_string()));
        self.exchange_result.lock().unwrap().clone()
    }
}

/// Encode a claims object as the payload of a structurally valid JWT.
pub fn encode_id_token(claims: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
    format!("{header}.{payload}.test-signature")
}

/// Token set wrapping the given id_token.
pub fn token_set(id_token: &str) -> TokenSet {
    TokenSet {
        id_token: id_token.to_string(),
        access_token: "test-access-token".to_string(),
        refresh_token: None,
        token_type: "Bearer".to_string(),
        expires_in: 3600,
        scope: Some("openid profile email".to_string()),
    }
}

/// Claim set fixture with the fields reconciliation cares about.
pub fn claim_set(subject: &str, email: &str) -> ClaimSet {
    ClaimSet {
        subject: subject.to_string(),
        email: email.to_string(),
        given_name: None,
        family_name: None,
        display_name: None,
        raw: serde_json::json!({ "sub": subject, "email": email }),
    }
}

/// User record fixture for seeding the fake repository.
pub fn sample_user(id: &str, subject: &str, email: &str) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        subject_id: subject.to_string(),
        email: email.to_string(),
        first_name: "Sample".to_string(),
        last_name: "User".to_string(),
        role: UserRole::User,
        is_active: true,
        email_verified: true,
        claims: serde_json::json!({ "sub": subject }),
        created_at: 1_700_000_000_000,
        updated_at: 1_700_000_000_000,
        last_login_at: None,
    }
}
