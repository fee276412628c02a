use std::sync::Arc;

use anteroom_common::auth::ClaimSet;
use anteroom_domain::{PendingHandshake, Principal, SessionData, UserRecord, UserRole};
use anteroom_infra::database::DbManager;
use tempfile::TempDir;

/// Temporary database wrapper that keeps the underlying file alive for the
/// duration of a test run.
pub struct TestDatabase {
    pub manager: Arc<DbManager>,
    _temp_dir: TempDir,
}

impl TestDatabase {
    /// Create a new temporary database with the schema applied.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir should be created");
        let db_path = temp_dir.path().join("test.db");

        let manager = DbManager::new(&db_path, 4).expect("db manager should be created");
        manager.run_migrations().expect("migrations should run");

        Self { manager: Arc::new(manager), _temp_dir: temp_dir }
    }

    /// Execute a batch of SQL statements against the database.
    pub fn execute_batch(&self, sql: &str) {
        let conn = self
            .manager
            .get_connection()
            .expect("connection should be available for execute_batch");
        conn.execute_batch(sql).expect("SQL batch execution should succeed");
    }

    /// Count the rows currently in a table.
    pub fn count_rows(&self, table: &str) -> i64 {
        let conn = self.manager.get_connection().expect("connection should be available");
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("count query should succeed")
    }
}

impl Default for TestDatabase {
    fn default() -> Self {
        Self::new()
    }
}

/// Claim set shaped like a decoded provider id token.
pub fn claim_set(subject: &str, email: &str) -> ClaimSet {
    ClaimSet {
        subject: subject.to_string(),
        email: email.to_string(),
        given_name: Some("Ada".to_string()),
        family_name: Some("Lovelace".to_string()),
        display_name: Some("Ada Lovelace".to_string()),
        raw: serde_json::json!({
            "sub": subject,
            "email": email,
            "given_name": "Ada",
            "family_name": "Lovelace",
            "tid": "tenant-123",
        }),
    }
}

/// User record ready for insertion through the repository.
pub fn user_record(id: &str, subject: &str) -> UserRecord {
    let now = chrono::Utc::now().timestamp_millis();
    UserRecord {
        id: id.to_string(),
        subject_id: subject.to_string(),
        email: format!("{id}@example.com"),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        role: UserRole::User,
        is_active: true,
        email_verified: true,
        claims: serde_json::json!({ "sub": subject }),
        created_at: now,
        updated_at: now,
        last_login_at: None,
    }
}

/// Session blob for an in-flight sign-in handshake.
pub fn pending_session(verifier: &str, state: &str) -> SessionData {
    SessionData {
        handshake: Some(PendingHandshake {
            code_verifier: verifier.to_string(),
            csrf_state: state.to_string(),
        }),
        principal: None,
    }
}

/// Session blob for a signed-in principal.
pub fn authenticated_session(user: &UserRecord) -> SessionData {
    SessionData { handshake: None, principal: Some(Principal::from_user(user)) }
}
