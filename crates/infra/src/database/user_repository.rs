//! User repository implementation using SQLite
//!
//! Provides persistence for user records reconciled from the identity
//! provider.

use std::sync::Arc;

use anteroom_core::user::ports::UserRepository as UserRepositoryPort;
use anteroom_domain::{AnteroomError, ProfileUpdate, Result as DomainResult, UserRecord, UserRole};
use async_trait::async_trait;
use rusqlite::{params, Row};
use tokio::task;

use super::manager::DbManager;
use crate::errors::InfraError;

const USER_COLUMNS: &str = "id, subject_id, email, first_name, last_name, role, is_active,
                            email_verified, claims, created_at, updated_at, last_login_at";

/// SQLite-backed implementation of `UserRepository`
pub struct SqliteUserRepository {
    db: Arc<DbManager>,
}

impl SqliteUserRepository {
    /// Create a new repository instance
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepositoryPort for SqliteUserRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<UserRecord>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<UserRecord>> {
            let conn = db.get_connection()?;

            let result = conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![&id],
                map_user_row,
            );

            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(InfraError::from(err).into()),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn find_by_subject(&self, subject_id: &str) -> DomainResult<Option<UserRecord>> {
        let db = Arc::clone(&self.db);
        let subject_id = subject_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<UserRecord>> {
            let conn = db.get_connection()?;

            let result = conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE subject_id = ?1"),
                params![&subject_id],
                map_user_row,
            );

            match result {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(InfraError::from(err).into()),
            }
        })
        .await
        .map_err(map_join_error)?
    }

    async fn create(&self, user: &UserRecord) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let user = user.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let claims = serde_json::to_string(&user.claims).map_err(InfraError::from)?;

            // The UNIQUE index on subject_id surfaces a concurrent first
            // sign-in as ReconciliationConflict via the error conversion.
            conn.execute(
                "INSERT INTO users (
                    id, subject_id, email, first_name, last_name, role, is_active,
                    email_verified, claims, created_at, updated_at, last_login_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    &user.id,
                    &user.subject_id,
                    &user.email,
                    &user.first_name,
                    &user.last_name,
                    user.role.as_str(),
                    user.is_active,
                    user.email_verified,
                    &claims,
                    user.created_at,
                    user.updated_at,
                    user.last_login_at,
                ],
            )
            .map_err(InfraError::from)?;

            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update_claims(&self, id: &str, claims: &serde_json::Value) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();
        let claims = claims.clone();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let claims = serde_json::to_string(&claims).map_err(InfraError::from)?;
            let now = chrono::Utc::now().timestamp_millis();

            conn.execute(
                "UPDATE users SET claims = ?1, updated_at = ?2 WHERE id = ?3",
                params![&claims, now, &id],
            )
            .map_err(InfraError::from)?;

            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update_last_login(&self, id: &str, at: i64) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;

            conn.execute(
                "UPDATE users SET last_login_at = ?1, updated_at = ?1 WHERE id = ?2",
                params![at, &id],
            )
            .map_err(InfraError::from)?;

            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> DomainResult<Option<UserRecord>> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();
        let update = update.clone();

        task::spawn_blocking(move || -> DomainResult<Option<UserRecord>> {
            let conn = db.get_connection()?;
            let now = chrono::Utc::now().timestamp_millis();

            let affected = conn
                .execute(
                    "UPDATE users SET
                        first_name = COALESCE(?1, first_name),
                        last_name  = COALESCE(?2, last_name),
                        email      = COALESCE(?3, email),
                        updated_at = ?4
                     WHERE id = ?5",
                    params![&update.first_name, &update.last_name, &update.email, now, &id],
                )
                .map_err(InfraError::from)?;

            if affected == 0 {
                return Ok(None);
            }

            let user = conn
                .query_row(
                    &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                    params![&id],
                    map_user_row,
                )
                .map_err(InfraError::from)?;

            Ok(Some(user))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn deactivate(&self, id: &str) -> DomainResult<bool> {
        let db = Arc::clone(&self.db);
        let id = id.to_string();

        task::spawn_blocking(move || -> DomainResult<bool> {
            let conn = db.get_connection()?;
            let now = chrono::Utc::now().timestamp_millis();

            let affected = conn
                .execute(
                    "UPDATE users SET is_active = 0, updated_at = ?1 WHERE id = ?2",
                    params![now, &id],
                )
                .map_err(InfraError::from)?;

            Ok(affected > 0)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn list_active(&self) -> DomainResult<Vec<UserRecord>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<UserRecord>> {
            let conn = db.get_connection()?;

            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {USER_COLUMNS} FROM users
                     WHERE is_active = 1
                     ORDER BY created_at DESC"
                ))
                .map_err(InfraError::from)?;

            let rows = stmt.query_map([], map_user_row).map_err(InfraError::from)?;

            let mut users = Vec::new();
            for row in rows {
                users.push(row.map_err(InfraError::from)?);
            }
            Ok(users)
        })
        .await
        .map_err(map_join_error)?
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Map a row to a UserRecord
fn map_user_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    let role_text: String = row.get(5)?;
    let role = role_text.parse::<UserRole>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let claims_text: String = row.get(8)?;
    let claims: serde_json::Value = serde_json::from_str(&claims_text).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(UserRecord {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        email: row.get(2)?,
        first_name: row.get(3)?,
        last_name: row.get(4)?,
        role,
        is_active: row.get(6)?,
        email_verified: row.get(7)?,
        claims,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
        last_login_at: row.get(11)?,
    })
}

fn map_join_error(err: task::JoinError) -> AnteroomError {
    AnteroomError::Internal(format!("Task join error: {err}"))
}

// =============================================================================
// Tests
// =============================================================================
