//! Session store implementation using SQLite
//!
//! Durable session rows keyed by the opaque cookie id. Every save refreshes
//! the row's expiry (rolling TTL); expired rows read as absent and are
//! deleted lazily.

use std::sync::Arc;

use anteroom_core::auth::ports::SessionStore as SessionStorePort;
use anteroom_domain::{AnteroomError, Result as DomainResult, SessionData};
use async_trait::async_trait;
use rusqlite::params;
use tokio::task;

use super::manager::DbManager;
use crate::errors::InfraError;

/// SQLite-backed implementation of `SessionStore`
pub struct SqliteSessionStore {
    db: Arc<DbManager>,
    ttl_ms: i64,
}

impl SqliteSessionStore {
    /// Create a new store whose sessions expire `ttl_hours` after the last
    /// write.
    pub fn new(db: Arc<DbManager>, ttl_hours: u64) -> Self {
        Self { db, ttl_ms: (ttl_hours * 60 * 60 * 1000) as i64 }
    }

    /// Delete every expired session row, returning how many were removed.
    ///
    /// Reads already treat expired rows as absent; this reclaims the space
    /// and is run once at startup.
    pub async fn purge_expired(&self) -> DomainResult<usize> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<usize> {
            let conn = db.get_connection()?;
            let now = chrono::Utc::now().timestamp_millis();

            let removed = conn
                .execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])
                .map_err(InfraError::from)?;

            Ok(removed)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl SessionStorePort for SqliteSessionStore {
    async fn load(&self, session_id: &str) -> DomainResult<Option<SessionData>> {
        let db = Arc::clone(&self.db);
        let session_id = session_id.to_string();

        task::spawn_blocking(move || -> DomainResult<Option<SessionData>> {
            let conn = db.get_connection()?;

            let result = conn.query_row(
                "SELECT data, expires_at FROM sessions WHERE id = ?1",
                params![&session_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            );

            let (data, expires_at) = match result {
                Ok(row) => row,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(err) => return Err(InfraError::from(err).into()),
            };

            let now = chrono::Utc::now().timestamp_millis();
            if expires_at <= now {
                conn.execute("DELETE FROM sessions WHERE id = ?1", params![&session_id])
                    .map_err(InfraError::from)?;
                return Ok(None);
            }

            let session: SessionData = serde_json::from_str(&data)
                .map_err(|e| AnteroomError::Database(format!("corrupt session data: {e}")))?;
            Ok(Some(session))
        })
        .await
        .map_err(map_join_error)?
    }

    async fn save(&self, session_id: &str, data: &SessionData) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let session_id = session_id.to_string();
        let data = data.clone();
        let ttl_ms = self.ttl_ms;

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            let blob = serde_json::to_string(&data).map_err(InfraError::from)?;
            let now = chrono::Utc::now().timestamp_millis();

            conn.execute(
                "INSERT INTO sessions (id, data, expires_at, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                    data = excluded.data,
                    expires_at = excluded.expires_at,
                    updated_at = excluded.updated_at",
                params![&session_id, &blob, now + ttl_ms, now],
            )
            .map_err(InfraError::from)?;

            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }

    async fn destroy(&self, session_id: &str) -> DomainResult<()> {
        let db = Arc::clone(&self.db);
        let session_id = session_id.to_string();

        task::spawn_blocking(move || -> DomainResult<()> {
            let conn = db.get_connection()?;
            conn.execute("DELETE FROM sessions WHERE id = ?1", params![&session_id])
                .map_err(InfraError::from)?;
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}

fn map_join_error(err: task::JoinError) -> AnteroomError {
    AnteroomError::Internal(format!("Task join error: {err}"))
}
