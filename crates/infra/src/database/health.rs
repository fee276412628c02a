//! Readiness probes over the SQLite database.

use std::sync::Arc;

use anteroom_core::HealthPort;
use anteroom_domain::{AnteroomError, Result};
use async_trait::async_trait;
use rusqlite::params;
use tokio::task;

use super::manager::DbManager;
use crate::errors::InfraError;

/// SQLite-backed implementation of [`HealthPort`].
///
/// `check_database` verifies pool connectivity; `check_sessions` verifies
/// that the session table is present and queryable, which also fails when
/// migrations have not run.
pub struct SqliteHealthAdapter {
    db: Arc<DbManager>,
}

impl SqliteHealthAdapter {
    /// Create a new adapter over the shared database manager.
    pub fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HealthPort for SqliteHealthAdapter {
    async fn check_database(&self) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || db.health_check()).await.map_err(map_join_error)?
    }

    async fn check_sessions(&self) -> Result<()> {
        let db = Arc::clone(&self.db);
        task::spawn_blocking(move || -> Result<()> {
            let conn = db.get_connection()?;
            conn.query_row("SELECT COUNT(*) FROM sessions", params![], |row| {
                row.get::<_, i64>(0)
            })
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
