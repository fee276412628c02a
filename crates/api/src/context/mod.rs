//! Application context - dependency injection container

use std::sync::Arc;

use anteroom_core::{AuthService, HealthPort, SessionStore, UserService};
use anteroom_domain::{AppConfig, Result};
use anteroom_infra::database::{
    DbManager, SqliteHealthAdapter, SqliteSessionStore, SqliteUserRepository,
};
use anteroom_infra::identity::ProviderGateway;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

/// Type alias for session store trait object
type DynSessionStore = dyn SessionStore + Send + Sync + 'static;

/// Type alias for health port trait object
type DynHealthPort = dyn HealthPort + Send + Sync + 'static;

/// Application context - holds all services and dependencies
///
/// Constructed once in `main` after configuration is loaded and validated;
/// cloning is cheap since every collaborator sits behind an `Arc`.
#[derive(Clone)]
pub struct AppContext {
    // Core services
    pub config: AppConfig,
    pub db: Arc<DbManager>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub sessions: Arc<DynSessionStore>,
    pub health: Arc<DynHealthPort>,

    // Encrypts/authenticates the session cookie jar
    cookie_key: Key,
}

// PrivateCookieJar requires Key to be extractable from state
impl FromRef<AppContext> for Key {
    fn from_ref(context: &AppContext) -> Self {
        context.cookie_key.clone()
    }
}

impl AppContext {
    /// Create a new application context from loaded configuration
    ///
    /// Fail-fast initialization: opens the database, runs migrations,
    /// purges session rows that expired while the service was down, and
    /// wires every service before the server accepts traffic.
    ///
    /// # Errors
    /// Returns `Config` when validation fails, `Database` when the pool or
    /// migrations cannot be set up.
    pub async fn from_config(config: AppConfig) -> Result<Self> {
        // Key::derive_from requires at least 32 bytes of secret;
        // validate() enforces that before any key material is derived.
        config.validate()?;

        // Initialize database and apply migrations
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        // Create session store and drop stale rows
        let session_store = Arc::new(SqliteSessionStore::new(db.clone(), config.session.ttl_hours));
        let purged = session_store.purge_expired().await?;
        if purged > 0 {
            tracing::info!(purged, "purged expired sessions at startup");
        }
        let sessions: Arc<DynSessionStore> = session_store;

        // Create user slice
        let repository = Arc::new(SqliteUserRepository::new(db.clone()));
        let users = Arc::new(UserService::new(repository));

        // Create sign-in flow service around the provider gateway
        let identity = Arc::new(ProviderGateway::new(&config.provider));
        let auth = Arc::new(AuthService::new(identity, sessions.clone(), users.clone()));

        // Create health adapter
        let health: Arc<DynHealthPort> = Arc::new(SqliteHealthAdapter::new(db.clone()));

        let cookie_key = Key::derive_from(config.session.secret.as_bytes());

        Ok(Self { config, db, auth, users, sessions, health, cookie_key })
    }
}
