//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! Required:
//! - `ANTEROOM_AUTH_AUTHORITY`: Identity-provider host
//! - `ANTEROOM_AUTH_TENANT_ID`: Provider tenant id
//! - `ANTEROOM_AUTH_CLIENT_ID`: OAuth client id
//! - `ANTEROOM_AUTH_CLIENT_SECRET`: OAuth client secret
//! - `ANTEROOM_AUTH_REDIRECT_URI`: Registered callback URI
//! - `ANTEROOM_FRONTEND_URL`: Browser application base URL
//! - `ANTEROOM_SESSION_SECRET`: Cookie signing secret (at least 32 chars)
//! - `ANTEROOM_DB_PATH`: Database file path
//!
//! Optional (with defaults):
//! - `ANTEROOM_SESSION_COOKIE_NAME` (`anteroom.session`)
//! - `ANTEROOM_SESSION_TTL_HOURS` (24)
//! - `ANTEROOM_DB_POOL_SIZE` (8)
//! - `ANTEROOM_SERVER_HOST` (127.0.0.1)
//! - `ANTEROOM_SERVER_PORT` (3001)
//! - `ANTEROOM_ENV` (`development`)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./anteroom.json` or `./anteroom.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};

use anteroom_domain::{
    AnteroomError, AppConfig, DatabaseConfig, ProviderSettings, Result, ServerConfig,
    SessionConfig,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If any required
/// variables are missing, falls back to loading from a config file. The
/// resulting configuration is validated before it is returned, so a
/// successful load is safe to boot with.
///
/// # Errors
/// Returns `AnteroomError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing or fail validation
pub fn load() -> Result<AppConfig> {
    let config = match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)?
        }
    };

    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// All required environment variables must be present. Returns an error
/// if any are missing. The result is not yet validated; [`load`] runs
/// [`AppConfig::validate`] after this step.
///
/// # Environment Variables
/// See module documentation for the complete list.
///
/// # Errors
/// Returns `AnteroomError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<AppConfig> {
    let authority = env_var("ANTEROOM_AUTH_AUTHORITY")?;
    let tenant_id = env_var("ANTEROOM_AUTH_TENANT_ID")?;
    let client_id = env_var("ANTEROOM_AUTH_CLIENT_ID")?;
    let client_secret = env_var("ANTEROOM_AUTH_CLIENT_SECRET")?;
    let redirect_uri = env_var("ANTEROOM_AUTH_REDIRECT_URI")?;
    let frontend_url = env_var("ANTEROOM_FRONTEND_URL")?;
    let session_secret = env_var("ANTEROOM_SESSION_SECRET")?;
    let db_path = env_var("ANTEROOM_DB_PATH")?;

    let cookie_name =
        env_or("ANTEROOM_SESSION_COOKIE_NAME", "anteroom.session");
    let ttl_hours = env_parse::<u64>("ANTEROOM_SESSION_TTL_HOURS", 24)?;
    let pool_size = env_parse::<u32>("ANTEROOM_DB_POOL_SIZE", 8)?;
    let host = env_or("ANTEROOM_SERVER_HOST", "127.0.0.1");
    let port = env_parse::<u16>("ANTEROOM_SERVER_PORT", 3001)?;
    let environment = env_or("ANTEROOM_ENV", "development");

    Ok(AppConfig {
        provider: ProviderSettings { authority, tenant_id, client_id, client_secret, redirect_uri },
        server: ServerConfig { host, port },
        database: DatabaseConfig { path: db_path, pool_size },
        session: SessionConfig { secret: session_secret, cookie_name, ttl_hours },
        frontend_url,
        environment,
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `AnteroomError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AnteroomError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AnteroomError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AnteroomError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Arguments
/// * `contents` - File contents as string
/// * `path` - Path to the file (for format detection and error messages)
///
/// # Errors
/// Returns `AnteroomError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AnteroomError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AnteroomError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(AnteroomError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory (`./config.{json,toml}`,
///    `./anteroom.{json,toml}`)
/// 2. Parent directories (up to 2 levels)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    // Try current working directory
    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(vec![
            cwd.join("config.json"),
            cwd.join("config.toml"),
            cwd.join("anteroom.json"),
            cwd.join("anteroom.toml"),
            cwd.join("../config.json"),
            cwd.join("../config.toml"),
            cwd.join("../../config.json"),
            cwd.join("../../config.toml"),
        ]);
    }

    // Try relative to executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(vec![
                exe_dir.join("config.json"),
                exe_dir.join("config.toml"),
                exe_dir.join("anteroom.json"),
                exe_dir.join("anteroom.toml"),
            ]);
        }
    }

    // Return first existing candidate
    candidates.into_iter().find(|path| path.exists())
}

/// Get required environment variable
///
/// # Errors
/// Returns `AnteroomError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        AnteroomError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Get environment variable with a default when unset
fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse environment variable as a number, with a default when unset
///
/// # Errors
/// Returns `AnteroomError::Config` when the variable is set but does not
/// parse.
fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| AnteroomError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}
