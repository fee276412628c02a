//! Anteroom - OAuth2 + PKCE sign-in service
//!
//! Main entry point for the HTTP server.

use anteroom_lib::{routes, AppContext};
use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables from .env file
    match dotenvy::dotenv() {
        Ok(path) => tracing::info!(path = %path.display(), "loaded .env file"),
        Err(_) => tracing::debug!("no .env file found"),
    }

    // Load and validate configuration (fatal on failure)
    let config = anteroom_infra::config::load()?;
    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(environment = %config.environment, "starting anteroom on {}", bind_address);

    // Initialize application context: database, migrations, services
    let context = AppContext::from_config(config).await?;

    // Build router
    let app = routes::router(context);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("server listening on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    // An uninstallable handler must never resolve its branch, or the select
    // below would shut the server down immediately.
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("graceful shutdown initiated");
}
