//! clickboard gateway
//!
//! - POST /log-click/{button_id}, GET /clicks, GET /stats
//! - GET /health, GET /metrics, GET /
//! - Pool created once at startup, closed after graceful shutdown

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use clickboard_core::error::{ClickError, Result};
use clickboard_gateway::{
    app_state::AppState,
    config,
    obs::ServiceMetrics,
    router,
    store::{ClickStore, PgClickStore},
};

const CONFIG_PATH_ENV: &str = "CLICKBOARD_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "clickboard.yaml".into());
    let cfg = config::load_or_default(&path)?;
    let listen = cfg.server.listen_addr()?;
    let url = config::database_url()?;

    let metrics = Arc::new(ServiceMetrics::new(cfg.metrics.duration_buckets.clone()));
    let pg = PgClickStore::connect(&cfg.database, &url, Arc::clone(&metrics))?;
    if cfg.database.ensure_schema {
        pg.ensure_schema().await?;
        tracing::info!("clicks table ensured");
    }
    let store: Arc<dyn ClickStore> = Arc::new(pg);

    let state = AppState::new(cfg, Arc::clone(&store), metrics);
    let app = router::build_router(state);

    tracing::info!(%listen, "clickboard-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| ClickError::Internal(format!("bind {listen} failed: {e}")))?;

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ClickError::Internal(format!("server failed: {e}")));

    store.close().await;
    tracing::info!("clickboard-gateway stopped");
    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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
    tracing::info!("shutdown signal received");
}
