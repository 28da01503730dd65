//! Connection pool provider.
//!
//! One pool per process, built at startup and shared by cloning the handle.
//! Physical connections are opened lazily, so a database that is down at boot
//! only shows up as an unhealthy `/health`, not as a crash.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use clickboard_core::error::{ClickError, Result};

use crate::config::DatabaseSection;
use crate::obs::ServiceMetrics;

pub fn connect(cfg: &DatabaseSection, url: &str, metrics: Arc<ServiceMetrics>) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .min_connections(cfg.min_connections)
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_millis(cfg.acquire_timeout_ms))
        .after_connect(move |_conn, _meta| {
            let metrics = Arc::clone(&metrics);
            Box::pin(async move {
                metrics.connection_opened();
                tracing::debug!("database connection opened");
                Ok(())
            })
        })
        .connect_lazy(url)
        .map_err(|e| ClickError::Config(format!("invalid database url: {e}")))?;

    tracing::info!(
        min = cfg.min_connections,
        max = cfg.max_connections,
        acquire_timeout_ms = cfg.acquire_timeout_ms,
        "database pool created"
    );
    Ok(pool)
}

/// Close all physical connections. Waits for checked-out connections to return.
pub async fn close(pool: &PgPool) {
    if !pool.is_closed() {
        pool.close().await;
        tracing::info!("database pool closed");
    }
}
