//! PostgreSQL click store.
//!
//! Each operation is a single auto-committed statement holding one pooled
//! connection, bounded by `query_timeout` on top of the pool's acquire
//! timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::postgres::PgPool;

use clickboard_core::error::{ClickError, Result};
use clickboard_core::model::{Click, Stat};

use crate::config::DatabaseSection;
use crate::obs::ServiceMetrics;
use crate::store::{pool, ClickStore};

const INSERT_CLICK: &str = "INSERT INTO clicks (button_id) VALUES ($1)";
const SELECT_RECENT: &str =
    "SELECT button_id, clicked_at FROM clicks ORDER BY clicked_at DESC LIMIT $1";
const SELECT_COUNTS: &str =
    "SELECT button_id, COUNT(*) AS count FROM clicks GROUP BY button_id ORDER BY count DESC";
const PING: &str = "SELECT 1";
const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS clicks (\
    button_id TEXT NOT NULL, \
    clicked_at TIMESTAMP NOT NULL DEFAULT NOW())";

pub struct PgClickStore {
    pool: PgPool,
    query_timeout: Duration,
    metrics: Arc<ServiceMetrics>,
}

impl PgClickStore {
    pub fn new(pool: PgPool, query_timeout: Duration, metrics: Arc<ServiceMetrics>) -> Self {
        Self { pool, query_timeout, metrics }
    }

    /// Build the pool and wrap it.
    pub fn connect(cfg: &DatabaseSection, url: &str, metrics: Arc<ServiceMetrics>) -> Result<Self> {
        let pool = pool::connect(cfg, url, Arc::clone(&metrics))?;
        Ok(Self::new(pool, Duration::from_millis(cfg.query_timeout_ms), metrics))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `clicks` table when it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        self.timed("schema", sqlx::query(CREATE_TABLE).execute(&self.pool))
            .await
            .map(|_| ())
    }

    async fn timed<T, F>(&self, query_type: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = std::result::Result<T, sqlx::Error>> + Send,
    {
        let start = Instant::now();
        let out = tokio::time::timeout(self.query_timeout, fut).await;
        self.metrics.observe_query(query_type, start.elapsed());

        match out {
            Ok(Ok(v)) => Ok(v),
            Ok(Err(e)) => Err(map_sqlx(query_type, e)),
            Err(_) => Err(ClickError::Timeout(format!(
                "{query_type} exceeded {}ms",
                self.query_timeout.as_millis()
            ))),
        }
    }
}

fn map_sqlx(query_type: &str, e: sqlx::Error) -> ClickError {
    match e {
        sqlx::Error::PoolTimedOut => {
            ClickError::Timeout(format!("{query_type}: pool acquire timed out"))
        }
        other => ClickError::Storage(format!("{query_type}: {other}")),
    }
}

#[async_trait]
impl ClickStore for PgClickStore {
    async fn record_click(&self, button_id: &str) -> Result<()> {
        self.timed("insert", sqlx::query(INSERT_CLICK).bind(button_id).execute(&self.pool))
            .await
            .map(|_| ())
    }

    async fn recent_clicks(&self, limit: u32) -> Result<Vec<Click>> {
        let rows: Vec<(String, NaiveDateTime)> = self
            .timed(
                "recent",
                sqlx::query_as::<_, (String, NaiveDateTime)>(SELECT_RECENT)
                    .bind(i64::from(limit))
                    .fetch_all(&self.pool),
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|(button_id, clicked_at)| Click { button_id, clicked_at })
            .collect())
    }

    async fn click_counts(&self) -> Result<Vec<Stat>> {
        let rows: Vec<(String, i64)> = self
            .timed("stats", sqlx::query_as::<_, (String, i64)>(SELECT_COUNTS).fetch_all(&self.pool))
            .await?;

        Ok(rows
            .into_iter()
            .map(|(button_id, count)| Stat { button_id, count })
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        self.timed("ping", sqlx::query(PING).execute(&self.pool))
            .await
            .map(|_| ())
    }

    async fn close(&self) {
        pool::close(&self.pool).await;
    }
}
