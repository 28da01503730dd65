use std::net::SocketAddr;

use serde::Deserialize;
use clickboard_core::error::{ClickError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub database: DatabaseSection,

    #[serde(default)]
    pub api: ApiSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            database: DatabaseSection::default(),
            api: ApiSection::default(),
            metrics: MetricsSection::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ClickError::Config(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.database.validate()?;
        self.api.validate()?;
        self.metrics.validate()?;

        Ok(())
    }
}

/// What `GET /` serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Landing {
    /// The bundled click page.
    #[default]
    Page,
    /// A small JSON banner, for API-only deployments.
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    #[serde(default)]
    pub landing: Landing,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            landing: Landing::default(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            ClickError::Config(format!(
                "server.listen must be a valid socket address, got {:?}",
                self.listen
            ))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseSection {
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_acquire_timeout_ms")]
    pub acquire_timeout_ms: u64,

    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,

    /// Run `CREATE TABLE IF NOT EXISTS clicks` at startup.
    #[serde(default)]
    pub ensure_schema: bool,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            min_connections: default_min_connections(),
            max_connections: default_max_connections(),
            acquire_timeout_ms: default_acquire_timeout_ms(),
            query_timeout_ms: default_query_timeout_ms(),
            ensure_schema: false,
        }
    }
}

impl DatabaseSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.max_connections) {
            return Err(ClickError::Config(
                "database.max_connections must be between 1 and 100".into(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(ClickError::Config(
                "database.min_connections must not exceed max_connections".into(),
            ));
        }
        if !(100..=60000).contains(&self.acquire_timeout_ms) {
            return Err(ClickError::Config(
                "database.acquire_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        if !(100..=60000).contains(&self.query_timeout_ms) {
            return Err(ClickError::Config(
                "database.query_timeout_ms must be between 100 and 60000".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSection {
    /// Rows returned by `GET /clicks`.
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u32,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
        }
    }
}

impl ApiSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=1000).contains(&self.recent_limit) {
            return Err(ClickError::Config(
                "api.recent_limit must be between 1 and 1000".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Upper bounds (seconds) of the request duration histogram.
    #[serde(default = "default_duration_buckets")]
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            duration_buckets: default_duration_buckets(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if self.duration_buckets.is_empty() {
            return Err(ClickError::Config(
                "metrics.duration_buckets must not be empty".into(),
            ));
        }
        let positive = self.duration_buckets.iter().all(|b| b.is_finite() && *b > 0.0);
        let increasing = self.duration_buckets.windows(2).all(|w| w[0] < w[1]);
        if !positive || !increasing {
            return Err(ClickError::Config(
                "metrics.duration_buckets must be positive and strictly increasing".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8087".into()
}
fn default_min_connections() -> u32 {
    1
}
fn default_max_connections() -> u32 {
    10
}
fn default_acquire_timeout_ms() -> u64 {
    5000
}
fn default_query_timeout_ms() -> u64 {
    5000
}
fn default_recent_limit() -> u32 {
    10
}
fn default_duration_buckets() -> Vec<f64> {
    vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0]
}
