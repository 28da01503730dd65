//! Service config loader (strict parsing).
//!
//! The YAML file carries tuning only; the database URL comes from the
//! `DATABASE_URL` environment variable and never from disk.

pub mod schema;

use std::fs;
use std::io::ErrorKind;

use clickboard_core::error::{ClickError, Result};

pub use schema::{ApiSection, AppConfig, DatabaseSection, Landing, MetricsSection, ServerSection};

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ClickError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

/// Like [`load_from_file`], but a missing file yields the built-in defaults.
pub fn load_or_default(path: &str) -> Result<AppConfig> {
    match fs::read_to_string(path) {
        Ok(s) => load_from_str(&s),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(%path, "config file not found, using defaults");
            Ok(AppConfig::default())
        }
        Err(e) => Err(ClickError::Config(format!("read config failed ({path}): {e}"))),
    }
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    let cfg: AppConfig = serde_yaml::from_str(s)
        .map_err(|e| ClickError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Read the connection string from the process environment.
pub fn database_url() -> Result<String> {
    resolve_database_url(std::env::var(DATABASE_URL_ENV).ok())
}

pub fn resolve_database_url(raw: Option<String>) -> Result<String> {
    match raw.map(|s| s.trim().to_string()) {
        Some(url) if !url.is_empty() => Ok(url),
        _ => Err(ClickError::Config(format!("{DATABASE_URL_ENV} is not set"))),
    }
}
