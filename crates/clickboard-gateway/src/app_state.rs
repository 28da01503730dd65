//! Shared application state for the click service.
//!
//! Built once in `main` (or a test) and cloned into every handler. The store
//! and the metrics registry share the process lifetime.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::obs::ServiceMetrics;
use crate::store::ClickStore;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: AppConfig,
    store: Arc<dyn ClickStore>,
    metrics: Arc<ServiceMetrics>,
}

impl AppState {
    pub fn new(cfg: AppConfig, store: Arc<dyn ClickStore>, metrics: Arc<ServiceMetrics>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cfg, store, metrics }),
        }
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.inner.cfg
    }

    pub fn store(&self) -> &dyn ClickStore {
        self.inner.store.as_ref()
    }

    pub fn metrics(&self) -> &ServiceMetrics {
        &self.inner.metrics
    }
}
