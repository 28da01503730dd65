//! In-memory click store for tests and local runs without PostgreSQL.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use clickboard_core::error::{ClickError, Result};
use clickboard_core::model::{Click, Stat};

use crate::store::ClickStore;

#[derive(Default)]
pub struct MemoryClickStore {
    rows: Mutex<Vec<Click>>,
    unavailable: AtomicBool,
}

impl MemoryClickStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate losing (or regaining) the database.
    pub fn set_available(&self, available: bool) {
        self.unavailable.store(!available, Ordering::Relaxed);
    }

    fn check(&self) -> Result<()> {
        if self.unavailable.load(Ordering::Relaxed) {
            return Err(ClickError::Storage("store unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ClickStore for MemoryClickStore {
    async fn record_click(&self, button_id: &str) -> Result<()> {
        self.check()?;
        let mut rows = self.rows.lock().await;
        let now = Utc::now().naive_utc();
        // keep clicked_at non-decreasing even if the wall clock steps back
        let clicked_at = rows.last().map_or(now, |last| last.clicked_at.max(now));
        rows.push(Click { button_id: button_id.to_string(), clicked_at });
        Ok(())
    }

    async fn recent_clicks(&self, limit: u32) -> Result<Vec<Click>> {
        self.check()?;
        let rows = self.rows.lock().await;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(rows.iter().rev().take(limit).cloned().collect())
    }

    async fn click_counts(&self) -> Result<Vec<Stat>> {
        self.check()?;
        let rows = self.rows.lock().await;

        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut stats: Vec<Stat> = Vec::new();
        for row in rows.iter() {
            match index.get(row.button_id.as_str()) {
                Some(&i) => stats[i].count += 1,
                None => {
                    index.insert(row.button_id.as_str(), stats.len());
                    stats.push(Stat { button_id: row.button_id.clone(), count: 1 });
                }
            }
        }
        // stable: ties keep first-seen order
        stats.sort_by(|a, b| b.count.cmp(&a.count));
        Ok(stats)
    }

    async fn ping(&self) -> Result<()> {
        self.check()
    }
}
