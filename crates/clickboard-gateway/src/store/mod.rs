//! Click persistence.
//!
//! Handlers only see the [`ClickStore`] trait. Production wires
//! [`PgClickStore`] over a pool from [`pool::connect`]; tests use
//! [`MemoryClickStore`].

pub mod memory;
pub mod pool;
pub mod postgres;

use async_trait::async_trait;

use clickboard_core::error::Result;
use clickboard_core::model::{Click, Stat};

pub use memory::MemoryClickStore;
pub use postgres::PgClickStore;

#[async_trait]
pub trait ClickStore: Send + Sync {
    /// Persist one click; the timestamp is assigned by storage.
    async fn record_click(&self, button_id: &str) -> Result<()>;

    /// Up to `limit` clicks, most recent first.
    async fn recent_clicks(&self, limit: u32) -> Result<Vec<Click>>;

    /// One row per distinct button, highest count first.
    /// Order among equal counts is unspecified.
    async fn click_counts(&self) -> Result<Vec<Stat>>;

    /// Trivial round trip used by `/health`.
    async fn ping(&self) -> Result<()>;

    /// Release backing resources. Best-effort; never fails.
    async fn close(&self) {}
}
