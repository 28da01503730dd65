//! Click records and their JSON shapes.
//!
//! `Click` is what storage returns; `ClickView` is what `/clicks` emits, with
//! the timestamp rendered as `YYYY-MM-DD HH:MM:SS`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Display format for `clicked_at` in API responses.
pub const CLICKED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One persisted button press. `clicked_at` is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Click {
    pub button_id: String,
    pub clicked_at: NaiveDateTime,
}

impl Click {
    pub fn view(&self) -> ClickView {
        ClickView {
            button_id: self.button_id.clone(),
            clicked_at: self.clicked_at.format(CLICKED_AT_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickView {
    pub button_id: String,
    pub clicked_at: String,
}

/// Per-button aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub button_id: String,
    pub count: i64,
}
