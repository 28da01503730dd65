//! Shared error type across clickboard crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Missing or invalid configuration.
    Config,
    /// Storage unreachable or statement failed.
    Storage,
    /// Pool acquisition or statement exceeded its deadline.
    Timeout,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::Config => "CONFIG",
            ClientCode::Storage => "STORAGE",
            ClientCode::Timeout => "TIMEOUT",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ClickError>;

/// Unified error type used by core, storage, and gateway.
#[derive(Debug, Error)]
pub enum ClickError {
    #[error("configuration: {0}")]
    Config(String),
    #[error("storage: {0}")]
    Storage(String),
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl ClickError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            ClickError::Config(_) => ClientCode::Config,
            ClickError::Storage(_) => ClientCode::Storage,
            ClickError::Timeout(_) => ClientCode::Timeout,
            ClickError::Internal(_) => ClientCode::Internal,
        }
    }

    /// Whether the failure came from the storage layer (including deadlines).
    pub fn is_storage(&self) -> bool {
        matches!(self, ClickError::Storage(_) | ClickError::Timeout(_))
    }
}
