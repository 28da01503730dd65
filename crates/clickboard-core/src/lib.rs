//! clickboard core: domain records, error types, and formatting rules.
//!
//! This crate defines the click/stat records and the error surface shared by
//! the gateway and its storage backends. It carries no transport, runtime, or
//! database dependencies so backends and tests can reuse it freely.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! All fallible paths must surface as `ClickError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod model;

/// Shared result type.
pub use error::{ClickError, Result};
pub use model::{Click, ClickView, Stat};
