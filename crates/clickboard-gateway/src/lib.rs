//! clickboard gateway library entry.
//!
//! Wires configuration, the click store, request metrics, and the HTTP routes
//! into one service. Consumed by the binary (`main.rs`) and by integration
//! tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod store;
