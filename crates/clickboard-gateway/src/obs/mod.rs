//! In-process request and database metrics.
//!
//! Series live in `DashMap`s keyed by their label set and are created on first
//! observation. Rendering produces the Prometheus text exposition format served
//! by `/metrics`; the request-timing middleware lives in [`track`].

pub mod metrics;
pub mod track;

pub use metrics::{ServiceMetrics, UNKNOWN_ENDPOINT};
