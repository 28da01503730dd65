//! Top-level facade crate for clickboard.
//!
//! Re-exports the core types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use clickboard_core::*;
}

pub mod gateway {
    pub use clickboard_gateway::*;
}
