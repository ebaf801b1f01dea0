//! # Integration Flows
//!
//! Cross-crate tests driving the scanner with the runtime's real
//! sidecar adapters over real directory trees.

pub mod credit_rollover;
pub mod idempotency;
pub mod pipeline;
