//! # Rule Repository Service
//!
//! In-memory repository of per-company rule sets.

mod repository;

pub use repository::{InMemoryRuleRepository, DEFAULT_COMPANY};
