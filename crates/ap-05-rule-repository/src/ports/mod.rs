//! Port definitions for the Rule Repository.

pub mod inbound;

pub use inbound::RuleRepositoryApi;
