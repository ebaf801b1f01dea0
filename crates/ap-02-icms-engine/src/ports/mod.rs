//! Port definitions (hexagonal architecture)

pub mod inbound;
pub mod outbound;

pub use inbound::IcmsEngineApi;
pub use outbound::{RuleSource, StaticRuleSource};
