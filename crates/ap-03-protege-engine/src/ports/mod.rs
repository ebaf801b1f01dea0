//! Port definitions (hexagonal architecture)

pub mod inbound;
pub mod outbound;

pub use inbound::ProtegeEngineApi;
pub use outbound::{CreditLedger, InMemoryCreditLedger, ProtegeRuleSource, StaticProtegeRuleSource};
