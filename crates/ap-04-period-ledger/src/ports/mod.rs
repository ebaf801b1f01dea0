//! Port definitions for the Period Credit Ledger.

pub mod inbound;
pub mod outbound;

pub use inbound::PeriodLedgerApi;
pub use outbound::{BatchOperation, InMemoryKVStore, KeyValueStore};
