//! Runtime adapters behind the scanner's outbound ports
//!
//! Everything filesystem- or wiring-specific lives here: sidecar
//! readers for items and rules, the processed-file registry over a KV
//! store, and the bridges that hand scanner dispatches to the real
//! engines, repository, and ledger.

pub mod bridge;
pub mod extractor;
pub mod producer;
pub mod registry;

pub use bridge::{
    EngineBridge, LedgerBridge, RepoProtegeRuleSource, RepoRuleSource, SharedPeriodLedger,
};
pub use extractor::DirScheduleExtractor;
pub use producer::JsonLineItemProducer;
pub use registry::{KvProcessedRegistry, PROCESSED_KEY_PREFIX};
