//! # Apura Runtime Library
//!
//! This library exposes the runtime's wiring for integration tests.
//! The main entry point is the `main.rs` binary.
//!
//! ## Architectural Patterns
//!
//! - **Hexagonal Architecture**: The scanner drives everything through
//!   its outbound ports; the adapters here implement them
//! - **Ports and Adapters at the edges**: Sidecar files stand in for
//!   the SPED parser and the schedule OCR stage, so the pipeline runs
//!   end to end on plain directories
//! - **One store, one lock**: The period ledger's KV backend is chosen
//!   once at startup and shared behind a single mutex

pub mod adapters;
pub mod config;

use ap_01_source_scanner::{InMemoryProcessedRegistry, ScannerService};

// Re-export key types for convenience
pub use adapters::{
    DirScheduleExtractor, EngineBridge, JsonLineItemProducer, KvProcessedRegistry, LedgerBridge,
    RepoProtegeRuleSource, RepoRuleSource, SharedPeriodLedger, PROCESSED_KEY_PREFIX,
};
pub use config::{
    load_config, ConfigError, LedgerSettings, RulesSettings, RuntimeConfig, ScannerSettings,
    TelemetrySettings,
};

/// The scanner as the binary wires it: sidecar adapters at the file
/// edge, one [`EngineBridge`] behind all three engine ports.
pub type RuntimeScanner = ScannerService<
    JsonLineItemProducer,
    DirScheduleExtractor,
    EngineBridge,
    EngineBridge,
    EngineBridge,
    InMemoryProcessedRegistry,
>;
