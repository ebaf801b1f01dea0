//! # Hierarchical Source Scanner & Classifier (ap-01)
//!
//! Walks a fiscal document tree on a fixed interval, infers company and
//! period from directory names, classifies each file into a processing
//! lane, and dispatches it to the matching engine exactly once. The
//! scanner owns no tax math; it is the front door of the pipeline.
//!
//! ## Pass Pipeline
//!
//! ```text
//! root ──walk──→ regular files ──filter──→ infer ──classify──→ dispatch
//!                 │                         │        │            │
//!            extension +              company/    SPED ─→ produce → ICMS
//!            size cap +               year/month  PROTEGE_SCHEDULE
//!            processed registry       from path     ─→ extract → rules
//!                                                      (+ PROTEGE run)
//!                                                 GENERIC ─→ logged no-op
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Dispatch Once | A path in the processed registry is never re-dispatched |
//! | 2 | Failure Isolation | A per-file error never aborts the pass; the file is retried next pass |
//! | 3 | No Overlap | The pass-in-progress flag skips ticks that would overlap a slow pass |
//! | 4 | Best-Effort Inference | Company, year, and month may each stay unset; handlers cope |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Config, inference, classification, lane types
//! - `ports/` - Port traits (inbound lifecycle, outbound collaborators)
//! - `service/` - Scan pass orchestration and the background loop
//!
//! ## Usage
//!
//! ```ignore
//! use ap_01_source_scanner::{run_scan_loop, ScannerConfig, ScannerService, SourceScannerApi};
//!
//! let service = Arc::new(ScannerService::new(
//!     ScannerConfig::default(),
//!     producer, extractor, icms, protege, configurator, registry,
//! ));
//! tokio::spawn(run_scan_loop(Arc::clone(&service), root, shutdown_rx));
//! ```

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use domain::{
    classify, infer_from_path, PathInference, ScannerConfig, ScannerConfigBuilder, SourceFile,
    SourceLane, MIN_SCAN_INTERVAL_MS,
};
pub use error::ScannerError;
pub use metrics::{ScannerMetrics, ScannerMetricsSnapshot};
pub use ports::inbound::{ScanPassSummary, ScannerStats, SourceScannerApi};
pub use ports::outbound::{
    IcmsExecutor, InMemoryProcessedRegistry, LineItemProducer, ProcessedRegistry, ProtegeExecutor,
    RuleConfigurator, ScheduleExtractor, ScheduleFile,
};
pub use service::{run_scan_loop, ScannerService};
