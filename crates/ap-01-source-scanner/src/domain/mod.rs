//! Pure scanner domain logic (no I/O)

pub mod classify;
pub mod config;
pub mod infer;
pub mod source_file;

pub use classify::{classify, is_schedule_by_name, SCHEDULE_NAME_HINTS, SPED_MARKERS};
pub use config::{ScannerConfig, ScannerConfigBuilder, MIN_SCAN_INTERVAL_MS};
pub use infer::{infer_from_path, PathInference};
pub use source_file::{SourceFile, SourceLane};
