//! Inbound Ports (Driving Ports)
//!
//! Lifecycle controls the surrounding service exposes to operators:
//! scan, start/stop, stats, clear-processed. Nothing else.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::config::ScannerConfig;

/// Outcome of one scan pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPassSummary {
    /// Pass identifier carried through every log line of the pass.
    pub pass_id: String,
    /// Regular files seen, before any filtering.
    pub discovered: u64,
    /// Files dispatched on the SPED lane.
    pub sped_dispatched: u64,
    /// Files dispatched on the PROTEGE_SCHEDULE lane.
    pub schedules_dispatched: u64,
    /// Files that landed in the GENERIC no-op lane.
    pub generic_files: u64,
    /// Files skipped (already processed, disallowed extension, oversize).
    pub skipped: u64,
    /// Files whose handler failed; retried next pass.
    pub failed: u64,
    /// Wall-clock duration of the pass in milliseconds.
    pub duration_ms: u64,
}

/// Operator-facing scanner state.
#[derive(Debug, Clone)]
pub struct ScannerStats {
    /// Whether scheduled passes currently run.
    pub running: bool,
    /// Whether a pass is executing right now.
    pub pass_in_progress: bool,
    /// Paths in the processed registry.
    pub processed_count: usize,
    /// The active configuration.
    pub config: ScannerConfig,
}

/// Primary scanner API (Driving Port)
#[async_trait]
pub trait SourceScannerApi: Send + Sync {
    /// Run one scan pass over `root`.
    ///
    /// Returns `None` without scanning when the scanner is stopped or
    /// another pass is still in progress (the skipped tick is logged).
    async fn scan(&self, root: &Path) -> Option<ScanPassSummary>;

    /// Resume scheduled passes after a `stop()`.
    fn start(&self);

    /// Halt scheduled passes. An in-flight pass finishes.
    fn stop(&self);

    /// Current stats: running flag, processed count, configuration.
    fn stats(&self) -> ScannerStats;

    /// Forget every processed path so the next pass re-dispatches all
    /// files. Explicit operator action, never automatic.
    fn clear_processed(&self);
}
