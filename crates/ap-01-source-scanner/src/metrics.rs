//! Metrics hooks for scan passes

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for scanner traffic
///
/// Thread-safe counters accumulated across every pass since start (or
/// the last reset).
#[derive(Default)]
pub struct ScannerMetrics {
    /// Passes that acquired the pass flag and began walking
    pub passes_started: AtomicU64,
    /// Passes that ran to completion
    pub passes_completed: AtomicU64,
    /// Regular files seen before filtering
    pub files_discovered: AtomicU64,
    /// Files dispatched on the SPED lane
    pub sped_dispatched: AtomicU64,
    /// Files dispatched on the PROTEGE_SCHEDULE lane
    pub schedules_dispatched: AtomicU64,
    /// Files that landed in the GENERIC no-op lane
    pub generic_files: AtomicU64,
    /// Files skipped (processed already, extension, size)
    pub files_skipped: AtomicU64,
    /// Files whose handler failed
    pub files_failed: AtomicU64,
}

impl ScannerMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_pass_started(&self) {
        self.passes_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pass_completed(&self) {
        self.passes_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_discovered(&self) {
        self.files_discovered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sped(&self) {
        self.sped_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_schedule(&self) {
        self.schedules_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_generic(&self) {
        self.generic_files.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.files_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.files_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> ScannerMetricsSnapshot {
        ScannerMetricsSnapshot {
            passes_started: self.passes_started.load(Ordering::Relaxed),
            passes_completed: self.passes_completed.load(Ordering::Relaxed),
            files_discovered: self.files_discovered.load(Ordering::Relaxed),
            sped_dispatched: self.sped_dispatched.load(Ordering::Relaxed),
            schedules_dispatched: self.schedules_dispatched.load(Ordering::Relaxed),
            generic_files: self.generic_files.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            files_failed: self.files_failed.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.passes_started.store(0, Ordering::Relaxed);
        self.passes_completed.store(0, Ordering::Relaxed);
        self.files_discovered.store(0, Ordering::Relaxed);
        self.sped_dispatched.store(0, Ordering::Relaxed);
        self.schedules_dispatched.store(0, Ordering::Relaxed);
        self.generic_files.store(0, Ordering::Relaxed);
        self.files_skipped.store(0, Ordering::Relaxed);
        self.files_failed.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default)]
pub struct ScannerMetricsSnapshot {
    pub passes_started: u64,
    pub passes_completed: u64,
    pub files_discovered: u64,
    pub sped_dispatched: u64,
    pub schedules_dispatched: u64,
    pub generic_files: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
}
