//! Metrics hooks for PROTEGE runs

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for dual-track computation runs
///
/// Thread-safe counters for monitoring run volume, per-track traffic,
/// and ledger write degradations.
#[derive(Default)]
pub struct ProtegeMetrics {
    /// Completed computation runs
    pub runs_completed: AtomicU64,
    /// Runs reported with status `erro`
    pub runs_failed: AtomicU64,
    /// Items settled on the 15% track
    pub track15_items: AtomicU64,
    /// Items settled on the 2% track
    pub track2_items: AtomicU64,
    /// Payment writes that failed and were degraded to a warning
    pub degraded_writes: AtomicU64,
}

impl ProtegeMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_run(&self, track15_items: u64, track2_items: u64) {
        self.runs_completed.fetch_add(1, Ordering::Relaxed);
        self.track15_items.fetch_add(track15_items, Ordering::Relaxed);
        self.track2_items.fetch_add(track2_items, Ordering::Relaxed);
    }

    pub fn record_failed_run(&self) {
        self.runs_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_degraded_write(&self) {
        self.degraded_writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> ProtegeMetricsSnapshot {
        ProtegeMetricsSnapshot {
            runs_completed: self.runs_completed.load(Ordering::Relaxed),
            runs_failed: self.runs_failed.load(Ordering::Relaxed),
            track15_items: self.track15_items.load(Ordering::Relaxed),
            track2_items: self.track2_items.load(Ordering::Relaxed),
            degraded_writes: self.degraded_writes.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.runs_completed.store(0, Ordering::Relaxed);
        self.runs_failed.store(0, Ordering::Relaxed);
        self.track15_items.store(0, Ordering::Relaxed);
        self.track2_items.store(0, Ordering::Relaxed);
        self.degraded_writes.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default)]
pub struct ProtegeMetricsSnapshot {
    pub runs_completed: u64,
    pub runs_failed: u64,
    pub track15_items: u64,
    pub track2_items: u64,
    pub degraded_writes: u64,
}
