//! Metrics hooks for apportionment runs

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for the apportionment hot path
///
/// Thread-safe counters for monitoring run volume and fallback rates.
#[derive(Default)]
pub struct IcmsMetrics {
    /// Completed apportionment runs
    pub runs_completed: AtomicU64,
    /// Runs reported with status `erro`
    pub runs_failed: AtomicU64,
    /// Items apportioned across all runs
    pub items_apportioned: AtomicU64,
    /// Items that fell back to `SEM_REGRA`
    pub fallback_items: AtomicU64,
}

impl IcmsMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_run(&self, items: u64, fallbacks: u64) {
        self.runs_completed.fetch_add(1, Ordering::Relaxed);
        self.items_apportioned.fetch_add(items, Ordering::Relaxed);
        self.fallback_items.fetch_add(fallbacks, Ordering::Relaxed);
    }

    pub fn record_failed_run(&self) {
        self.runs_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> IcmsMetricsSnapshot {
        IcmsMetricsSnapshot {
            runs_completed: self.runs_completed.load(Ordering::Relaxed),
            runs_failed: self.runs_failed.load(Ordering::Relaxed),
            items_apportioned: self.items_apportioned.load(Ordering::Relaxed),
            fallback_items: self.fallback_items.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.runs_completed.store(0, Ordering::Relaxed);
        self.runs_failed.store(0, Ordering::Relaxed);
        self.items_apportioned.store(0, Ordering::Relaxed);
        self.fallback_items.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default)]
pub struct IcmsMetricsSnapshot {
    pub runs_completed: u64,
    pub runs_failed: u64,
    pub items_apportioned: u64,
    pub fallback_items: u64,
}
