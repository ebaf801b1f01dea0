//! Metrics hooks for ledger operations

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for ledger operations
///
/// Thread-safe counters for monitoring ledger traffic and degradations.
#[derive(Default)]
pub struct LedgerMetrics {
    /// Total payments recorded
    pub payments_recorded: AtomicU64,
    /// Total credit lookups that found an entry
    pub credits_served: AtomicU64,
    /// Total credit lookups that found nothing (legitimate zeros)
    pub credit_misses: AtomicU64,
    /// Total reads degraded to zero because the store failed
    pub degraded_reads: AtomicU64,
}

impl LedgerMetrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_payment(&self) {
        self.payments_recorded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_credit_hit(&self) {
        self.credits_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_credit_miss(&self) {
        self.credit_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_degraded_read(&self) {
        self.degraded_reads.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> LedgerMetricsSnapshot {
        LedgerMetricsSnapshot {
            payments_recorded: self.payments_recorded.load(Ordering::Relaxed),
            credits_served: self.credits_served.load(Ordering::Relaxed),
            credit_misses: self.credit_misses.load(Ordering::Relaxed),
            degraded_reads: self.degraded_reads.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.payments_recorded.store(0, Ordering::Relaxed);
        self.credits_served.store(0, Ordering::Relaxed);
        self.credit_misses.store(0, Ordering::Relaxed);
        self.degraded_reads.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default)]
pub struct LedgerMetricsSnapshot {
    pub payments_recorded: u64,
    pub credits_served: u64,
    pub credit_misses: u64,
    pub degraded_reads: u64,
}
