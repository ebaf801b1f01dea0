//! Durable processed-path registry
//!
//! Persists the scanner's processed set through the ledger crate's
//! `KeyValueStore`, so restarts and sibling instances share one
//! dispatch history. Store failures degrade to "not seen": the worst
//! case is a re-dispatch, which the downstream computations tolerate.

use std::path::Path;
use std::sync::Arc;

use ap_01_source_scanner::ProcessedRegistry;
use ap_04_period_ledger::KeyValueStore;
use parking_lot::Mutex;
use tracing::warn;

/// Key prefix for processed-path records; keeps them disjoint from any
/// other records sharing the store.
pub const PROCESSED_KEY_PREFIX: &str = "processed:";

/// Processed registry over any [`KeyValueStore`].
pub struct KvProcessedRegistry<KV: KeyValueStore> {
    store: Arc<Mutex<KV>>,
}

impl<KV: KeyValueStore> KvProcessedRegistry<KV> {
    /// Wrap a shared store. Several registries (one per instance) may
    /// share the same store handle.
    pub fn new(store: Arc<Mutex<KV>>) -> Self {
        Self { store }
    }

    fn key(path: &Path) -> Vec<u8> {
        let mut key = PROCESSED_KEY_PREFIX.as_bytes().to_vec();
        key.extend_from_slice(path.to_string_lossy().as_bytes());
        key
    }
}

impl<KV: KeyValueStore> ProcessedRegistry for KvProcessedRegistry<KV> {
    fn seen(&self, path: &Path) -> bool {
        match self.store.lock().exists(&Self::key(path)) {
            Ok(seen) => seen,
            Err(e) => {
                warn!(
                    "[apura] ⚠️ Processed lookup failed for {}: {}. Treating as unseen",
                    path.display(),
                    e
                );
                false
            }
        }
    }

    fn mark_seen(&self, path: &Path) {
        if let Err(e) = self.store.lock().put(&Self::key(path), &[1]) {
            warn!(
                "[apura] ⚠️ Processed record failed for {}: {}. File may re-dispatch",
                path.display(),
                e
            );
        }
    }

    fn clear(&self) {
        let mut store = self.store.lock();
        let keys = match store.prefix_scan(PROCESSED_KEY_PREFIX.as_bytes()) {
            Ok(entries) => entries.into_iter().map(|(key, _)| key).collect::<Vec<_>>(),
            Err(e) => {
                warn!("[apura] ⚠️ Processed scan failed: {}. Nothing cleared", e);
                return;
            }
        };
        for key in keys {
            if let Err(e) = store.delete(&key) {
                warn!("[apura] ⚠️ Processed delete failed: {}", e);
            }
        }
    }

    fn len(&self) -> usize {
        match self.store.lock().prefix_scan(PROCESSED_KEY_PREFIX.as_bytes()) {
            Ok(entries) => entries.len(),
            Err(e) => {
                warn!("[apura] ⚠️ Processed scan failed: {}. Reporting zero", e);
                0
            }
        }
    }
}
