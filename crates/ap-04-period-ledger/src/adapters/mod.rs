//! # Adapters Module
//!
//! Driven-side implementations for the Period Credit Ledger.
//!
//! ## Modules
//!
//! - `file`: Durable file-backed key-value store
//! - `lock`: Store directory process locking (singleton guard)

pub mod file;
pub mod lock;

pub use file::FileBackedKVStore;
pub use lock::{LockError, StoreLock};
