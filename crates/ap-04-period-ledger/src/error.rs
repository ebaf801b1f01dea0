//! Error types for the Period Credit Ledger subsystem

use thiserror::Error;

/// Errors that can occur during ledger operations
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Store error: {0}")]
    Store(#[from] KVStoreError),

    #[error("Corrupt ledger entry at {key}: {message}")]
    CorruptEntry { key: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Errors from key-value store backends
#[derive(Debug, Clone, Error)]
pub enum KVStoreError {
    #[error("KV store I/O error: {message}")]
    Io { message: String },

    #[error("KV store corruption: {message}")]
    Corruption { message: String },
}
