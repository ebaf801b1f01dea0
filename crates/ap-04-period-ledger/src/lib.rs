//! # Period Credit Ledger (ap-04)
//!
//! The Period Credit Ledger is the durable bookkeeping layer for PROTEGE
//! 2%-track payments. What a company pays under the 2% track in one period
//! is exactly the credit it may consume in the next, so the value must
//! survive process restarts and arrive at the next computation unchanged.
//!
//! ## Key Layout
//!
//! ```text
//! protege2:{company}:{period} -> bincode(PeriodCreditEntry)
//! ```
//!
//! ## Degradation Contract
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | Entry absent | Credit is `0.0` (legitimate: first period, or no 2% activity) |
//! | Store read fails | `credit_or_zero` logs a warning and returns `0.0` |
//! | Entry undecodable | `credit_for` errors; `credit_or_zero` degrades to `0.0` |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Entry type and key construction
//! - `ports/` - Port traits (inbound API, outbound key-value SPI)
//! - `service/` - Ledger service implementing the API
//! - `adapters/` - File-backed store and process lock
//!
//! ## Usage
//!
//! ```ignore
//! use ap_04_period_ledger::{FileBackedKVStore, PeriodCreditLedger, PeriodLedgerApi, StoreLock};
//!
//! let _lock = StoreLock::acquire(data_dir)?;
//! let mut ledger = PeriodCreditLedger::new(FileBackedKVStore::new(data_dir.join("ledger.db")));
//!
//! ledger.record_payment(entry)?;
//! let credit = ledger.credit_or_zero("06354976000141", period);
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use adapters::{FileBackedKVStore, LockError, StoreLock};
pub use domain::{company_prefix, credit_key, PeriodCreditEntry, CREDIT_KEY_PREFIX};
pub use error::{KVStoreError, LedgerError};
pub use metrics::{LedgerMetrics, LedgerMetricsSnapshot};
pub use ports::{BatchOperation, InMemoryKVStore, KeyValueStore, PeriodLedgerApi};
pub use service::PeriodCreditLedger;
