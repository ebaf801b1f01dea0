//! # Period Credit Ledger Service
//!
//! The main service implementing the ledger API over an injected
//! key-value store.

mod ledger;

pub use ledger::PeriodCreditLedger;
