//! Domain types for the Period Credit Ledger.

mod entry;

pub use entry::{company_prefix, credit_key, PeriodCreditEntry, CREDIT_KEY_PREFIX};
