//! Inbound Ports (Driving Ports)
//!
//! The API that the PROTEGE engine and the runtime use to interact with
//! the ledger.

use shared_types::Period;

use crate::domain::PeriodCreditEntry;
use crate::error::LedgerError;

/// Primary ledger API (Driving Port)
pub trait PeriodLedgerApi: Send + Sync {
    /// Record a 2%-track payment for a company and period.
    ///
    /// Overwrites any previous entry for the same key; a recomputed period
    /// replaces its earlier payment rather than accumulating.
    fn record_payment(&mut self, entry: PeriodCreditEntry) -> Result<(), LedgerError>;

    /// Credit available to `period` from the payment recorded for it.
    ///
    /// An absent entry is a legitimate zero (first computed period, or the
    /// prior period simply had no 2%-track activity), not an error.
    fn credit_for(&self, company_id: &str, period: Period) -> Result<f64, LedgerError>;

    /// Like [`credit_for`](Self::credit_for), but degrades store failures
    /// to `0.0` after logging a warning. Computation proceeds without the
    /// credit rather than aborting.
    fn credit_or_zero(&self, company_id: &str, period: Period) -> f64;

    /// Fetch the full entry recorded for a company and period, if any.
    fn entry_for(
        &self,
        company_id: &str,
        period: Period,
    ) -> Result<Option<PeriodCreditEntry>, LedgerError>;

    /// Every entry recorded for a company, unordered.
    fn entries_for_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<PeriodCreditEntry>, LedgerError>;
}
