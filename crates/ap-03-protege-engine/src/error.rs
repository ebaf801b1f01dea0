//! Error types for the PROTEGE dual-track engine

use thiserror::Error;

/// Errors the engine can report.
///
/// Only a missing rule set fails a run (as a structured `erro` result,
/// not a propagated error). Ledger trouble never does: reads degrade to
/// zero credit and write failures are logged while the result stands.
#[derive(Debug, Clone, Error)]
pub enum ProtegeError {
    /// The rule source could not provide rules for the company.
    #[error("PROTEGE rule set unavailable for company {company_id}: {message}")]
    RuleSetUnavailable {
        /// Company whose rules were requested
        company_id: String,
        /// Underlying cause, as reported by the source
        message: String,
    },

    /// The credit ledger rejected a payment write.
    #[error("Ledger write failed for {company_id}/{period}: {message}")]
    LedgerWrite {
        /// Company the payment belongs to
        company_id: String,
        /// Period the payment was computed for (YYYYMM)
        period: String,
        /// Underlying cause, as reported by the ledger
        message: String,
    },
}
