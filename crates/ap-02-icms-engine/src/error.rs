//! Error types for the ICMS apportionment engine

use thiserror::Error;

/// Errors the engine can report.
///
/// An item without a matching rule is NOT an error (it falls back to
/// `SEM_REGRA`); only a rule set that cannot be obtained at all is, and
/// the service converts that into a result with status `erro` rather
/// than letting it escape the pipeline.
#[derive(Debug, Clone, Error)]
pub enum IcmsError {
    /// The rule source could not provide rules for the company.
    #[error("Rule set unavailable for company {company_id}: {message}")]
    RuleSetUnavailable {
        /// Company whose rules were requested
        company_id: String,
        /// Underlying cause, as reported by the source
        message: String,
    },
}
