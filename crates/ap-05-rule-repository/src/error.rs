//! Error types for the Rule Repository subsystem

use thiserror::Error;

/// Errors that can occur when querying or loading rule sets
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// The company's rule file existed but could not be parsed. Queries
    /// keep failing until a valid configuration replaces the entry.
    #[error("Rule set for {company_id} is unusable: {message}")]
    CompanyPoisoned { company_id: String, message: String },

    #[error("Invalid configuration for {company_id}: {message}")]
    InvalidConfiguration { company_id: String, message: String },

    #[error("Rules directory error: {message}")]
    Io { message: String },
}
