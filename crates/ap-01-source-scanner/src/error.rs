//! Error types for the source scanner

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while scanning, producing, or dispatching.
///
/// None of these abort a scan pass: the per-file handler catches them,
/// logs, and leaves the file out of the processed registry so the next
/// pass retries it.
#[derive(Debug, Clone, Error)]
pub enum ScannerError {
    /// Filesystem access failed for a path.
    #[error("I/O error at {path}: {message}", path = .path.display())]
    Io {
        /// Path being read when the error occurred
        path: PathBuf,
        /// Underlying cause
        message: String,
    },

    /// The line item producer could not parse a SPED file.
    #[error("Produce failed for {path}: {message}", path = .path.display())]
    Produce {
        /// SPED file handed to the producer
        path: PathBuf,
        /// Underlying cause, as reported by the producer
        message: String,
    },

    /// The schedule extractor could not turn a document into rules.
    #[error("Schedule extraction failed for company {company_id}: {message}")]
    Extraction {
        /// Company the schedule was attributed to
        company_id: String,
        /// Underlying cause, as reported by the extractor
        message: String,
    },

    /// Installing an extracted configuration failed.
    #[error("Configuration apply failed for company {company_id}: {message}")]
    Configure {
        /// Company the configuration targets
        company_id: String,
        /// Underlying cause
        message: String,
    },

    /// A scanner configuration that fails builder validation.
    #[error("Invalid scanner configuration: {0}")]
    InvalidConfig(String),
}
