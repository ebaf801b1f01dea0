//! Scanner configuration and validating builder

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ScannerError;

/// Ticks faster than this are a configuration mistake, not a tuning
/// choice.
pub const MIN_SCAN_INTERVAL_MS: u64 = 100;

/// What to scan and how to read the directory tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Extensions analyzed (lowercase, no leading dot); everything else
    /// is skipped.
    pub allowed_extensions: Vec<String>,
    /// Files larger than this are skipped.
    pub max_file_size_bytes: u64,
    /// Fixed interval between scan passes.
    pub scan_interval_ms: u64,
    /// A path segment containing one of these marks the NEXT segment as
    /// the company identifier.
    pub company_folder_keywords: Vec<String>,
    /// A path segment containing one of these may carry the year even
    /// when the segment is not a bare `20xx` folder name.
    pub year_folder_hints: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: vec![
                "txt".to_string(),
                "pdf".to_string(),
                "xml".to_string(),
                "csv".to_string(),
            ],
            max_file_size_bytes: 50 * 1024 * 1024,
            scan_interval_ms: 30_000,
            company_folder_keywords: vec![
                "empresa".to_string(),
                "cliente".to_string(),
                "cnpj".to_string(),
            ],
            year_folder_hints: vec![
                "exercicio".to_string(),
                "ano".to_string(),
                "fiscal".to_string(),
            ],
        }
    }
}

impl ScannerConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> ScannerConfigBuilder {
        ScannerConfigBuilder {
            config: Self::default(),
        }
    }

    /// The pass interval as a `Duration`.
    pub fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }

    /// True when the (lowercased, dot-less) extension is analyzed.
    pub fn allows_extension(&self, extension: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed == extension)
    }

    /// Check the configuration; the builder calls this at `build()`, and
    /// hosts embedding a hand-assembled config call it directly.
    pub fn validate(&self) -> Result<(), ScannerError> {
        if self.allowed_extensions.is_empty() {
            return Err(ScannerError::InvalidConfig(
                "allowed_extensions must not be empty".to_string(),
            ));
        }
        if self.max_file_size_bytes == 0 {
            return Err(ScannerError::InvalidConfig(
                "max_file_size_bytes must be positive".to_string(),
            ));
        }
        if self.scan_interval_ms < MIN_SCAN_INTERVAL_MS {
            return Err(ScannerError::InvalidConfig(format!(
                "scan_interval_ms must be at least {}",
                MIN_SCAN_INTERVAL_MS
            )));
        }
        Ok(())
    }
}

/// Builder with validation at `build()`.
#[derive(Debug, Clone)]
pub struct ScannerConfigBuilder {
    config: ScannerConfig,
}

impl ScannerConfigBuilder {
    /// Replace the extension allow-list. Entries are normalized to
    /// lowercase and stripped of a leading dot.
    pub fn allowed_extensions(mut self, extensions: Vec<String>) -> Self {
        self.config.allowed_extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    pub fn max_file_size_bytes(mut self, max: u64) -> Self {
        self.config.max_file_size_bytes = max;
        self
    }

    pub fn scan_interval_ms(mut self, interval: u64) -> Self {
        self.config.scan_interval_ms = interval;
        self
    }

    pub fn company_folder_keywords(mut self, keywords: Vec<String>) -> Self {
        self.config.company_folder_keywords = keywords;
        self
    }

    pub fn year_folder_hints(mut self, hints: Vec<String>) -> Self {
        self.config.year_folder_hints = hints;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<ScannerConfig, ScannerError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
