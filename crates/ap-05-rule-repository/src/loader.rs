//! Directory loader for per-company rule files.
//!
//! One JSON document per company, named `<company>.json`; a file named
//! `default.json` installs the fallback entry. Unparseable files poison
//! their company entry so downstream computations report status `erro`
//! instead of silently running with no rules.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shared_types::{RuleConfiguration, TaxRule};

use crate::error::RepositoryError;
use crate::ports::inbound::RuleRepositoryApi;
use crate::service::InMemoryRuleRepository;

/// On-disk rule document for one company.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyRuleDocument {
    /// ICMS apportionment rules.
    #[serde(default)]
    pub icms_rules: Vec<TaxRule>,
    /// PROTEGE configuration, absent when the company has no surtax rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protege: Option<RuleConfiguration>,
}

/// Outcome of one directory load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Companies whose documents parsed and were installed.
    pub companies_loaded: usize,
    /// Companies whose documents existed but could not be used.
    pub entries_poisoned: usize,
}

impl InMemoryRuleRepository {
    /// Load every `*.json` document in `dir`, keyed by file stem.
    ///
    /// Per-file failures poison the company and loading continues; only a
    /// directory that cannot be listed at all is an error.
    pub fn load_from_dir(&self, dir: &Path) -> Result<LoadSummary, RepositoryError> {
        let mut summary = LoadSummary::default();

        let read_dir = std::fs::read_dir(dir).map_err(|e| RepositoryError::Io {
            message: format!("{}: {}", dir.display(), e),
        })?;

        for dir_entry in read_dir {
            let dir_entry = match dir_entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("[ap-05] ⚠️ Unreadable directory entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            let path = dir_entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let Some(company_id) = path.file_stem().and_then(|s| s.to_str()).map(String::from)
            else {
                continue;
            };

            match Self::read_document(&path) {
                Ok(doc) => {
                    self.apply_icms_rules(&company_id, doc.icms_rules)?;
                    if let Some(config) = doc.protege {
                        self.apply_configuration(&company_id, config)?;
                    }
                    summary.companies_loaded += 1;
                    tracing::info!(
                        "[ap-05] 📦 Loaded rules for {} from {}",
                        company_id,
                        path.display()
                    );
                }
                Err(message) => {
                    tracing::warn!(
                        "[ap-05] ⚠️ Poisoning rules for {}: {} ({})",
                        company_id,
                        message,
                        path.display()
                    );
                    self.poison(&company_id, message);
                    summary.entries_poisoned += 1;
                }
            }
        }

        tracing::info!(
            "[ap-05] Rule load complete: {} loaded, {} poisoned",
            summary.companies_loaded,
            summary.entries_poisoned
        );
        Ok(summary)
    }

    fn read_document(path: &Path) -> Result<CompanyRuleDocument, String> {
        let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&text).map_err(|e| e.to_string())
    }
}
