//! Rule repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::{ProtegeRule, RuleConfiguration, TaxRule};

use crate::error::RepositoryError;
use crate::ports::inbound::RuleRepositoryApi;

/// Entry key holding the fallback rule set for companies without their own.
pub const DEFAULT_COMPANY: &str = "default";

/// One company's rule sets, or the reason they are unusable.
#[derive(Clone)]
enum CompanyEntry {
    Loaded {
        icms: Arc<[TaxRule]>,
        protege: Arc<[ProtegeRule]>,
    },
    /// The backing file existed but could not be parsed. Kept so queries
    /// fail loudly instead of silently computing with the empty set.
    Poisoned { message: String },
}

/// In-memory rule repository.
///
/// Entries are whole-sale swapped under a `parking_lot::RwLock`; readers
/// hold `Arc` snapshots, so a computation sees one consistent rule set for
/// its entire run regardless of concurrent schedule updates.
#[derive(Default)]
pub struct InMemoryRuleRepository {
    entries: RwLock<HashMap<String, CompanyEntry>>,
}

impl InMemoryRuleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a company's entry unusable. Subsequent queries return
    /// [`RepositoryError::CompanyPoisoned`] until a valid configuration
    /// replaces the entry.
    pub(crate) fn poison(&self, company_id: &str, message: impl Into<String>) {
        self.entries.write().insert(
            company_id.to_string(),
            CompanyEntry::Poisoned {
                message: message.into(),
            },
        );
    }

    fn lookup<T>(
        &self,
        company_id: &str,
        pick: impl Fn(&CompanyEntry) -> Result<Arc<[T]>, RepositoryError>,
    ) -> Result<Arc<[T]>, RepositoryError> {
        let entries = self.entries.read();

        if let Some(entry) = entries.get(company_id) {
            return pick(entry);
        }

        // Fall back to the shared default entry
        if let Some(entry) = entries.get(DEFAULT_COMPANY) {
            return pick(entry);
        }

        // No rules anywhere is a valid, empty configuration
        Ok(Arc::from(Vec::new()))
    }

    fn sort_icms(mut rules: Vec<TaxRule>) -> Arc<[TaxRule]> {
        // Stable sort: equal priorities keep document order
        rules.sort_by_key(|r| r.priority);
        Arc::from(rules)
    }

    fn sort_protege(mut rules: Vec<ProtegeRule>) -> Arc<[ProtegeRule]> {
        rules.sort_by_key(|r| r.priority);
        Arc::from(rules)
    }
}

impl RuleRepositoryApi for InMemoryRuleRepository {
    fn icms_rules(&self, company_id: &str) -> Result<Arc<[TaxRule]>, RepositoryError> {
        self.lookup(company_id, |entry| match entry {
            CompanyEntry::Loaded { icms, .. } => Ok(Arc::clone(icms)),
            CompanyEntry::Poisoned { message } => Err(RepositoryError::CompanyPoisoned {
                company_id: company_id.to_string(),
                message: message.clone(),
            }),
        })
    }

    fn protege_rules(&self, company_id: &str) -> Result<Arc<[ProtegeRule]>, RepositoryError> {
        self.lookup(company_id, |entry| match entry {
            CompanyEntry::Loaded { protege, .. } => Ok(Arc::clone(protege)),
            CompanyEntry::Poisoned { message } => Err(RepositoryError::CompanyPoisoned {
                company_id: company_id.to_string(),
                message: message.clone(),
            }),
        })
    }

    fn apply_configuration(
        &self,
        company_id: &str,
        config: RuleConfiguration,
    ) -> Result<(), RepositoryError> {
        let protege = if config.active {
            Self::sort_protege(config.rules)
        } else {
            tracing::info!(
                "[ap-05] Configuration for {} is inactive; installing empty rule set",
                company_id
            );
            Arc::from(Vec::new())
        };

        let mut entries = self.entries.write();
        let entry = entries
            .entry(company_id.to_string())
            .or_insert_with(|| CompanyEntry::Loaded {
                icms: Arc::from(Vec::new()),
                protege: Arc::from(Vec::new()),
            });

        match entry {
            CompanyEntry::Loaded {
                protege: slot, ..
            } => *slot = protege,
            // A fresh configuration heals a poisoned entry; the ICMS side
            // starts empty until reapplied.
            CompanyEntry::Poisoned { .. } => {
                *entry = CompanyEntry::Loaded {
                    icms: Arc::from(Vec::new()),
                    protege,
                };
            }
        }

        tracing::info!("[ap-05] ✓ PROTEGE rules updated for {}", company_id);
        Ok(())
    }

    fn apply_icms_rules(
        &self,
        company_id: &str,
        rules: Vec<TaxRule>,
    ) -> Result<(), RepositoryError> {
        let icms = Self::sort_icms(rules);

        let mut entries = self.entries.write();
        let entry = entries
            .entry(company_id.to_string())
            .or_insert_with(|| CompanyEntry::Loaded {
                icms: Arc::from(Vec::new()),
                protege: Arc::from(Vec::new()),
            });

        match entry {
            CompanyEntry::Loaded { icms: slot, .. } => *slot = icms,
            CompanyEntry::Poisoned { .. } => {
                *entry = CompanyEntry::Loaded {
                    icms,
                    protege: Arc::from(Vec::new()),
                };
            }
        }

        tracing::info!("[ap-05] ✓ ICMS rules updated for {}", company_id);
        Ok(())
    }

    fn companies(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .read()
            .keys()
            .filter(|k| *k != DEFAULT_COMPANY)
            .cloned()
            .collect();
        names.sort();
        names
    }
}
