//! Inbound Ports (Driving Ports)
//!
//! The API the engines and the scanner use to obtain and update rule sets.

use std::sync::Arc;

use shared_types::{ProtegeRule, RuleConfiguration, TaxRule};

use crate::error::RepositoryError;

/// Primary rule repository API (Driving Port)
///
/// Lookups return shared immutable snapshots: the `Arc` slice handed to a
/// computation never changes underneath it, even if a schedule update swaps
/// the company's rules mid-run. Companies without rules of their own fall
/// back to the `"default"` entry; a company with no entry anywhere yields
/// the empty set, which is a valid (SEM_REGRA-producing) configuration.
pub trait RuleRepositoryApi: Send + Sync {
    /// ICMS rules for a company, ascending priority.
    fn icms_rules(&self, company_id: &str) -> Result<Arc<[TaxRule]>, RepositoryError>;

    /// PROTEGE rules for a company, ascending priority.
    fn protege_rules(&self, company_id: &str) -> Result<Arc<[ProtegeRule]>, RepositoryError>;

    /// Replace a company's PROTEGE rule set from an extracted schedule.
    ///
    /// An inactive configuration installs an empty rule set; items then
    /// contribute zero to both tracks but the computation still runs.
    fn apply_configuration(
        &self,
        company_id: &str,
        config: RuleConfiguration,
    ) -> Result<(), RepositoryError>;

    /// Replace a company's ICMS rule set.
    fn apply_icms_rules(
        &self,
        company_id: &str,
        rules: Vec<TaxRule>,
    ) -> Result<(), RepositoryError>;

    /// Companies with an entry of their own (excludes the fallback).
    fn companies(&self) -> Vec<String>;
}
