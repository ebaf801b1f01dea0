//! Outbound Ports (Driven Ports)
//!
//! What the engine needs from its surroundings: a per-company source of
//! priority-sorted ICMS rules.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::TaxRule;

use crate::error::IcmsError;

/// Provider of per-company ICMS rules (Driven Port)
///
/// The runtime backs this with the rule repository; tests use
/// [`StaticRuleSource`].
#[async_trait]
pub trait RuleSource: Send + Sync {
    /// Priority-sorted rules for the company; empty when none are known.
    async fn icms_rules(&self, company_id: &str) -> Result<Arc<[TaxRule]>, IcmsError>;
}

/// Fixed rule list returned for every company.
///
/// Default adapter for tests and single-company setups.
pub struct StaticRuleSource {
    rules: Arc<[TaxRule]>,
}

impl StaticRuleSource {
    /// Build a source from an unsorted rule list; sorts once here.
    pub fn new(mut rules: Vec<TaxRule>) -> Self {
        rules.sort_by_key(|r| r.priority);
        Self {
            rules: Arc::from(rules),
        }
    }

    /// A source with no rules; every item falls back to `SEM_REGRA`.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl RuleSource for StaticRuleSource {
    async fn icms_rules(&self, _company_id: &str) -> Result<Arc<[TaxRule]>, IcmsError> {
        Ok(Arc::clone(&self.rules))
    }
}
