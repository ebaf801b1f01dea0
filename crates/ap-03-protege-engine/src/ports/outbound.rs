//! Outbound Ports (Driven Ports)
//!
//! What the engine needs from its surroundings: a per-company source of
//! PROTEGE rules and the cross-period credit ledger.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{Period, ProtegeRule};

use crate::error::ProtegeError;

/// Provider of per-company PROTEGE rules (Driven Port)
#[async_trait]
pub trait ProtegeRuleSource: Send + Sync {
    /// Priority-sorted rules for the company; empty when none are known.
    async fn protege_rules(&self, company_id: &str) -> Result<Arc<[ProtegeRule]>, ProtegeError>;
}

/// Cross-period credit channel (Driven Port)
///
/// The 2%-track payment recorded for period P is the credit consumed in
/// P+1. Reads never fail from the engine's point of view; the adapter
/// degrades to zero and logs.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    /// Credit available from the given period; 0.0 when absent or when
    /// the backing store is unavailable.
    async fn credit_or_zero(&self, company_id: &str, period: Period) -> f64;

    /// Record the 2%-track payment computed for the given period.
    async fn record_payment(
        &self,
        company_id: &str,
        period: Period,
        amount: f64,
    ) -> Result<(), ProtegeError>;
}

/// Fixed rule list returned for every company.
///
/// Default adapter for tests and single-company setups.
pub struct StaticProtegeRuleSource {
    rules: Arc<[ProtegeRule]>,
}

impl StaticProtegeRuleSource {
    /// Build a source from an unsorted rule list; sorts once here.
    pub fn new(mut rules: Vec<ProtegeRule>) -> Self {
        rules.sort_by_key(|r| r.priority);
        Self {
            rules: Arc::from(rules),
        }
    }

    /// A source with no rules; every run totals zero.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl ProtegeRuleSource for StaticProtegeRuleSource {
    async fn protege_rules(&self, _company_id: &str) -> Result<Arc<[ProtegeRule]>, ProtegeError> {
        Ok(Arc::clone(&self.rules))
    }
}

/// HashMap-backed credit ledger for tests and defaults.
#[derive(Default)]
pub struct InMemoryCreditLedger {
    credits: RwLock<HashMap<(String, Period), f64>>,
}

impl InMemoryCreditLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded payments
    pub fn len(&self) -> usize {
        self.credits.read().len()
    }

    /// True when nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.credits.read().is_empty()
    }
}

#[async_trait]
impl CreditLedger for InMemoryCreditLedger {
    async fn credit_or_zero(&self, company_id: &str, period: Period) -> f64 {
        self.credits
            .read()
            .get(&(company_id.to_string(), period))
            .copied()
            .unwrap_or(0.0)
    }

    async fn record_payment(
        &self,
        company_id: &str,
        period: Period,
        amount: f64,
    ) -> Result<(), ProtegeError> {
        self.credits
            .write()
            .insert((company_id.to_string(), period), amount);
        Ok(())
    }
}
