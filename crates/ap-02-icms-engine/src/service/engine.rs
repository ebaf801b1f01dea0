//! ICMS Apportionment Service
//!
//! Thin orchestration over the pure domain: fetch the company's rule
//! snapshot, run the batch, count what happened.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{ApportionmentResult, CanonicalLineItem, TaxRule};

use crate::domain;
use crate::metrics::{IcmsMetrics, IcmsMetricsSnapshot};
use crate::ports::inbound::IcmsEngineApi;
use crate::ports::outbound::RuleSource;

/// ICMS engine implementation over an injected rule source.
pub struct IcmsEngineService<R: RuleSource> {
    /// Rule provider (driven port)
    rule_source: Arc<R>,
    /// Run counters
    metrics: IcmsMetrics,
}

impl<R: RuleSource> IcmsEngineService<R> {
    /// Create a new service with the given rule source
    pub fn new(rule_source: Arc<R>) -> Self {
        Self {
            rule_source,
            metrics: IcmsMetrics::new(),
        }
    }

    /// Counter snapshot for the stats ticker
    pub fn metrics(&self) -> IcmsMetricsSnapshot {
        self.metrics.snapshot()
    }

    fn run(&self, items: &[CanonicalLineItem], rules: &[TaxRule]) -> ApportionmentResult {
        let result = domain::apportion(items, rules);
        let fallbacks = result
            .details
            .iter()
            .filter(|d| d.rule_id.is_none())
            .count();
        self.metrics
            .record_run(result.details.len() as u64, fallbacks as u64);
        result
    }
}

#[async_trait]
impl<R: RuleSource + 'static> IcmsEngineApi for IcmsEngineService<R> {
    async fn apportion_for_company(
        &self,
        company_id: &str,
        items: &[CanonicalLineItem],
    ) -> ApportionmentResult {
        let rules = match self.rule_source.icms_rules(company_id).await {
            Ok(rules) => rules,
            Err(e) => {
                tracing::warn!(
                    "[ap-02] ⚠️ Rule set unavailable for {}: {}. Reporting erro result",
                    company_id,
                    e
                );
                self.metrics.record_failed_run();
                return ApportionmentResult::failed(e.to_string());
            }
        };

        let result = self.run(items, &rules);
        tracing::info!(
            "[ap-02] 🧮 Apportioned {} items for {}: total R$ {:.2}",
            result.details.len(),
            company_id,
            result.total_icms
        );
        result
    }

    fn apportion(&self, items: &[CanonicalLineItem], rules: &[TaxRule]) -> ApportionmentResult {
        self.run(items, rules)
    }
}
