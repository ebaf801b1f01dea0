//! PROTEGE Dual-Track Service
//!
//! Orchestrates one computation: prior-credit lookup at P-1, pure
//! dual-track math, payment record at P. The ledger is the only I/O.

use std::sync::Arc;

use async_trait::async_trait;
use shared_types::{CanonicalLineItem, Period, ProtegeResult, ProtegeRule};

use crate::domain::{self, LABEL_PROTEGE_15, LABEL_PROTEGE_2};
use crate::metrics::{ProtegeMetrics, ProtegeMetricsSnapshot};
use crate::ports::inbound::ProtegeEngineApi;
use crate::ports::outbound::{CreditLedger, ProtegeRuleSource};

/// PROTEGE engine implementation over injected rule and ledger ports.
pub struct ProtegeService<R: ProtegeRuleSource, L: CreditLedger> {
    /// Rule provider (driven port)
    rule_source: Arc<R>,
    /// Cross-period credit channel (driven port)
    ledger: Arc<L>,
    /// Run counters
    metrics: ProtegeMetrics,
}

impl<R: ProtegeRuleSource, L: CreditLedger> ProtegeService<R, L> {
    /// Create a new service with the given rule source and ledger
    pub fn new(rule_source: Arc<R>, ledger: Arc<L>) -> Self {
        Self {
            rule_source,
            ledger,
            metrics: ProtegeMetrics::new(),
        }
    }

    /// Counter snapshot for the stats ticker
    pub fn metrics(&self) -> ProtegeMetricsSnapshot {
        self.metrics.snapshot()
    }

    fn count_tracks(result: &ProtegeResult) -> (u64, u64) {
        let t15 = result
            .details
            .iter()
            .filter(|d| d.label == LABEL_PROTEGE_15)
            .count() as u64;
        let t2 = result
            .details
            .iter()
            .filter(|d| d.label == LABEL_PROTEGE_2)
            .count() as u64;
        (t15, t2)
    }
}

#[async_trait]
impl<R, L> ProtegeEngineApi for ProtegeService<R, L>
where
    R: ProtegeRuleSource + 'static,
    L: CreditLedger + 'static,
{
    async fn compute_for_company(
        &self,
        company_id: &str,
        period: Period,
        items: &[CanonicalLineItem],
    ) -> ProtegeResult {
        let rules = match self.rule_source.protege_rules(company_id).await {
            Ok(rules) => rules,
            Err(e) => {
                tracing::warn!(
                    "[ap-03] ⚠️ Rule set unavailable for {}: {}. Reporting erro result",
                    company_id,
                    e
                );
                self.metrics.record_failed_run();
                return ProtegeResult::failed(company_id, period, e.to_string());
            }
        };

        let prior_credit = self.ledger.credit_or_zero(company_id, period.prev()).await;
        let result = domain::compute(items, &rules, company_id, period, prior_credit);

        let (t15, t2) = Self::count_tracks(&result);
        self.metrics.record_run(t15, t2);

        // Recorded even at zero so a reprocessed period overwrites its
        // earlier payment instead of leaving it behind.
        if let Err(e) = self
            .ledger
            .record_payment(company_id, period, result.protege2_payment)
            .await
        {
            tracing::warn!(
                "[ap-03] ⚠️ Payment record failed for {}/{}: {}. Result stands",
                company_id,
                period,
                e
            );
            self.metrics.record_degraded_write();
        }

        tracing::info!(
            "[ap-03] 💰 PROTEGE {} period {}: 15% R$ {:.2}, 2% R$ {:.2} (credit R$ {:.2}), final R$ {:.2}",
            company_id,
            period,
            result.total_protege15,
            result.protege2_payment,
            result.protege2_credit,
            result.valor_final
        );
        result
    }

    fn compute(
        &self,
        items: &[CanonicalLineItem],
        rules: &[ProtegeRule],
        company_id: &str,
        period: Period,
        prior_period_credit: f64,
    ) -> ProtegeResult {
        let result = domain::compute(items, rules, company_id, period, prior_period_credit);
        let (t15, t2) = Self::count_tracks(&result);
        self.metrics.record_run(t15, t2);
        result
    }
}
