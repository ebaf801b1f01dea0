//! Inbound Ports (Driving Ports)
//!
//! The API the scanner dispatch path uses to run a PROTEGE computation
//! after a schedule has been installed for a company.

use async_trait::async_trait;
use shared_types::{CanonicalLineItem, Period, ProtegeResult, ProtegeRule};

/// Primary PROTEGE engine API (Driving Port)
#[async_trait]
pub trait ProtegeEngineApi: Send + Sync {
    /// Full dual-track run for a company and period.
    ///
    /// Looks up the prior period's 2%-track credit, computes both
    /// tracks, then records this period's 2%-track payment for the next
    /// period to consume. Never returns an error: a rule source that
    /// cannot provide rules yields a result with status `erro`; ledger
    /// trouble degrades (zero credit in, warning out).
    async fn compute_for_company(
        &self,
        company_id: &str,
        period: Period,
        items: &[CanonicalLineItem],
    ) -> ProtegeResult;

    /// Pure computation against explicit inputs, no ledger I/O.
    ///
    /// Rules must already be priority-sorted.
    fn compute(
        &self,
        items: &[CanonicalLineItem],
        rules: &[ProtegeRule],
        company_id: &str,
        period: Period,
        prior_period_credit: f64,
    ) -> ProtegeResult;
}
