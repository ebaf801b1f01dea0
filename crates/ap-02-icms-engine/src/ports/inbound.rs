//! Inbound Ports (Driving Ports)
//!
//! The API the scanner dispatch path uses to run ICMS apportionment.

use async_trait::async_trait;
use shared_types::{ApportionmentResult, CanonicalLineItem, TaxRule};

/// Primary ICMS engine API (Driving Port)
#[async_trait]
pub trait IcmsEngineApi: Send + Sync {
    /// Apportion a batch against the company's installed rules.
    ///
    /// Never returns an error: a rule source that cannot provide rules
    /// yields a result with status `erro` and zero confidence, so the
    /// pipeline keeps moving.
    async fn apportion_for_company(
        &self,
        company_id: &str,
        items: &[CanonicalLineItem],
    ) -> ApportionmentResult;

    /// Apportion a batch against an explicit, priority-sorted rule list.
    ///
    /// Pure passthrough to the domain; used when the caller already holds
    /// a rule snapshot.
    fn apportion(&self, items: &[CanonicalLineItem], rules: &[TaxRule]) -> ApportionmentResult;
}
