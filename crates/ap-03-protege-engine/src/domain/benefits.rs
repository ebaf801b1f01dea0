//! Benefit stacking formulas for the 15% track

use shared_types::{Benefit, BenefitKind, CanonicalLineItem};

/// DIFAL benefit credit: fixed 40% of the recorded ICMS amount.
pub const DIFAL_CREDIT_FACTOR: f64 = 0.4;

/// CIAP benefit credit: fixed 10% of the recorded ICMS amount.
pub const CIAP_CREDIT_FACTOR: f64 = 0.1;

/// Whether a benefit enters the stacking computation for this item.
///
/// Checks only the `active` flag. The declared textual `conditions` are
/// carried on the benefit but not evaluated here; published schedules
/// encode them as free prose and no condition parser exists yet.
/// TODO: evaluate `benefit.conditions` once the schedule vocabulary settles.
pub fn benefit_applies(benefit: &Benefit, _item: &CanonicalLineItem) -> bool {
    benefit.active
}

/// Monetary value of one benefit for one item, by kind.
pub fn benefit_value(benefit: &Benefit, item: &CanonicalLineItem) -> f64 {
    match benefit.kind {
        BenefitKind::BaseReduzida => {
            let reduction = benefit.base_reduction_percent.unwrap_or(0.0);
            let rate = benefit.rate.unwrap_or(0.0);
            item.icms_base * reduction / 100.0 * rate / 100.0
        }
        BenefitKind::CreditoOutorgado => item.icms_base * benefit.rate.unwrap_or(0.0) / 100.0,
        BenefitKind::Difal => item.icms_amount * DIFAL_CREDIT_FACTOR,
        BenefitKind::Ciap => item.icms_amount * CIAP_CREDIT_FACTOR,
        BenefitKind::Outros => 0.0,
    }
}
