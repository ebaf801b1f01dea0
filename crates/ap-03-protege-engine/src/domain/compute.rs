//! Dual-track PROTEGE computation
//!
//! Pure function over items, rules, and the prior period's credit. Rules
//! arrive priority-sorted; each item is treated by its first matching
//! rule only, so an item never contributes to both tracks.

use shared_types::{
    CanonicalLineItem, ComputationStatus, ItemComputation, Period, ProtegeResult, ProtegeRule,
    ProtegeTrack,
};

use crate::domain::benefits::{benefit_applies, benefit_value};

/// Detail label for 15%-track entries.
pub const LABEL_PROTEGE_15: &str = "PROTEGE_15";
/// Detail label for 2%-track entries.
pub const LABEL_PROTEGE_2: &str = "PROTEGE_2";

/// Whether a 2%-track rule applies to the item.
///
/// The track is keyword-gated: the product description must contain one
/// of the rule's allow-listed keywords, case-insensitively. An empty
/// allow-list admits nothing.
pub fn track2_applies(rule: &ProtegeRule, item: &CanonicalLineItem) -> bool {
    let description = item.product_description.to_lowercase();
    rule.product_keywords
        .iter()
        .any(|kw| description.contains(&kw.to_lowercase()))
}

/// Run both PROTEGE tracks over a batch.
///
/// `prior_period_credit` is the 2%-track payment recorded for the
/// preceding period; it offsets this period's 2%-track obligation:
///
/// ```text
/// saldo_protege2 = protege2_payment - protege2_credit
/// valor_final    = total_protege15 + saldo_protege2 - total_benefits
/// ```
pub fn compute(
    items: &[CanonicalLineItem],
    rules: &[ProtegeRule],
    company_id: &str,
    period: Period,
    prior_period_credit: f64,
) -> ProtegeResult {
    let mut total_protege15 = 0.0;
    let mut protege2_payment = 0.0;
    let mut total_benefits = 0.0;
    let mut details = Vec::new();

    for item in items {
        let Some(rule) = rules.iter().find(|r| r.filter.matches(item)) else {
            continue;
        };

        match rule.track {
            ProtegeTrack::Protege15 => {
                let value = item.icms_base * rule.rate / 100.0;
                let mut item_benefits = 0.0;
                for benefit in &rule.benefits {
                    if benefit_applies(benefit, item) {
                        item_benefits += benefit_value(benefit, item);
                    }
                }
                let net = value - item_benefits;
                total_protege15 += net;
                total_benefits += item_benefits;
                details.push(ItemComputation {
                    document_ref: item.document_ref.clone(),
                    base: item.icms_base,
                    rate: rule.rate,
                    tax_due: net,
                    rule_id: Some(rule.id.clone()),
                    label: LABEL_PROTEGE_15.to_string(),
                });
            }
            ProtegeTrack::Protege2 => {
                if !track2_applies(rule, item) {
                    continue;
                }
                let value = item.icms_base * rule.rate / 100.0;
                protege2_payment += value;
                details.push(ItemComputation {
                    document_ref: item.document_ref.clone(),
                    base: item.icms_base,
                    rate: rule.rate,
                    tax_due: value,
                    rule_id: Some(rule.id.clone()),
                    label: LABEL_PROTEGE_2.to_string(),
                });
            }
        }
    }

    let saldo_protege2 = protege2_payment - prior_period_credit;
    let valor_final = total_protege15 + saldo_protege2 - total_benefits;

    ProtegeResult {
        company_id: company_id.to_string(),
        period,
        total_protege15,
        protege2_payment,
        protege2_credit: prior_period_credit,
        saldo_protege2,
        total_benefits,
        valor_final,
        details,
        status: ComputationStatus::Calculado,
        confidence: 1.0,
        error: None,
    }
}
