//! First-match rule apportionment
//!
//! Pure functions, no I/O and no locking. Rules arrive already sorted
//! ascending by priority (the repository sorts once at insert), so
//! "first match wins" is plain slice order here.

use shared_types::{ApportionmentResult, CanonicalLineItem, ItemComputation, TaxRule};

/// Label for a plain rate application.
pub const LABEL_PADRAO: &str = "PADRÃO";
/// Label when a base reduction was applied.
pub const LABEL_BASE_REDUZIDA: &str = "BASE REDUZIDA";
/// Label when the matched rule's benefit text grants granted credit.
pub const LABEL_CREDITO_OUTORGADO: &str = "CRÉDITO OUTORGADO";
/// Label for the no-rule fallback that trusts the recorded amount.
pub const LABEL_SEM_REGRA: &str = "SEM_REGRA";

/// Apportion a batch of items against a priority-sorted rule list.
///
/// Never fails: items without a matching rule fall back to their
/// recorded ICMS amount under the `SEM_REGRA` label. The total is the
/// sum of every per-item tax due.
pub fn apportion(items: &[CanonicalLineItem], rules: &[TaxRule]) -> ApportionmentResult {
    let details: Vec<ItemComputation> = items
        .iter()
        .map(|item| apportion_item(item, rules))
        .collect();
    let total = details.iter().map(|d| d.tax_due).sum();
    ApportionmentResult::calculated(total, details)
}

/// Compute one item against the rule list.
pub fn apportion_item(item: &CanonicalLineItem, rules: &[TaxRule]) -> ItemComputation {
    match rules.iter().find(|rule| rule.filter.matches(item)) {
        Some(rule) => apply_rule(item, rule),
        None => fallback(item),
    }
}

fn apply_rule(item: &CanonicalLineItem, rule: &TaxRule) -> ItemComputation {
    let mut base = item.icms_base;
    let mut label = LABEL_PADRAO;

    // Reductions outside (0, 100) are treated as not configured.
    if let Some(pct) = rule.base_reduction_percent {
        if pct > 0.0 && pct < 100.0 {
            base *= pct / 100.0;
            label = LABEL_BASE_REDUZIDA;
        }
    }

    if let Some(benefit) = &rule.benefit {
        if benefit.contains(LABEL_CREDITO_OUTORGADO) {
            label = LABEL_CREDITO_OUTORGADO;
        }
    }

    let mut label = label.to_string();
    if rule.protege {
        label.push_str(" + PROTEGE");
    }
    if rule.difal {
        label.push_str(" + DIFAL");
    }
    if rule.ciap {
        label.push_str(" + CIAP");
    }

    ItemComputation {
        document_ref: item.document_ref.clone(),
        base,
        rate: rule.rate,
        tax_due: base * rule.rate / 100.0,
        rule_id: Some(rule.id.clone()),
        label,
    }
}

/// No rule matched: trust the source over recomputation. The recorded
/// amount is carried verbatim and the rate is back-derived from it.
fn fallback(item: &CanonicalLineItem) -> ItemComputation {
    ItemComputation {
        document_ref: item.document_ref.clone(),
        base: item.icms_base,
        rate: item.recorded_rate(),
        tax_due: item.icms_amount,
        rule_id: None,
        label: LABEL_SEM_REGRA.to_string(),
    }
}
