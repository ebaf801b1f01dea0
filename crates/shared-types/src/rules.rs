//! # Rule Entities
//!
//! ICMS and PROTEGE rules share the optional NCM/CFOP/CST filter triple:
//! a defined filter must equal the item's field, an unset filter matches
//! anything. Rules carry an explicit numeric `priority`; repositories
//! sort ascending once at load and engines take the first match, so rule
//! precedence never depends on insertion order.

use serde::{Deserialize, Serialize};

use crate::entities::CanonicalLineItem;

fn default_true() -> bool {
    true
}

// =============================================================================
// FILTERS
// =============================================================================

/// The optional NCM/CFOP/CST matching triple shared by every rule kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFilter {
    /// Merchandise classification code filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ncm: Option<String>,
    /// Operation nature code filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfop: Option<String>,
    /// Tax situation code filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cst: Option<String>,
}

impl RuleFilter {
    /// True iff every *defined* filter equals the item's corresponding
    /// field. A filter with nothing defined matches every item.
    pub fn matches(&self, item: &CanonicalLineItem) -> bool {
        if let Some(ncm) = &self.ncm {
            if *ncm != item.ncm {
                return false;
            }
        }
        if let Some(cfop) = &self.cfop {
            if *cfop != item.cfop {
                return false;
            }
        }
        if let Some(cst) = &self.cst {
            if *cst != item.cst {
                return false;
            }
        }
        true
    }

    /// True when no filter is defined at all.
    pub fn is_wildcard(&self) -> bool {
        self.ncm.is_none() && self.cfop.is_none() && self.cst.is_none()
    }
}

// =============================================================================
// ICMS RULES
// =============================================================================

/// One ICMS apportionment rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRule {
    /// Stable identifier, referenced by computation details.
    pub id: String,
    /// Evaluation priority; lower evaluates first.
    pub priority: u32,
    /// Matching filters (unset = wildcard).
    #[serde(default)]
    pub filter: RuleFilter,
    /// ICMS rate in percent.
    pub rate: f64,
    /// Base reduction percentage; applied only when inside (0, 100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_reduction_percent: Option<f64>,
    /// Free-text benefit label (e.g. "CRÉDITO OUTORGADO conf. art. 11").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefit: Option<String>,
    /// Operation also falls under the PROTEGE surtax.
    #[serde(default)]
    pub protege: bool,
    /// Operation also owes the interstate rate differential.
    #[serde(default)]
    pub difal: bool,
    /// Operation also accrues fixed-asset credit (CIAP).
    #[serde(default)]
    pub ciap: bool,
}

// =============================================================================
// PROTEGE RULES
// =============================================================================

/// Which PROTEGE track a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProtegeTrack {
    /// The 15% benefit-bearing track.
    #[serde(rename = "PROTEGE_15")]
    Protege15,
    /// The flat 2% surcharge track whose payment becomes next period's
    /// credit.
    #[serde(rename = "PROTEGE_2")]
    Protege2,
}

/// Benefit categories of the 15% track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BenefitKind {
    /// Reduced tax base; value = base × reduction% × rate%.
    BaseReduzida,
    /// Granted credit; value = base × rate%.
    CreditoOutorgado,
    /// Rate differential credit; fixed 40% of the recorded ICMS amount.
    Difal,
    /// Fixed-asset credit; fixed 10% of the recorded ICMS amount.
    Ciap,
    /// Recognized but carries no formula; contributes zero.
    Outros,
}

/// One stackable benefit attached to a 15%-track rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Benefit {
    /// Benefit code as published in the schedule.
    pub code: String,
    /// Human-readable description.
    pub description: String,
    /// Formula category.
    pub kind: BenefitKind,
    /// Benefit-specific rate in percent, where the formula uses one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    /// Base reduction percentage for BASE_REDUZIDA benefits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_reduction_percent: Option<f64>,
    /// Only active benefits enter the stacking computation.
    #[serde(default)]
    pub active: bool,
    /// Declared textual eligibility conditions. Currently informational:
    /// see `benefit_applies` in the PROTEGE engine.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
}

/// One PROTEGE rule, either track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtegeRule {
    /// Stable identifier, referenced by computation details.
    pub id: String,
    /// Evaluation priority; lower evaluates first.
    pub priority: u32,
    /// Matching filters (unset = wildcard).
    #[serde(default)]
    pub filter: RuleFilter,
    /// Track discriminator.
    pub track: ProtegeTrack,
    /// Surtax rate in percent (15.0 or 2.0 in published schedules).
    pub rate: f64,
    /// Stackable benefits; meaningful only on the 15% track.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub benefits: Vec<Benefit>,
    /// Product-description keyword allow-list; meaningful only on the 2%
    /// track.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub product_keywords: Vec<String>,
}

/// The unit the schedule-extraction collaborator returns for one company:
/// a full replacement PROTEGE rule set plus the benefit catalog it cites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfiguration {
    /// PROTEGE rules, both tracks, unsorted as extracted.
    #[serde(default)]
    pub rules: Vec<ProtegeRule>,
    /// Benefit catalog cited by the schedule.
    #[serde(default)]
    pub benefits: Vec<Benefit>,
    /// Inactive configurations are stored but contribute no rules.
    #[serde(default = "default_true")]
    pub active: bool,
    /// Schedule validity start, as printed (ISO date).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
}
