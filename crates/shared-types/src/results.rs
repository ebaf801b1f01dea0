//! # Computation Results
//!
//! Result payloads shared by both engines. A run that cannot even load
//! its rule set still produces a result — status `erro`, confidence 0.0 —
//! instead of erroring out of the pipeline; callers decide whether to
//! retry.

use serde::{Deserialize, Serialize};

use crate::period::Period;

/// Terminal status of one computation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComputationStatus {
    /// Computed normally (including zero-item and no-rule runs).
    #[default]
    Calculado,
    /// The run could not obtain its inputs; totals are zero.
    Erro,
}

/// Per-item outcome, one entry per computed line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemComputation {
    /// The source item's fiscal document reference.
    pub document_ref: String,
    /// Tax base after any reduction.
    pub base: f64,
    /// Applied rate in percent.
    pub rate: f64,
    /// Tax due for this item.
    pub tax_due: f64,
    /// Applied rule id; `None` for the `SEM_REGRA` fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    /// Human-readable calculation label (e.g. `"BASE REDUZIDA + PROTEGE"`).
    pub label: String,
}

/// Outcome of one ICMS apportionment run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApportionmentResult {
    /// Sum of every per-item tax due.
    pub total_icms: f64,
    /// Per-item breakdown, in input order.
    pub details: Vec<ItemComputation>,
    /// Run status.
    pub status: ComputationStatus,
    /// 1.0 on success, 0.0 on status `erro`.
    pub confidence: f64,
    /// Failure reason when status is `erro`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApportionmentResult {
    /// A successfully computed result.
    pub fn calculated(total_icms: f64, details: Vec<ItemComputation>) -> Self {
        Self {
            total_icms,
            details,
            status: ComputationStatus::Calculado,
            confidence: 1.0,
            error: None,
        }
    }

    /// A computation-fatal result: zero totals, status `erro`, zero
    /// confidence.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            total_icms: 0.0,
            details: Vec::new(),
            status: ComputationStatus::Erro,
            confidence: 0.0,
            error: Some(reason.into()),
        }
    }
}

/// Outcome of one PROTEGE dual-track run for a company and period.
///
/// Reconciliation invariant, enforced by construction in the engine:
/// `valor_final == total_protege15 + (protege2_payment - protege2_credit)
/// - total_benefits` within floating-point tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtegeResult {
    /// Company the run belongs to.
    pub company_id: String,
    /// Fiscal period the run covers.
    pub period: Period,
    /// Σ of 15%-track per-item nets (value − stacked benefits).
    pub total_protege15: f64,
    /// Σ of 2%-track values; the obligation due this period.
    pub protege2_payment: f64,
    /// Prior period's recorded 2%-track payment, consumed as credit.
    pub protege2_credit: f64,
    /// `protege2_payment − protege2_credit`; negative when credit exceeds
    /// the current obligation.
    pub saldo_protege2: f64,
    /// Σ of every stacked benefit value across the 15% track.
    pub total_benefits: f64,
    /// `total_protege15 + saldo_protege2 − total_benefits`.
    pub valor_final: f64,
    /// Per-item breakdown, matched items only.
    pub details: Vec<ItemComputation>,
    /// Run status.
    pub status: ComputationStatus,
    /// 1.0 on success, 0.0 on status `erro`.
    pub confidence: f64,
    /// Failure reason when status is `erro`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProtegeResult {
    /// A computation-fatal result for the given company and period.
    pub fn failed(company_id: impl Into<String>, period: Period, reason: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            period,
            total_protege15: 0.0,
            protege2_payment: 0.0,
            protege2_credit: 0.0,
            saldo_protege2: 0.0,
            total_benefits: 0.0,
            valor_final: 0.0,
            details: Vec::new(),
            status: ComputationStatus::Erro,
            confidence: 0.0,
            error: Some(reason.into()),
        }
    }
}
