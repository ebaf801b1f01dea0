//! # Core Domain Entities
//!
//! The canonical line item is the unit every tax computation consumes.
//! It is produced upstream (SPED/NFe parsing is outside this workspace)
//! and arrives here already flattened: one item, one operation, one rule.

use serde::{Deserialize, Serialize};

/// A single fiscal operation as exported by the upstream SPED parser.
///
/// Immutable once produced. The NCM/CFOP/CST triple is what rule filters
/// match against; the recorded ICMS fields are trusted verbatim when no
/// rule matches (the `SEM_REGRA` fallback).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalLineItem {
    /// Fiscal document reference (chave or document number).
    pub document_ref: String,
    /// Operation date as exported upstream (ISO `YYYY-MM-DD`).
    pub transaction_date: String,
    /// CNPJ of the company the operation belongs to.
    pub company_cnpj: String,
    /// Internal product code.
    pub product_code: String,
    /// Product description; the PROTEGE 2% track matches keywords on it.
    pub product_description: String,
    /// Mercosur merchandise classification code (8 digits).
    pub ncm: String,
    /// Operation nature code (Código Fiscal de Operações e Prestações).
    pub cfop: String,
    /// Tax situation code (Código de Situação Tributária).
    pub cst: String,
    /// Total operation value.
    pub operation_value: f64,
    /// ICMS tax base as recorded by the source.
    pub icms_base: f64,
    /// ICMS rate as recorded by the source (percent).
    pub icms_rate: f64,
    /// ICMS amount as recorded by the source.
    pub icms_amount: f64,
}

impl CanonicalLineItem {
    /// Back-derive the effective rate from the recorded base and amount.
    ///
    /// Used by the `SEM_REGRA` fallback; returns 0.0 when the base is not
    /// positive so an empty item never divides by zero.
    pub fn recorded_rate(&self) -> f64 {
        if self.icms_base > 0.0 {
            (self.icms_amount / self.icms_base) * 100.0
        } else {
            0.0
        }
    }
}
