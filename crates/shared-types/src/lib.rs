//! # Shared Types Crate
//!
//! This crate contains the fiscal domain entities shared across the Apura
//! subsystems: canonical line items, rule sets, computation results, and
//! the `Period` value object.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Immutability at the seams**: Rule sets and line items are handed
//!   between subsystems as read-only snapshots; nothing in this crate
//!   mutates after construction.
//! - **Serde everywhere**: Every entity round-trips through serde so rule
//!   documents, item fixtures, and ledger values share one representation.

pub mod entities;
pub mod period;
pub mod results;
pub mod rules;

pub use entities::CanonicalLineItem;
pub use period::{Period, PeriodError};
pub use results::{ApportionmentResult, ComputationStatus, ItemComputation, ProtegeResult};
pub use rules::{
    Benefit, BenefitKind, ProtegeRule, ProtegeTrack, RuleConfiguration, RuleFilter, TaxRule,
};
