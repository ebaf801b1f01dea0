//! # PROTEGE Dual-Track Engine (ap-03)
//!
//! Computes the Goiás PROTEGE surtax for one company and period: the 15%
//! benefit-bearing track and the flat 2% track whose payment becomes the
//! next period's credit. The credit crosses period boundaries through
//! the Period Credit Ledger, the only I/O this engine performs.
//!
//! ## Credit Flow
//!
//! ```text
//!           period P-1                period P
//!   ┌──────────────────────┐  ┌──────────────────────┐
//!   │ 2%-track payment ────┼──┼─→ protege2_credit    │
//!   │  (recorded in ledger)│  │   saldo = payment-credit
//!   └──────────────────────┘  │   2%-track payment ──┼──→ P+1
//!                             └──────────────────────┘
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Single Treatment | First matching rule decides an item's track |
//! | 2 | Keyword Gate | 2% track applies only on description keyword hit |
//! | 3 | Reconciliation | final = 15%-nets + (payment − credit) − benefits |
//! | 4 | Ledger Degradation | Read falls to zero, write falls to warning |
//! | 5 | No Pipeline Escape | Rule-source failure reports status `erro` |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Pure dual-track math and benefit formulas
//! - `ports/` - Port traits (inbound API, outbound rule source + ledger)
//! - `service/` - Application service implementing the API
//!
//! ## Usage
//!
//! ```ignore
//! use ap_03_protege_engine::{InMemoryCreditLedger, ProtegeService, StaticProtegeRuleSource};
//!
//! let service = ProtegeService::new(
//!     Arc::new(StaticProtegeRuleSource::new(rules)),
//!     Arc::new(InMemoryCreditLedger::new()),
//! );
//! let result = service.compute_for_company("06354976000141", period, &items).await;
//! ```

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use domain::{
    benefit_applies, benefit_value, compute, track2_applies, CIAP_CREDIT_FACTOR,
    DIFAL_CREDIT_FACTOR, LABEL_PROTEGE_15, LABEL_PROTEGE_2,
};
pub use error::ProtegeError;
pub use metrics::{ProtegeMetrics, ProtegeMetricsSnapshot};
pub use ports::inbound::ProtegeEngineApi;
pub use ports::outbound::{
    CreditLedger, InMemoryCreditLedger, ProtegeRuleSource, StaticProtegeRuleSource,
};
pub use service::ProtegeService;
