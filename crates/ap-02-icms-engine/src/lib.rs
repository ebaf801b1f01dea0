//! # ICMS Apportionment Engine (ap-02)
//!
//! Matches each canonical line item against the company's rule list and
//! computes the ICMS due per item. One rule per item, first match wins;
//! an item no rule covers is not an error but an explicitly labeled
//! fallback that trusts the recorded amount.
//!
//! ## Per-Item Pipeline
//!
//! ```text
//! item ──→ first rule whose NCM/CFOP/CST filters all match
//!            │                            │
//!         matched                     no match
//!            ↓                            ↓
//!   base (× reduction when          rate back-derived,
//!   inside (0,100)), tax =          tax = recorded amount
//!   base × rate/100                 label "SEM_REGRA"
//!   label PADRÃO / BASE REDUZIDA
//!         / CRÉDITO OUTORGADO
//!         (+ PROTEGE/DIFAL/CIAP)
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | First Match Wins | Rules evaluate in ascending priority order |
//! | 2 | Fallback Totality | Every item yields a detail entry, rule or not |
//! | 3 | Source Trust | `SEM_REGRA` carries the recorded amount verbatim |
//! | 4 | No Pipeline Escape | Rule-source failure reports status `erro` |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Pure apportionment math and labels
//! - `ports/` - Port traits (inbound API, outbound rule source)
//! - `service/` - Application service implementing the API
//!
//! ## Usage
//!
//! ```ignore
//! use ap_02_icms_engine::{IcmsEngineService, StaticRuleSource};
//!
//! let service = IcmsEngineService::new(Arc::new(StaticRuleSource::new(rules)));
//! let result = service.apportion_for_company("06354976000141", &items).await;
//! ```

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use domain::{
    apportion, apportion_item, LABEL_BASE_REDUZIDA, LABEL_CREDITO_OUTORGADO, LABEL_PADRAO,
    LABEL_SEM_REGRA,
};
pub use error::IcmsError;
pub use metrics::{IcmsMetrics, IcmsMetricsSnapshot};
pub use ports::inbound::IcmsEngineApi;
pub use ports::outbound::{RuleSource, StaticRuleSource};
pub use service::IcmsEngineService;
