//! # Rule Repository (ap-05)
//!
//! The Rule Repository is the authoritative in-memory source of tax rules for
//! the computation engines. Schedules extracted from PROTEGE documents and
//! per-company JSON files are installed here; the ICMS and PROTEGE engines
//! read immutable snapshots on every computation.
//!
//! ## Resolution Order
//!
//! ```text
//! icms_rules("06354...") ──→ company entry? ──→ yes: snapshot
//!                                 │
//!                                 no
//!                                 ↓
//!                          "default" entry? ──→ yes: snapshot
//!                                 │
//!                                 no
//!                                 ↓
//!                            empty rule set
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Description |
//! |----|-----------|-------------|
//! | 1 | Priority Order | Rules are sorted ascending by priority at insert |
//! | 2 | Snapshot Stability | A handed-out `Arc<[_]>` never mutates |
//! | 3 | Poison Visibility | A company with an invalid file errors until replaced |
//! | 4 | Inactive Means Empty | An inactive configuration installs an empty set |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `ports/` - Port traits (inbound API)
//! - `service/` - In-memory repository implementing the API
//! - `loader.rs` - Directory loader for per-company JSON documents
//!
//! ## Usage
//!
//! ```ignore
//! use ap_05_rule_repository::{InMemoryRuleRepository, RuleRepositoryApi};
//!
//! let repo = InMemoryRuleRepository::new();
//! repo.load_from_dir(Path::new("/etc/apura/rules"))?;
//!
//! let rules = repo.icms_rules("06354976000141")?;
//! ```

pub mod error;
pub mod loader;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use error::RepositoryError;
pub use loader::{CompanyRuleDocument, LoadSummary};
pub use ports::inbound::RuleRepositoryApi;
pub use service::{InMemoryRuleRepository, DEFAULT_COMPANY};
