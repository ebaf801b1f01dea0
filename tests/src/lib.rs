//! # Apura Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/       # Cross-crate pipeline flows
//!     ├── pipeline.rs        # Scan pass → engines → ledger, end to end
//!     ├── idempotency.rs     # Rescans never double-count
//!     └── credit_rollover.rs # Cross-period 2%-track credit
//!
//! tests/benches/
//! └── apportionment_benchmarks.rs  # Hot-path performance
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p apura-tests
//!
//! # By category
//! cargo test -p apura-tests integration::pipeline
//! cargo test -p apura-tests integration::idempotency
//! cargo test -p apura-tests integration::credit_rollover
//!
//! # Benchmarks
//! cargo bench -p apura-tests
//! ```

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
