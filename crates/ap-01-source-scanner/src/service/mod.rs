//! Service layer for the source scanner

pub mod scanner;

pub use scanner::{run_scan_loop, ScannerService};
