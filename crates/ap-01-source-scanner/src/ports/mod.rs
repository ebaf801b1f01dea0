//! Port definitions (hexagonal architecture)

pub mod inbound;
pub mod outbound;

pub use inbound::{ScanPassSummary, ScannerStats, SourceScannerApi};
pub use outbound::{
    IcmsExecutor, InMemoryProcessedRegistry, LineItemProducer, ProcessedRegistry, ProtegeExecutor,
    RuleConfigurator, ScheduleExtractor, ScheduleFile,
};
