//! Outbound Ports (Driven Ports)
//!
//! Everything the scanner needs from its surroundings: the line item
//! producer, the schedule extractor, the two engines, the rule
//! repository, and the processed-path registry. The runtime wires real
//! implementations; tests plug in mocks.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{
    ApportionmentResult, CanonicalLineItem, Period, ProtegeResult, RuleConfiguration,
};

use crate::error::ScannerError;

/// One schedule document handed to the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleFile {
    /// File name without directories.
    pub name: String,
    /// Absolute path.
    pub path: PathBuf,
}

/// SPED-to-canonical-items parser boundary (Driven Port)
///
/// The real positional parser is upstream; adapters deserialize its
/// exported items.
#[async_trait]
pub trait LineItemProducer: Send + Sync {
    /// Produce the canonical line items recorded in a SPED file.
    async fn produce(
        &self,
        path: &Path,
        company_id: Option<&str>,
    ) -> Result<Vec<CanonicalLineItem>, ScannerError>;
}

/// Schedule-extraction collaborator boundary (Driven Port)
#[async_trait]
pub trait ScheduleExtractor: Send + Sync {
    /// Turn schedule documents into a rule configuration.
    async fn extract(
        &self,
        company_id: Option<&str>,
        files: &[ScheduleFile],
    ) -> Result<RuleConfiguration, ScannerError>;
}

/// ICMS computation trigger (Driven Port)
#[async_trait]
pub trait IcmsExecutor: Send + Sync {
    /// Run apportionment over a produced batch. Infallible by contract:
    /// engine trouble comes back as a result with status `erro`.
    async fn run_icms(
        &self,
        company_id: Option<&str>,
        items: Vec<CanonicalLineItem>,
    ) -> ApportionmentResult;
}

/// PROTEGE computation trigger (Driven Port)
#[async_trait]
pub trait ProtegeExecutor: Send + Sync {
    /// Run the dual-track computation for an inferred period.
    async fn run_protege(&self, company_id: Option<&str>, period: Period) -> ProtegeResult;
}

/// Rule repository update boundary (Driven Port)
#[async_trait]
pub trait RuleConfigurator: Send + Sync {
    /// Install an extracted configuration for a company.
    async fn apply(
        &self,
        company_id: Option<&str>,
        configuration: RuleConfiguration,
    ) -> Result<(), ScannerError>;
}

/// Processed-path registry (Driven Port)
///
/// Identity is the absolute path; the set only shrinks on explicit
/// operator action. Implementations own their synchronization.
pub trait ProcessedRegistry: Send + Sync {
    /// Whether the path was already dispatched.
    fn seen(&self, path: &Path) -> bool;

    /// Record a dispatched path.
    fn mark_seen(&self, path: &Path);

    /// Forget everything.
    fn clear(&self);

    /// Number of recorded paths.
    fn len(&self) -> usize;

    /// True when nothing has been recorded.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime in-memory registry; the default backing.
#[derive(Default)]
pub struct InMemoryProcessedRegistry {
    paths: RwLock<HashSet<PathBuf>>,
}

impl InMemoryProcessedRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProcessedRegistry for InMemoryProcessedRegistry {
    fn seen(&self, path: &Path) -> bool {
        self.paths.read().contains(path)
    }

    fn mark_seen(&self, path: &Path) {
        self.paths.write().insert(path.to_path_buf());
    }

    fn clear(&self) {
        self.paths.write().clear();
    }

    fn len(&self) -> usize {
        self.paths.read().len()
    }
}
