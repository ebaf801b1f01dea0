//! Discovered source files and their processing lanes

use std::fmt;
use std::path::PathBuf;
use std::time::SystemTime;

use shared_types::Period;

/// The processing lane a discovered file is dispatched on.
///
/// Lanes are a closed set; dispatch is a single match with one handler
/// per lane, so adding a lane is a one-arm change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLane {
    /// Delimiter-based fiscal bookkeeping file; feeds the line item
    /// producer and then the ICMS engine.
    Sped,
    /// PROTEGE benefit schedule; updates the rule repository and may
    /// trigger a PROTEGE computation.
    ProtegeSchedule,
    /// Recognized but never computed; an explicit no-op terminal lane.
    Generic,
}

impl SourceLane {
    /// Stable uppercase tag used in logs and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLane::Sped => "SPED",
            SourceLane::ProtegeSchedule => "PROTEGE_SCHEDULE",
            SourceLane::Generic => "GENERIC",
        }
    }
}

impl fmt::Display for SourceLane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One file discovered during a scan pass.
///
/// Created per pass and discarded after dispatch; the absolute path is
/// the deduplication identity held in the processed registry.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Absolute path.
    pub path: PathBuf,
    /// File name without directories.
    pub file_name: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Extension, lowercased, without the dot. Empty when absent.
    pub extension: String,
    /// Company identifier inferred from the path, when any.
    pub company_id: Option<String>,
    /// Calendar year inferred from the path, when any.
    pub year: Option<u16>,
    /// Calendar month inferred from the path, when any.
    pub month: Option<u8>,
    /// Last-modified timestamp, when the filesystem reports one.
    pub modified_at: Option<SystemTime>,
    /// Assigned processing lane.
    pub lane: SourceLane,
}

impl SourceFile {
    /// The fiscal period, when both year and month were inferred and
    /// form a valid `YYYYMM`.
    pub fn period(&self) -> Option<Period> {
        match (self.year, self.month) {
            (Some(year), Some(month)) => Period::new(year, month).ok(),
            _ => None,
        }
    }
}
