//! Lane classification
//!
//! Cheapest check first: a PDF named like a schedule never has its
//! content read; everything else is probed for SPED block markers.

use crate::domain::source_file::SourceLane;

/// SPED block markers; any one of them identifies a SPED file.
pub const SPED_MARKERS: [&str; 5] = ["|C100|", "|M100|", "|M200|", "|0000|", "|9999|"];

/// Filename fragments that mark a PDF as a PROTEGE schedule.
pub const SCHEDULE_NAME_HINTS: [&str; 4] = ["protege", "guia", "manual", "auditoria"];

/// True when a PDF's filename already identifies it as a schedule, in
/// which case the content is never read.
pub fn is_schedule_by_name(file_name: &str, extension: &str) -> bool {
    if extension != "pdf" {
        return false;
    }
    let name = file_name.to_lowercase();
    SCHEDULE_NAME_HINTS.iter().any(|hint| name.contains(hint))
}

/// Classify a file by name and content.
///
/// Content is raw bytes: SPED files in the wild are frequently Latin-1,
/// so marker search must not assume UTF-8.
pub fn classify(file_name: &str, extension: &str, content: &[u8]) -> SourceLane {
    if is_schedule_by_name(file_name, extension) {
        return SourceLane::ProtegeSchedule;
    }
    if SPED_MARKERS
        .iter()
        .any(|marker| contains_bytes(content, marker.as_bytes()))
    {
        return SourceLane::Sped;
    }
    SourceLane::Generic
}

fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    if needle.is_empty() || haystack.len() < needle.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}
