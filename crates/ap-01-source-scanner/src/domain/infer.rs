//! Company and period inference from path segments
//!
//! Best-effort: trees in the wild are inconsistent, so any of the three
//! outputs may stay unset and downstream handlers must cope. Only
//! directory segments are considered; the file name never contributes.

use std::path::Path;

use crate::domain::config::ScannerConfig;

/// What a path revealed about its file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathInference {
    /// Segment following a company-keyword segment, verbatim.
    pub company_id: Option<String>,
    /// First segment that is (or carries) a `20xx` year.
    pub year: Option<u16>,
    /// First month-shaped segment seen after the year.
    pub month: Option<u8>,
}

/// Infer company, year, and month from a file's directory segments.
///
/// A segment containing a company keyword (case-insensitive) marks the
/// NEXT segment as the company identifier. A segment that is a bare
/// `20xx` sets the year, as does a segment containing a year hint plus
/// an embedded `20xx`. Once a year is set, a 1-2 digit month segment
/// sets the month. First hit wins for all three.
pub fn infer_from_path(path: &Path, config: &ScannerConfig) -> PathInference {
    let mut inference = PathInference::default();
    let mut next_is_company = false;

    let Some(parent) = path.parent() else {
        return inference;
    };

    for component in parent.components() {
        let Some(segment) = component.as_os_str().to_str() else {
            continue;
        };

        if next_is_company {
            next_is_company = false;
            if inference.company_id.is_none() {
                inference.company_id = Some(segment.to_string());
                continue;
            }
        }

        let lower = segment.to_lowercase();
        if inference.company_id.is_none()
            && config
                .company_folder_keywords
                .iter()
                .any(|kw| lower.contains(&kw.to_lowercase()))
        {
            next_is_company = true;
            continue;
        }

        if inference.year.is_none() {
            if let Some(year) = year_of_segment(&lower, config) {
                inference.year = Some(year);
                continue;
            }
        }

        if inference.year.is_some() && inference.month.is_none() {
            if let Some(month) = month_of_segment(segment) {
                inference.month = Some(month);
            }
        }
    }

    inference
}

fn year_of_segment(lower: &str, config: &ScannerConfig) -> Option<u16> {
    if is_bare_year(lower) {
        return lower.parse().ok();
    }
    if config
        .year_folder_hints
        .iter()
        .any(|hint| lower.contains(&hint.to_lowercase()))
    {
        return embedded_year(lower);
    }
    None
}

fn is_bare_year(segment: &str) -> bool {
    segment.len() == 4 && segment.starts_with("20") && segment.bytes().all(|b| b.is_ascii_digit())
}

/// First standalone 4-digit `20xx` run inside a segment like
/// "Exercicio 2025".
fn embedded_year(segment: &str) -> Option<u16> {
    let bytes = segment.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        if !bytes[start].is_ascii_digit() {
            start += 1;
            continue;
        }
        let mut end = start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end - start == 4 && &segment[start..start + 2] == "20" {
            return segment[start..end].parse().ok();
        }
        start = end;
    }
    None
}

fn month_of_segment(segment: &str) -> Option<u8> {
    if segment.is_empty() || segment.len() > 2 || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match segment.parse::<u8>() {
        Ok(month) if (1..=12).contains(&month) => Some(month),
        _ => None,
    }
}
