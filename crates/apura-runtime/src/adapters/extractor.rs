//! Schedule extractor over exported sidecar documents

use std::path::{Path, PathBuf};

use ap_01_source_scanner::{ScannerError, ScheduleExtractor, ScheduleFile};
use async_trait::async_trait;
use shared_types::RuleConfiguration;
use tracing::debug;

/// Reads the `<schedule>.rules.json` sidecar the upstream schedule
/// extraction step exports next to each PROTEGE schedule document.
///
/// The first supplied document with a sidecar wins. Unlike SPED items,
/// a schedule dispatch with no sidecar at all is an extraction error:
/// the whole point of the dispatch is the rule update, so there is
/// nothing useful to do without one.
#[derive(Debug, Clone, Default)]
pub struct DirScheduleExtractor;

impl DirScheduleExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Sidecar path: the schedule file name with `.rules.json` appended.
    pub fn sidecar_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(".rules.json");
        PathBuf::from(name)
    }
}

#[async_trait]
impl ScheduleExtractor for DirScheduleExtractor {
    async fn extract(
        &self,
        company_id: Option<&str>,
        files: &[ScheduleFile],
    ) -> Result<RuleConfiguration, ScannerError> {
        let company = company_id.unwrap_or("-");

        for file in files {
            let sidecar = Self::sidecar_path(&file.path);
            if !sidecar.exists() {
                continue;
            }

            let raw = std::fs::read_to_string(&sidecar).map_err(|e| ScannerError::Extraction {
                company_id: company.to_string(),
                message: format!("{}: {}", sidecar.display(), e),
            })?;
            let configuration: RuleConfiguration =
                serde_json::from_str(&raw).map_err(|e| ScannerError::Extraction {
                    company_id: company.to_string(),
                    message: format!("{}: {}", sidecar.display(), e),
                })?;

            debug!(
                "[apura] Extracted {} rules and {} benefits from {}",
                configuration.rules.len(),
                configuration.benefits.len(),
                sidecar.display()
            );
            return Ok(configuration);
        }

        Err(ScannerError::Extraction {
            company_id: company.to_string(),
            message: format!(
                "no rules sidecar next to any of the {} schedule documents",
                files.len()
            ),
        })
    }
}
