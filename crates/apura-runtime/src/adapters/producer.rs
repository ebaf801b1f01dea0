//! Canonical line item producer over exported sidecar documents

use std::path::{Path, PathBuf};

use ap_01_source_scanner::{LineItemProducer, ScannerError};
use async_trait::async_trait;
use shared_types::CanonicalLineItem;
use tracing::debug;

/// Reads the `<sped-file>.items.json` sidecar the upstream positional
/// parser exports next to each SPED file.
///
/// A SPED file with no sidecar yields an empty batch, so the ICMS run
/// still happens and logs a zero total. A sidecar that exists but
/// cannot be read or parsed is a produce error; the scanner leaves the
/// file unprocessed and retries it next pass.
#[derive(Debug, Clone, Default)]
pub struct JsonLineItemProducer;

impl JsonLineItemProducer {
    pub fn new() -> Self {
        Self
    }

    /// Sidecar path: the SPED file name with `.items.json` appended.
    pub fn sidecar_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(".items.json");
        PathBuf::from(name)
    }
}

#[async_trait]
impl LineItemProducer for JsonLineItemProducer {
    async fn produce(
        &self,
        path: &Path,
        company_id: Option<&str>,
    ) -> Result<Vec<CanonicalLineItem>, ScannerError> {
        let sidecar = Self::sidecar_path(path);
        if !sidecar.exists() {
            debug!(
                "[apura] No items sidecar for {}; producing an empty batch",
                path.display()
            );
            return Ok(Vec::new());
        }

        let raw = std::fs::read_to_string(&sidecar).map_err(|e| ScannerError::Produce {
            path: sidecar.clone(),
            message: e.to_string(),
        })?;
        let items: Vec<CanonicalLineItem> =
            serde_json::from_str(&raw).map_err(|e| ScannerError::Produce {
                path: sidecar.clone(),
                message: e.to_string(),
            })?;

        debug!(
            "[apura] Produced {} items from {} (company {})",
            items.len(),
            sidecar.display(),
            company_id.unwrap_or("-")
        );
        Ok(items)
    }
}
