//! Runtime configuration
//!
//! Nested sections with `APURA_*` environment overrides. A malformed
//! numeric override is logged and ignored rather than killing startup;
//! `validate()` runs after overrides are applied and is the gate that
//! actually rejects a broken configuration.

use std::path::PathBuf;

use ap_01_source_scanner::{ScannerConfig, ScannerError};
use thiserror::Error;
use tracing::warn;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// Scanner section: what to walk and how.
    pub scanner: ScannerSettings,
    /// Ledger section: where credits persist.
    pub ledger: LedgerSettings,
    /// Rules section: where company rule documents load from.
    pub rules: RulesSettings,
    /// Telemetry section: operator-surface cadence.
    pub telemetry: TelemetrySettings,
}

impl RuntimeConfig {
    /// Validate the configuration after overrides.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scanner.root.as_os_str().is_empty() {
            return Err(ConfigError::EmptyScanRoot);
        }
        if self.telemetry.stats_interval_secs == 0 {
            return Err(ConfigError::ZeroStatsInterval);
        }
        self.scanner.pass.validate()?;
        Ok(())
    }
}

/// Scanner settings.
#[derive(Debug, Clone)]
pub struct ScannerSettings {
    /// Root directory walked every pass.
    pub root: PathBuf,
    /// Pass behavior handed to the scanner service.
    pub pass: ScannerConfig,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./fiscal"),
            pass: ScannerConfig::default(),
        }
    }
}

/// Ledger storage settings.
#[derive(Debug, Clone)]
pub struct LedgerSettings {
    /// Data directory for the file-backed credit store. `None` keeps the
    /// ledger in memory; credits then die with the process.
    pub data_dir: Option<PathBuf>,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            data_dir: Some(PathBuf::from("./data")),
        }
    }
}

/// Rule repository settings.
#[derive(Debug, Clone)]
pub struct RulesSettings {
    /// Directory of per-company rule documents loaded at startup. A
    /// missing directory starts the repository empty, which is valid.
    pub rules_dir: Option<PathBuf>,
}

impl Default for RulesSettings {
    fn default() -> Self {
        Self {
            rules_dir: Some(PathBuf::from("./rules")),
        }
    }
}

/// Operator-surface settings.
#[derive(Debug, Clone)]
pub struct TelemetrySettings {
    /// Seconds between stats snapshot log lines.
    pub stats_interval_secs: u64,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            stats_interval_secs: 60,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The scan root resolved to an empty path.
    #[error("scanner.root must not be empty")]
    EmptyScanRoot,

    /// The stats ticker would never fire.
    #[error("telemetry.stats_interval_secs must be positive")]
    ZeroStatsInterval,

    /// The scanner section failed its own validation.
    #[error("invalid scanner configuration: {0}")]
    Scanner(#[from] ScannerError),
}

/// Build the runtime configuration: defaults, then environment
/// overrides.
pub fn load_config() -> RuntimeConfig {
    let mut config = RuntimeConfig::default();

    if let Ok(root) = std::env::var("APURA_SCAN_ROOT") {
        config.scanner.root = PathBuf::from(root);
    }
    if let Some(interval) = env_u64("APURA_SCAN_INTERVAL_MS") {
        config.scanner.pass.scan_interval_ms = interval;
    }
    if let Some(max) = env_u64("APURA_MAX_FILE_SIZE_BYTES") {
        config.scanner.pass.max_file_size_bytes = max;
    }
    if let Ok(dir) = std::env::var("APURA_DATA_DIR") {
        config.ledger.data_dir = Some(PathBuf::from(dir));
    }
    if let Ok(dir) = std::env::var("APURA_RULES_DIR") {
        config.rules.rules_dir = Some(PathBuf::from(dir));
    }
    if let Some(secs) = env_u64("APURA_STATS_INTERVAL_SECS") {
        config.telemetry.stats_interval_secs = secs;
    }

    config
}

fn env_u64(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("[apura] Ignoring {}: '{}' is not a number", name, raw);
            None
        }
    }
}
