//! # Fiscal Telemetry
//!
//! Structured logging setup for the Apura fiscal pipeline.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fiscal_telemetry::{TelemetryConfig, init_telemetry};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(config).expect("Failed to init telemetry");
//!
//!     // Your application code here
//!     // Logs are now being collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `AP_SERVICE_NAME` | `apura` | Service name in log records |
//! | `AP_STAGE_ID` | `00` | Pipeline stage identifier |
//! | `AP_LOG_LEVEL` | `info` | Log level filter |
//! | `AP_JSON_LOGS` | auto | JSON logs (on inside containers) |

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::StructuredLogger;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize log subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize the telemetry stack.
///
/// Returns a guard that must be held for the lifetime of the application.
///
/// # Example
///
/// ```rust,ignore
/// let config = TelemetryConfig::from_env();
/// let _guard = init_telemetry(config)?;
///
/// // Application runs here...
/// // Guard is dropped on exit
/// ```
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let logging_guard = logging::init_logging(&config)?;

    Ok(TelemetryGuard {
        _logging: logging_guard,
    })
}

/// Guard that keeps telemetry active. Drop to shutdown.
pub struct TelemetryGuard {
    _logging: StructuredLogger,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}

/// Convenience macro for creating a span with stage context.
///
/// # Example
///
/// ```rust,ignore
/// use fiscal_telemetry::stage_span;
///
/// fn compute_period() {
///     let _span = stage_span!("compute_period", stage = "icms", company = "06354976000141");
///     // ... computation logic
/// }
/// ```
#[macro_export]
macro_rules! stage_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
