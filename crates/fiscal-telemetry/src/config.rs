//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for the pipeline logging stack.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name for log records
    pub service_name: String,

    /// Pipeline stage identifier (01-05)
    pub stage_id: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to enable ANSI console output (for development)
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "apura".to_string(),
            stage_id: "00".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `AP_SERVICE_NAME`: Service name (default: apura)
    /// - `AP_STAGE_ID`: Pipeline stage ID (default: 00)
    /// - `AP_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `AP_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `AP_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("AP_SERVICE_NAME").unwrap_or_else(|_| "apura".to_string()),

            stage_id: env::var("AP_STAGE_ID").unwrap_or_else(|_| "00".to_string()),

            log_level: env::var("AP_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("AP_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("AP_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),
        }
    }

    /// Create configuration for a specific pipeline stage.
    pub fn for_stage(stage_id: &str, stage_name: &str) -> Self {
        let mut config = Self::from_env();
        config.stage_id = stage_id.to_string();
        config.service_name = format!("ap-{}-{}", stage_id, stage_name);
        config
    }

    /// Get the full service name including stage.
    pub fn full_service_name(&self) -> String {
        if self.stage_id == "00" {
            self.service_name.clone()
        } else {
            format!("{}-{}", self.service_name, self.stage_id)
        }
    }
}
