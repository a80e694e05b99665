use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

pub const DEFAULT_API_BASE: &str = "/dashboard/api";
pub const DEFAULT_LOG_LINES: u32 = 200;
pub const DEFAULT_MESSAGE_DISMISS_MS: u64 = 2_000;
pub const DEFAULT_STREAM_RECONNECT_MS: u64 = 3_000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Element ids and selectors the control panel binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub prompt_text: String,
    pub save_message: String,
    pub log_lines: String,
    pub logs_display: String,
    pub save_button: String,
    pub reload_button: String,
    pub refresh_logs_button: String,
    pub preset_button_selector: String,
    pub preset_attribute: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            prompt_text: "prompt-text".to_string(),
            save_message: "save-msg".to_string(),
            log_lines: "log-lines".to_string(),
            logs_display: "logs-pre".to_string(),
            save_button: "save-btn".to_string(),
            reload_button: "reload-btn".to_string(),
            refresh_logs_button: "refresh-logs".to_string(),
            preset_button_selector: ".btn-preset".to_string(),
            preset_attribute: "data-preset".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api_base: String,
    pub default_log_lines: u32,
    pub message_dismiss_ms: u64,
    pub stream_reconnect_ms: u64,
    pub log_level: String,
    pub elements: ElementIds,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            default_log_lines: DEFAULT_LOG_LINES,
            message_dismiss_ms: DEFAULT_MESSAGE_DISMISS_MS,
            stream_reconnect_ms: DEFAULT_STREAM_RECONNECT_MS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            elements: ElementIds::default(),
        }
    }
}

impl DashboardConfig {
    /// Parses a JSON override object. Missing keys keep their defaults.
    pub fn from_json_overrides(raw: &str) -> Result<Self, DashboardError> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|error| DashboardError::Config(error.to_string()))?;
        config.validated()
    }

    pub fn validated(mut self) -> Result<Self, DashboardError> {
        let api_base = self.api_base.trim().trim_end_matches('/').to_string();
        if api_base.is_empty() {
            return Err(DashboardError::Config(
                "api_base must not be empty".to_string(),
            ));
        }
        self.api_base = api_base;
        if self.default_log_lines == 0 {
            self.default_log_lines = DEFAULT_LOG_LINES;
        }
        Ok(self)
    }

    pub fn message_dismiss_delay(&self) -> Duration {
        Duration::from_millis(self.message_dismiss_ms)
    }

    pub fn stream_reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.stream_reconnect_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_contract() {
        let config = DashboardConfig::default();
        assert_eq!(config.api_base, "/dashboard/api");
        assert_eq!(config.default_log_lines, 200);
        assert_eq!(config.message_dismiss_delay(), Duration::from_millis(2_000));
        assert_eq!(config.stream_reconnect_delay(), Duration::from_millis(3_000));
        assert_eq!(config.elements.logs_display, "logs-pre");
        assert_eq!(config.elements.preset_button_selector, ".btn-preset");
    }

    #[test]
    fn partial_overrides_keep_remaining_defaults() {
        let config = DashboardConfig::from_json_overrides(
            r#"{"api_base":"/admin/api/","elements":{"prompt_text":"editor"}}"#,
        )
        .expect("valid overrides");
        assert_eq!(config.api_base, "/admin/api");
        assert_eq!(config.elements.prompt_text, "editor");
        assert_eq!(config.elements.save_button, "save-btn");
        assert_eq!(config.stream_reconnect_ms, DEFAULT_STREAM_RECONNECT_MS);
    }

    #[test]
    fn zero_default_log_lines_falls_back() {
        let config = DashboardConfig::from_json_overrides(r#"{"default_log_lines":0}"#)
            .expect("valid overrides");
        assert_eq!(config.default_log_lines, DEFAULT_LOG_LINES);
    }

    #[test]
    fn blank_api_base_is_rejected() {
        let error = DashboardConfig::from_json_overrides(r#"{"api_base":"  "}"#)
            .expect_err("expected config error");
        assert_eq!(error.code(), "config_error");
    }

    #[test]
    fn malformed_overrides_are_rejected() {
        let error =
            DashboardConfig::from_json_overrides("{not json").expect_err("expected config error");
        assert!(matches!(error, DashboardError::Config(_)));
    }
}
