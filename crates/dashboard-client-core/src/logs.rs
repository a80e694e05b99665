use std::num::IntErrorKind;

use crate::api::{ApiClient, DashboardTransport};
use crate::error::DashboardError;
use crate::view::DashboardView;

pub const NO_LOGS_PLACEHOLDER: &str = "No logs found";

pub struct LogPanel<T, V> {
    client: ApiClient<T>,
    view: V,
    default_lines: u32,
}

impl<T, V> LogPanel<T, V>
where
    T: DashboardTransport,
    V: DashboardView,
{
    pub fn new(client: ApiClient<T>, view: V, default_lines: u32) -> Self {
        Self {
            client,
            view,
            default_lines,
        }
    }

    /// Fetches the last N lines and replaces the whole display with them.
    pub async fn load_logs(&self) -> Result<u32, DashboardError> {
        let lines = resolve_line_count(&self.view.log_lines_input(), self.default_lines);
        let response = self.client.fetch_logs(lines).await?;
        if let Some(error) = response.error.as_deref() {
            tracing::warn!(error, "logs endpoint reported an error");
        }
        tracing::debug!(lines, path = response.path.as_deref(), "log snapshot loaded");
        let text = response
            .logs
            .unwrap_or_else(|| NO_LOGS_PLACEHOLDER.to_string());
        self.view.set_logs_text(&text);
        Ok(lines)
    }
}

/// Reads the line-count input. Blank, zero, or non-numeric input falls back
/// to `default_lines`; counts past `u32::MAX` saturate.
pub fn resolve_line_count(raw: &str, default_lines: u32) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(lines) if lines > 0 => lines,
        Err(error) if *error.kind() == IntErrorKind::PosOverflow => u32::MAX,
        _ => default_lines,
    }
}

/// Appends one streamed line below the current content and pins the view to
/// the bottom.
pub fn append_log_line<V: DashboardView + ?Sized>(view: &V, line: &str) {
    let mut text = view.logs_text();
    text.push('\n');
    text.push_str(line);
    view.set_logs_text(&text);
    view.scroll_logs_to_bottom();
}
