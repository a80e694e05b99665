//! Client core for the prompt dashboard control panel.
//!
//! Everything here is platform neutral: DOM access, HTTP, timers and the
//! server-push channel are reached through traits so the web shell can plug
//! in browser implementations and tests can plug in fakes.

pub mod api;
pub mod config;
pub mod error;
pub mod logs;
pub mod prompt;
pub mod status;
pub mod stream;
pub mod view;

#[cfg(test)]
mod test_support;

pub use api::{
    ApiClient, DashboardTransport, Endpoints, HttpReply, LogsResponse, PromptResponse,
    SavePromptRequest, UpdateResponse,
};
pub use config::{DashboardConfig, ElementIds};
pub use error::DashboardError;
pub use logs::{LogPanel, NO_LOGS_PLACEHOLDER, append_log_line, resolve_line_count};
pub use prompt::PromptPanel;
pub use status::{Delay, MessageToken, Notice, NoticeKind, StatusLine};
pub use stream::{LogLineStream, LogStream, LogStreamSource, StreamHandle, StreamStatus};
pub use view::DashboardView;
