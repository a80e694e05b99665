use super::*;

use std::io;

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

pub(super) fn browser_document() -> Result<Document, DashboardError> {
    let window = web_sys::window().ok_or_else(|| DashboardError::dom("window is unavailable"))?;
    window
        .document()
        .ok_or_else(|| DashboardError::dom("document is unavailable"))
}

pub(super) fn load_config() -> Result<DashboardConfig, DashboardError> {
    match read_config_overrides()? {
        Some(raw) => DashboardConfig::from_json_overrides(&raw),
        None => Ok(DashboardConfig::default()),
    }
}

fn read_config_overrides() -> Result<Option<String>, DashboardError> {
    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL_KEY))
        .map_err(|_| DashboardError::Config(format!("{CONFIG_GLOBAL_KEY} is unreadable")))?;
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    if let Some(raw) = value.as_string() {
        return Ok(Some(raw));
    }
    let raw = js_sys::JSON::stringify(&value)
        .map_err(|_| DashboardError::Config(format!("{CONFIG_GLOBAL_KEY} is not serializable")))?;
    Ok(Some(String::from(raw)))
}

pub(super) fn init_tracing(level: &str) {
    let level = level.trim().parse::<Level>().unwrap_or(Level::INFO);
    let _ = tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_max_level(level)
        .try_init();
}

/// Routes formatted events to the browser console at the matching severity.
struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// One event per writer; emit on drop so multi-part writes land as one line.
impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buffer);
        let line = text.trim_end();
        if line.is_empty() {
            return;
        }
        let line = JsValue::from_str(line);
        if self.level == Level::ERROR {
            web_sys::console::error_1(&line);
        } else if self.level == Level::WARN {
            web_sys::console::warn_1(&line);
        } else if self.level == Level::INFO {
            web_sys::console::info_1(&line);
        } else {
            web_sys::console::debug_1(&line);
        }
    }
}
