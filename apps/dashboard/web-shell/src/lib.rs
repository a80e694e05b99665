#[cfg(target_arch = "wasm32")]
mod wasm_constants;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use async_trait::async_trait;
    use dashboard_client_core::{
        ApiClient, DashboardConfig, DashboardError, DashboardTransport, DashboardView, Delay,
        ElementIds, HttpReply, LogLineStream, LogPanel, LogStream, LogStreamSource, PromptPanel,
        StatusLine, StreamHandle, StreamStatus,
    };
    use futures_util::StreamExt;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlTextAreaElement};

    use crate::wasm_constants::*;

    mod dom;
    mod lifecycle;
    mod network;

    use dom::{DomView, bind_controls};
    use lifecycle::*;
    use network::{EventSourceLogs, FetchTransport, GlooDelay};

    type WebPromptPanel = PromptPanel<FetchTransport, DomView>;
    type WebLogPanel = LogPanel<FetchTransport, DomView>;

    thread_local! {
        static CLICK_HANDLERS: RefCell<Vec<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(Vec::new()) };
        static LOG_STREAM: RefCell<Option<StreamHandle>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        let (config, config_error) = match load_config() {
            Ok(config) => (config, None),
            Err(error) => (DashboardConfig::default(), Some(error)),
        };
        init_tracing(&config.log_level);
        if let Some(error) = config_error {
            tracing::warn!(%error, "ignoring dashboard config overrides");
        }
        if let Err(error) = boot(&config) {
            tracing::error!(%error, code = error.code(), "dashboard boot failed");
        }
    }

    #[wasm_bindgen]
    pub fn stream_status() -> String {
        LOG_STREAM.with(|slot| {
            slot.borrow()
                .as_ref()
                .map_or(StreamStatus::Idle, StreamHandle::status)
                .as_str()
                .to_string()
        })
    }

    #[wasm_bindgen]
    pub fn stop_log_stream() {
        LOG_STREAM.with(|slot| {
            if let Some(handle) = slot.borrow().as_ref() {
                handle.stop();
            }
        });
    }

    fn boot(config: &DashboardConfig) -> Result<(), DashboardError> {
        let document = browser_document()?;
        let view = DomView::locate(&document, &config.elements)?;
        let client = ApiClient::new(FetchTransport, &config.api_base);
        let status = StatusLine::new(view.clone());

        let controls = Controls {
            prompt: Rc::new(PromptPanel::new(client.clone(), view.clone(), status)),
            logs: Rc::new(LogPanel::new(
                client.clone(),
                view.clone(),
                config.default_log_lines,
            )),
            dismiss_after: config.message_dismiss_delay(),
        };
        bind_controls(&document, &config.elements, &controls)?;

        controls.load_prompt();
        controls.load_logs();
        start_log_stream(
            view,
            client.endpoints().stream(),
            config.stream_reconnect_delay(),
        );
        tracing::info!(api_base = %config.api_base, "dashboard ready");
        Ok(())
    }

    /// Click targets. Each action runs as its own task; results land in the
    /// DOM in whatever order the responses arrive.
    #[derive(Clone)]
    pub(super) struct Controls {
        prompt: Rc<WebPromptPanel>,
        logs: Rc<WebLogPanel>,
        dismiss_after: Duration,
    }

    impl Controls {
        pub(super) fn load_prompt(&self) {
            let prompt = Rc::clone(&self.prompt);
            spawn_local(async move {
                if let Err(error) = prompt.load_prompt().await {
                    report_failure("load_prompt", &error);
                }
            });
        }

        pub(super) fn save_prompt(&self) {
            let controls = self.clone();
            spawn_local(async move {
                let saved = controls
                    .prompt
                    .save_prompt_and_dismiss(&GlooDelay, controls.dismiss_after)
                    .await;
                if let Err(error) = saved {
                    report_failure("save_prompt", &error);
                }
            });
        }

        pub(super) fn apply_preset(&self, name: String) {
            let controls = self.clone();
            spawn_local(async move {
                let applied = controls
                    .prompt
                    .apply_preset_and_dismiss(&name, &GlooDelay, controls.dismiss_after)
                    .await;
                if let Err(error) = applied {
                    report_failure("apply_preset", &error);
                }
            });
        }

        pub(super) fn load_logs(&self) {
            let logs = Rc::clone(&self.logs);
            spawn_local(async move {
                if let Err(error) = logs.load_logs().await {
                    report_failure("load_logs", &error);
                }
            });
        }
    }

    fn start_log_stream(view: DomView, path: String, reconnect_delay: Duration) {
        let stream = LogStream::new(EventSourceLogs, view, GlooDelay, path, reconnect_delay);
        let (run, handle) = stream.start();
        LOG_STREAM.with(|slot| {
            if let Some(previous) = slot.borrow_mut().replace(handle) {
                previous.stop();
            }
        });
        spawn_local(run);
    }

    // Transport failures leave the affected region as it was.
    fn report_failure(operation: &'static str, error: &DashboardError) {
        tracing::warn!(operation, %error, code = error.code(), "dashboard request failed");
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::{stop_log_stream, stream_status};

#[cfg(not(target_arch = "wasm32"))]
pub fn stream_status() -> String {
    "idle".to_string()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn stop_log_stream() {}
