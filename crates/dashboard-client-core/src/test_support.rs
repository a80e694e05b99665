use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;

use crate::api::{DashboardTransport, HttpReply};
use crate::error::DashboardError;
use crate::status::Delay;
use crate::stream::{LogLineStream, LogStreamSource, StreamHandle};
use crate::view::DashboardView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub body: Option<String>,
}

/// Routes replies by exact path; unrouted paths fail like a dropped
/// connection.
#[derive(Clone, Default)]
pub struct FakeTransport {
    replies: Rc<RefCell<HashMap<String, HttpReply>>>,
    requests: Rc<RefCell<Vec<RecordedRequest>>>,
}

impl FakeTransport {
    pub fn reply_to(&self, path: &str, status: u16, body: serde_json::Value) {
        self.reply_raw(path, status, &body.to_string());
    }

    pub fn reply_raw(&self, path: &str, status: u16, body: &str) {
        self.replies.borrow_mut().insert(
            path.to_string(),
            HttpReply {
                status,
                body: body.to_string(),
            },
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    fn respond(
        &self,
        method: &'static str,
        path: &str,
        body: Option<String>,
    ) -> Result<HttpReply, DashboardError> {
        self.requests.borrow_mut().push(RecordedRequest {
            method,
            path: path.to_string(),
            body,
        });
        self.replies
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| DashboardError::network(path, "connection refused"))
    }
}

#[async_trait(?Send)]
impl DashboardTransport for FakeTransport {
    async fn get(&self, path: &str) -> Result<HttpReply, DashboardError> {
        self.respond("GET", path, None)
    }

    async fn post(
        &self,
        path: &str,
        json_body: Option<String>,
    ) -> Result<HttpReply, DashboardError> {
        self.respond("POST", path, json_body)
    }
}

#[derive(Debug, Default)]
struct ViewState {
    prompt: String,
    status_message: String,
    log_lines_input: String,
    logs: String,
    scrolled_to_bottom: bool,
}

#[derive(Clone, Default)]
pub struct RecordingView {
    state: Rc<RefCell<ViewState>>,
}

impl RecordingView {
    pub fn prompt(&self) -> String {
        self.state.borrow().prompt.clone()
    }

    pub fn status_message(&self) -> String {
        self.state.borrow().status_message.clone()
    }

    pub fn logs(&self) -> String {
        self.state.borrow().logs.clone()
    }

    pub fn set_log_lines_input(&self, raw: &str) {
        self.state.borrow_mut().log_lines_input = raw.to_string();
    }

    pub fn scrolled_to_bottom(&self) -> bool {
        self.state.borrow().scrolled_to_bottom
    }
}

impl DashboardView for RecordingView {
    fn prompt_text(&self) -> String {
        self.prompt()
    }

    fn set_prompt_text(&self, text: &str) {
        self.state.borrow_mut().prompt = text.to_string();
    }

    fn set_status_message(&self, text: &str) {
        self.state.borrow_mut().status_message = text.to_string();
    }

    fn log_lines_input(&self) -> String {
        self.state.borrow().log_lines_input.clone()
    }

    fn logs_text(&self) -> String {
        self.logs()
    }

    fn set_logs_text(&self, text: &str) {
        let mut state = self.state.borrow_mut();
        state.logs = text.to_string();
        state.scrolled_to_bottom = false;
    }

    fn scroll_logs_to_bottom(&self) {
        self.state.borrow_mut().scrolled_to_bottom = true;
    }
}

/// Records requested sleeps and resolves immediately. A watched view has its
/// status message captured at the start of every sleep.
#[derive(Clone, Default)]
pub struct RecordingDelay {
    sleeps: Rc<RefCell<Vec<Duration>>>,
    watched: Option<RecordingView>,
    messages_while_sleeping: Rc<RefCell<Vec<String>>>,
}

impl RecordingDelay {
    pub fn watching(view: &RecordingView) -> Self {
        Self {
            watched: Some(view.clone()),
            ..Self::default()
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }

    pub fn messages_while_sleeping(&self) -> Vec<String> {
        self.messages_while_sleeping.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Delay for RecordingDelay {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        if let Some(view) = &self.watched {
            self.messages_while_sleeping
                .borrow_mut()
                .push(view.status_message());
        }
    }
}

pub enum SourceAttempt {
    Refused,
    Lines(Vec<Result<String, DashboardError>>),
}

/// Plays back one scripted attempt per connect. Once the script runs out it
/// stops the registered handle and hands back a stream that never yields.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    attempts: Rc<RefCell<VecDeque<SourceAttempt>>>,
    connected_paths: Rc<RefCell<Vec<String>>>,
    stopper: Rc<RefCell<Option<StreamHandle>>>,
}

impl ScriptedSource {
    pub fn push(&self, attempt: SourceAttempt) {
        self.attempts.borrow_mut().push_back(attempt);
    }

    pub fn stop_when_exhausted(&self, handle: StreamHandle) {
        *self.stopper.borrow_mut() = Some(handle);
    }

    pub fn connected_paths(&self) -> Vec<String> {
        self.connected_paths.borrow().clone()
    }
}

#[async_trait(?Send)]
impl LogStreamSource for ScriptedSource {
    async fn connect(&self, path: &str) -> Result<LogLineStream, DashboardError> {
        self.connected_paths.borrow_mut().push(path.to_string());
        let next = self.attempts.borrow_mut().pop_front();
        match next {
            Some(SourceAttempt::Refused) => Err(DashboardError::Stream("refused".to_string())),
            Some(SourceAttempt::Lines(lines)) => Ok(stream::iter(lines).boxed_local()),
            None => {
                if let Some(handle) = self.stopper.borrow().as_ref() {
                    handle.stop();
                }
                Ok(stream::pending().boxed_local())
            }
        }
    }
}
