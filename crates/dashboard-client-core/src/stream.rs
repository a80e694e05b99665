use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use futures::{FutureExt, StreamExt};
use futures::future::{AbortHandle, LocalBoxFuture, abortable};
use futures::stream::LocalBoxStream;
use serde::Serialize;

use crate::error::DashboardError;
use crate::logs::append_log_line;
use crate::status::Delay;
use crate::view::DashboardView;

/// One log line per item. An `Err` item ends the subscription.
pub type LogLineStream = LocalBoxStream<'static, Result<String, DashboardError>>;

#[async_trait(?Send)]
pub trait LogStreamSource {
    async fn connect(&self, path: &str) -> Result<LogLineStream, DashboardError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamStatus {
    Idle,
    Connecting,
    Connected,
    /// Subscription lost; a reconnect is scheduled.
    Disconnected,
    Stopped,
}

impl StreamStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Stopped => "stopped",
        }
    }
}

#[derive(Clone)]
pub struct StreamHandle {
    status: Rc<Cell<StreamStatus>>,
    abort: AbortHandle,
}

impl StreamHandle {
    pub fn status(&self) -> StreamStatus {
        self.status.get()
    }

    /// Ends the supervisor wherever it is suspended: waiting on a message,
    /// connecting, or sleeping before a retry.
    pub fn stop(&self) {
        self.abort.abort();
        self.status.set(StreamStatus::Stopped);
        tracing::info!("log stream stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.abort.is_aborted()
    }
}

/// Restartable live-log subscription. Every failure, and every clean end of
/// the stream, reconnects after the same fixed delay until stopped.
pub struct LogStream<S, V, D> {
    source: S,
    view: V,
    delay: D,
    path: String,
    reconnect_delay: Duration,
}

impl<S, V, D> LogStream<S, V, D>
where
    S: LogStreamSource + 'static,
    V: DashboardView + 'static,
    D: Delay + 'static,
{
    pub fn new(source: S, view: V, delay: D, path: String, reconnect_delay: Duration) -> Self {
        Self {
            source,
            view,
            delay,
            path,
            reconnect_delay,
        }
    }

    /// Returns the supervising future (to be spawned by the caller) and the
    /// handle that observes and stops it.
    pub fn start(self) -> (LocalBoxFuture<'static, ()>, StreamHandle) {
        let status = Rc::new(Cell::new(StreamStatus::Idle));
        let (supervisor, abort) = abortable(self.supervise(Rc::clone(&status)));
        let handle = StreamHandle { status, abort };
        let run = async move {
            if supervisor.await.is_err() {
                tracing::debug!("log stream supervisor aborted");
            }
        };
        (run.boxed_local(), handle)
    }

    async fn supervise(self, status: Rc<Cell<StreamStatus>>) {
        let mut attempt: u64 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            transition(&status, StreamStatus::Connecting);
            tracing::debug!(attempt, path = %self.path, "connecting log stream");

            match self.source.connect(&self.path).await {
                Ok(mut lines) => {
                    transition(&status, StreamStatus::Connected);
                    tracing::info!(attempt, "log stream connected");
                    let mut received: u64 = 0;
                    while let Some(item) = lines.next().await {
                        match item {
                            Ok(line) => {
                                received = received.saturating_add(1);
                                append_log_line(&self.view, &line);
                            }
                            Err(error) => {
                                tracing::warn!(
                                    %error,
                                    code = error.code(),
                                    received,
                                    "log stream dropped"
                                );
                                break;
                            }
                        }
                    }
                }
                Err(error) => {
                    tracing::warn!(
                        %error,
                        code = error.code(),
                        attempt,
                        "log stream connect failed"
                    );
                }
            }

            transition(&status, StreamStatus::Disconnected);
            tracing::debug!(
                delay_ms = self.reconnect_delay.as_millis() as u64,
                "scheduling log stream reconnect"
            );
            self.delay.sleep(self.reconnect_delay).await;
        }
    }
}

// Once stopped, late transitions from the aborted supervisor are ignored.
fn transition(status: &Cell<StreamStatus>, next: StreamStatus) {
    if status.get() != StreamStatus::Stopped {
        status.set(next);
    }
}
