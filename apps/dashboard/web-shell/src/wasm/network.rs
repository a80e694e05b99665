use super::*;

use gloo_net::eventsource::futures::EventSource;
use gloo_net::http::{Request, Response};
use web_sys::RequestCredentials;

/// Same-origin `fetch` with cookies, as the dashboard backend expects.
pub(super) struct FetchTransport;

#[async_trait(?Send)]
impl DashboardTransport for FetchTransport {
    async fn get(&self, path: &str) -> Result<HttpReply, DashboardError> {
        let response = Request::get(path)
            .credentials(RequestCredentials::SameOrigin)
            .send()
            .await
            .map_err(|error| map_network_error(path, error))?;
        read_reply(path, response).await
    }

    async fn post(
        &self,
        path: &str,
        json_body: Option<String>,
    ) -> Result<HttpReply, DashboardError> {
        let builder = Request::post(path).credentials(RequestCredentials::SameOrigin);
        let response = match json_body {
            Some(body) => builder
                .header("content-type", JSON_CONTENT_TYPE)
                .body(body)
                .map_err(|error| {
                    DashboardError::network(path, format!("failed to build request body: {error}"))
                })?
                .send()
                .await,
            None => builder.send().await,
        }
        .map_err(|error| map_network_error(path, error))?;
        read_reply(path, response).await
    }
}

async fn read_reply(path: &str, response: Response) -> Result<HttpReply, DashboardError> {
    let status = response.status();
    let body = response.text().await.map_err(|error| {
        DashboardError::network(path, format!("failed to read response body: {error}"))
    })?;
    Ok(HttpReply { status, body })
}

fn map_network_error(path: &str, error: gloo_net::Error) -> DashboardError {
    DashboardError::network(path, error.to_string())
}

/// Server-Sent Events subscription. Dropping the returned stream closes the
/// underlying `EventSource`, which also stops the browser's own retries.
pub(super) struct EventSourceLogs;

#[async_trait(?Send)]
impl LogStreamSource for EventSourceLogs {
    async fn connect(&self, path: &str) -> Result<LogLineStream, DashboardError> {
        let mut source = EventSource::new(path)
            .map_err(|error| DashboardError::Stream(format!("failed to open {path}: {error}")))?;
        let subscription = source.subscribe(STREAM_MESSAGE_EVENT).map_err(|error| {
            DashboardError::Stream(format!("failed to subscribe to {path}: {error}"))
        })?;

        let lines = futures_util::stream::unfold(
            (source, Box::pin(subscription)),
            |(source, mut subscription)| async move {
                let line = match subscription.next().await? {
                    Ok((_, message)) => Ok(message.data().as_string().unwrap_or_default()),
                    Err(error) => Err(DashboardError::Stream(format!("{error:?}"))),
                };
                Some((line, (source, subscription)))
            },
        );
        Ok(lines.boxed_local())
    }
}

pub(super) struct GlooDelay;

#[async_trait(?Send)]
impl Delay for GlooDelay {
    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}
