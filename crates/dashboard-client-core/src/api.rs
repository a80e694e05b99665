use std::borrow::Cow;
use std::rc::Rc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DashboardError;

/// Raw reply from the same-origin backend. Status is informational only:
/// error bodies are decoded like any other JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

#[async_trait(?Send)]
pub trait DashboardTransport {
    async fn get(&self, path: &str) -> Result<HttpReply, DashboardError>;
    async fn post(
        &self,
        path: &str,
        json_body: Option<String>,
    ) -> Result<HttpReply, DashboardError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PromptResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub prompt: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavePromptRequest<'a> {
    pub prompt: &'a str,
}

/// Reply to both the prompt save and the preset apply calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub ok: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub prompt: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<String>,
}

impl UpdateResponse {
    pub fn succeeded(&self) -> bool {
        self.ok.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LogsResponse {
    #[serde(default, deserialize_with = "lenient")]
    pub logs: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<String>,
}

// A field with the wrong JSON type reads as absent rather than failing the
// whole body.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(api_base: &str) -> Self {
        Self {
            base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn prompt(&self) -> String {
        format!("{}/prompt", self.base)
    }

    pub fn preset(&self, name: &str) -> String {
        format!("{}/preset/{}", self.base, path_segment(name))
    }

    pub fn logs(&self, lines: u32) -> String {
        format!("{}/logs?lines={lines}", self.base)
    }

    pub fn stream(&self) -> String {
        format!("{}/stream", self.base)
    }
}

// `.` and `..` survive percent-encoding but are resolved as dot segments, so
// they are escaped by hand to stay a single segment under `/preset/`.
fn path_segment(name: &str) -> Cow<'_, str> {
    match name {
        "." | ".." => Cow::Owned(name.replace('.', "%2E")),
        _ => urlencoding::encode(name),
    }
}

pub struct ApiClient<T> {
    transport: Rc<T>,
    endpoints: Endpoints,
}

impl<T> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Rc::clone(&self.transport),
            endpoints: self.endpoints.clone(),
        }
    }
}

impl<T: DashboardTransport> ApiClient<T> {
    pub fn new(transport: T, api_base: &str) -> Self {
        Self {
            transport: Rc::new(transport),
            endpoints: Endpoints::new(api_base),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, DashboardError> {
        let reply = self.transport.get(path).await?;
        decode_reply(path, &reply)
    }

    pub async fn post_json<B, R>(&self, path: &str, body: Option<&B>) -> Result<R, DashboardError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|error| DashboardError::Encode(error.to_string()))?;
        let reply = self.transport.post(path, body).await?;
        decode_reply(path, &reply)
    }

    pub async fn fetch_prompt(&self) -> Result<PromptResponse, DashboardError> {
        self.get_json(&self.endpoints.prompt()).await
    }

    pub async fn save_prompt(&self, prompt: &str) -> Result<UpdateResponse, DashboardError> {
        let request = SavePromptRequest { prompt };
        self.post_json(&self.endpoints.prompt(), Some(&request)).await
    }

    pub async fn apply_preset(&self, name: &str) -> Result<UpdateResponse, DashboardError> {
        self.post_json::<(), _>(&self.endpoints.preset(name), None).await
    }

    pub async fn fetch_logs(&self, lines: u32) -> Result<LogsResponse, DashboardError> {
        self.get_json(&self.endpoints.logs(lines)).await
    }
}

fn decode_reply<R: DeserializeOwned>(path: &str, reply: &HttpReply) -> Result<R, DashboardError> {
    if !(200..=299).contains(&reply.status) {
        tracing::debug!(
            path,
            status = reply.status,
            "dashboard api returned non-success status"
        );
    }
    serde_json::from_str(&reply.body)
        .map_err(|error| DashboardError::decode(path, error.to_string()))
}
