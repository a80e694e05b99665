#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DashboardError {
    #[error("request to {path} failed: {message}")]
    Network { path: String, message: String },
    #[error("response from {path} is not valid json: {message}")]
    Decode { path: String, message: String },
    #[error("failed to encode request body: {0}")]
    Encode(String),
    #[error("log stream error: {0}")]
    Stream(String),
    #[error("dom error: {0}")]
    Dom(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl DashboardError {
    pub fn network(path: &str, message: impl Into<String>) -> Self {
        Self::Network {
            path: path.to_string(),
            message: message.into(),
        }
    }

    pub fn decode(path: &str, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.to_string(),
            message: message.into(),
        }
    }

    pub fn dom(message: impl Into<String>) -> Self {
        Self::Dom(message.into())
    }

    /// Stable machine-readable code, used as a structured logging field.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network { .. } => "network_error",
            Self::Decode { .. } => "decode_failed",
            Self::Encode(_) => "request_body_serialize_failed",
            Self::Stream(_) => "stream_error",
            Self::Dom(_) => "dom_error",
            Self::Config(_) => "config_error",
        }
    }
}
