use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

/// Failure payload in the shape consumers inspect: `status` (transport status as a
/// string), optionally `httpStatus` and `message`, plus every normalized body field.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedError {
    payload: Map<String, Value>,
}

impl NormalizedError {
    /// Error raised for a 2xx response whose body carries an application error code.
    ///
    /// Body fields come first, `status` is written last and always wins.
    pub fn application(status: u16, body: Value) -> Self {
        let mut payload = body_fields(body);
        payload.insert("status".to_string(), Value::String(status.to_string()));
        Self { payload }
    }

    /// Error raised for a non-2xx response.
    ///
    /// `message` falls back to "Request failed with status code N"; body fields are
    /// merged last and override the defaults.
    pub fn http(status: u16, body: Value) -> Self {
        let fields = body_fields(body);
        let message = fields
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Request failed with status code {}", status));

        let mut payload = Map::new();
        payload.insert("status".to_string(), Value::String(status.to_string()));
        payload.insert("httpStatus".to_string(), Value::from(status));
        payload.insert("message".to_string(), Value::String(message));
        payload.extend(fields);
        Self { payload }
    }

    pub fn status(&self) -> String {
        match self.payload.get("status") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    pub fn http_status(&self) -> Option<u16> {
        self.payload
            .get("httpStatus")
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
    }

    pub fn message(&self) -> Option<&str> {
        self.payload.get("message").and_then(Value::as_str)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.payload.get(name)
    }

    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.payload)
    }
}

/// Non-object bodies are kept whole under `data`.
fn body_fields(body: Value) -> Map<String, Value> {
    match body {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    }
}

impl fmt::Display for NormalizedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "status {}: {}", self.status(), message),
            None => write!(f, "status {}", self.status()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received (connect, timeout, TLS, ...)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-2xx status
    #[error("HTTP error ({0})")]
    Http(NormalizedError),
    /// A 2xx body carried an application error code
    #[error("application error ({0})")]
    Application(NormalizedError),
    #[error("response body of {actual} bytes exceeds the {limit} byte limit")]
    BodyTooLarge { limit: usize, actual: usize },
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn normalized(&self) -> Option<&NormalizedError> {
        match self {
            ApiError::Http(err) | ApiError::Application(err) => Some(err),
            _ => None,
        }
    }

    /// Transport status (as a string) when the server responded at all.
    pub fn status(&self) -> Option<String> {
        self.normalized().map(NormalizedError::status)
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}
