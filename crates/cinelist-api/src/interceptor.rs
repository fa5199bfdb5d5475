use cinelist_config::AppErrorConfig;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ApiError, NormalizedError};
use crate::normalize::{camel_case, normalize_body};

/// Hook run on every outgoing request before it is sent.
pub trait RequestInterceptor: Send + Sync {
    fn on_request(&self, request: &mut reqwest::Request);
}

/// Hook that turns a received response into a payload or an error.
pub trait ResponseInterceptor: Send + Sync {
    /// Called for 2xx responses.
    fn on_response(&self, response: RawResponse) -> Result<Value, ApiError>;

    /// Called for every other status.
    fn on_error_response(&self, response: RawResponse) -> ApiError;
}

/// A response as seen by the interceptors: status, final URL and the body text.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub url: String,
    pub body: String,
}

/// Attaches `Authorization: Bearer <token>` when a token is configured.
#[derive(Debug, Clone, Default)]
pub struct BearerAuth {
    token: Option<String>,
}

impl BearerAuth {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }
}

impl RequestInterceptor for BearerAuth {
    fn on_request(&self, request: &mut reqwest::Request) {
        let Some(token) = &self.token else {
            return;
        };
        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            Err(e) => warn!("API token is not a valid header value, sending request without it: {}", e),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogger;

impl RequestInterceptor for RequestLogger {
    fn on_request(&self, request: &mut reqwest::Request) {
        debug!(method = %request.method(), url = %request.url(), "Sending request");
    }
}

/// Decides whether a successful body is really an application error.
#[derive(Debug, Clone, PartialEq)]
pub enum AppErrorRule {
    Disabled,
    /// The normalized body's numeric `field` is at least `min`
    FieldAtLeast { field: String, min: i64 },
}

impl AppErrorRule {
    pub fn from_config(config: &AppErrorConfig) -> Self {
        if config.enabled {
            AppErrorRule::FieldAtLeast {
                field: camel_case(&config.field),
                min: config.min,
            }
        } else {
            AppErrorRule::Disabled
        }
    }

    pub fn matches(&self, body: &Value) -> bool {
        match self {
            AppErrorRule::Disabled => false,
            AppErrorRule::FieldAtLeast { field, min } => match body.get(field.as_str()) {
                Some(code) => match code.as_i64() {
                    Some(code) => code >= *min,
                    None => code.as_f64().is_some_and(|code| code >= *min as f64),
                },
                None => false,
            },
        }
    }
}

impl Default for AppErrorRule {
    fn default() -> Self {
        AppErrorRule::FieldAtLeast {
            field: "code".to_string(),
            min: 400,
        }
    }
}

/// Normalizes every body and maps failures to [`NormalizedError`]s.
#[derive(Debug, Clone, Default)]
pub struct NormalizingInterceptor {
    rule: AppErrorRule,
}

impl NormalizingInterceptor {
    pub fn new(rule: AppErrorRule) -> Self {
        Self { rule }
    }
}

impl ResponseInterceptor for NormalizingInterceptor {
    fn on_response(&self, response: RawResponse) -> Result<Value, ApiError> {
        let body = normalize_body(&response.body);
        if self.rule.matches(&body) {
            warn!(status = response.status, url = %response.url, "Successful response carries an application error");
            return Err(ApiError::Application(NormalizedError::application(
                response.status,
                body,
            )));
        }
        Ok(body)
    }

    fn on_error_response(&self, response: RawResponse) -> ApiError {
        let body = if response.body.trim().is_empty() {
            Value::Null
        } else {
            normalize_body(&response.body)
        };
        ApiError::Http(NormalizedError::http(response.status, body))
    }
}
