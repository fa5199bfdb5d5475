use cinelist_config::{ApiConfig, DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL, DEFAULT_TIMEOUT_MS};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::interceptor::{
    AppErrorRule, BearerAuth, NormalizingInterceptor, RawResponse, RequestInterceptor,
    RequestLogger, ResponseInterceptor,
};
use crate::query;

/// How a request body is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    FormData,
    UrlEncoded,
}

impl ContentKind {
    fn default_headers(self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        match self {
            ContentKind::Json => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            // reqwest sets the multipart content type together with the boundary
            ContentKind::FormData => {}
            ContentKind::UrlEncoded => {
                headers.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("application/x-www-form-urlencoded"),
                );
            }
        }
        headers
    }
}

/// Per-call additions: extra headers, a timeout override, extra query parameters.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
    query: Option<Value>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn query(mut self, params: Value) -> Self {
        self.query = Some(params);
        self
    }
}

/// A successful, normalized response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub url: String,
    pub data: Value,
}

impl ApiResponse {
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        Ok(serde_json::from_value(self.data)?)
    }
}

enum Payload<'a> {
    Empty,
    Json(&'a Value),
    Form(&'a Value),
    UrlEncoded(&'a Value),
}

impl Payload<'_> {
    fn kind(&self) -> ContentKind {
        match self {
            Payload::Empty | Payload::Json(_) => ContentKind::Json,
            Payload::Form(_) => ContentKind::FormData,
            Payload::UrlEncoded(_) => ContentKind::UrlEncoded,
        }
    }

    fn json(body: Option<&Value>) -> Payload<'_> {
        body.map_or(Payload::Empty, Payload::Json)
    }
}

/// Thin wrapper over `reqwest` with request and response interceptors.
///
/// Cloning is cheap; the client carries no per-call state, so one instance can be
/// shared by every service.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    image_base_url: String,
    max_body_bytes: Option<usize>,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptor: Arc<dyn ResponseInterceptor>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("image_base_url", &self.image_base_url)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("request_interceptors", &self.request_interceptors.len())
            .finish()
    }
}

pub struct ApiClientBuilder {
    base_url: String,
    image_base_url: String,
    timeout: Duration,
    max_body_bytes: Option<usize>,
    token: Option<String>,
    app_error_rule: AppErrorRule,
    extra_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptor: Option<Arc<dyn ResponseInterceptor>>,
}

impl Default for ApiClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_body_bytes: None,
            token: None,
            app_error_rule: AppErrorRule::default(),
            extra_interceptors: Vec::new(),
            response_interceptor: None,
        }
    }
}

impl ApiClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn image_base_url(mut self, image_base_url: impl Into<String>) -> Self {
        self.image_base_url = image_base_url.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_body_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn app_error_rule(mut self, rule: AppErrorRule) -> Self {
        self.app_error_rule = rule;
        self
    }

    /// Runs after the built-in auth and logging interceptors.
    pub fn request_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.extra_interceptors.push(interceptor);
        self
    }

    /// Replaces the normalizing response interceptor.
    pub fn response_interceptor(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.response_interceptor = Some(interceptor);
        self
    }

    pub fn build(self) -> Result<ApiClient, ApiError> {
        let http = reqwest::Client::builder().timeout(self.timeout).build()?;

        let mut request_interceptors: Vec<Arc<dyn RequestInterceptor>> = vec![
            Arc::new(BearerAuth::new(self.token)),
            Arc::new(RequestLogger),
        ];
        request_interceptors.extend(self.extra_interceptors);

        let response_interceptor = self
            .response_interceptor
            .unwrap_or_else(|| Arc::new(NormalizingInterceptor::new(self.app_error_rule)));

        Ok(ApiClient {
            http,
            base_url: self.base_url,
            image_base_url: self.image_base_url,
            max_body_bytes: self.max_body_bytes,
            request_interceptors,
            response_interceptor,
        })
    }
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    pub fn from_config(config: &ApiConfig, token: Option<String>) -> Result<Self, ApiError> {
        Self::builder()
            .base_url(config.base_url.clone())
            .image_base_url(config.image_base_url.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            .max_body_bytes(config.max_body_bytes)
            .token(token)
            .app_error_rule(AppErrorRule::from_config(&config.app_error))
            .build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full image URL for a path fragment such as `/kqjL17yufvn9OVLyXYpvtyrFfak.jpg`.
    pub fn image_url(&self, path: &str) -> String {
        format!("{}{}", self.image_base_url, path)
    }

    /// GET with `params` serialized into the query string.
    pub async fn get(
        &self,
        path: &str,
        params: Option<&Value>,
        options: &RequestOptions,
        base_url: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.resolve_url(path, base_url, params, options)?;
        self.send(Method::GET, url, Payload::Empty, options).await
    }

    pub async fn post(
        &self,
        path: &str,
        body: Option<&Value>,
        options: &RequestOptions,
        base_url: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.resolve_url(path, base_url, None, options)?;
        self.send(Method::POST, url, Payload::json(body), options).await
    }

    pub async fn post_form(
        &self,
        path: &str,
        form: &Value,
        options: &RequestOptions,
        base_url: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.resolve_url(path, base_url, None, options)?;
        self.send(Method::POST, url, Payload::Form(form), options).await
    }

    pub async fn post_url_encoded(
        &self,
        path: &str,
        body: &Value,
        options: &RequestOptions,
        base_url: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.resolve_url(path, base_url, None, options)?;
        self.send(Method::POST, url, Payload::UrlEncoded(body), options).await
    }

    pub async fn put(
        &self,
        path: &str,
        body: Option<&Value>,
        options: &RequestOptions,
        base_url: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.resolve_url(path, base_url, None, options)?;
        self.send(Method::PUT, url, Payload::json(body), options).await
    }

    pub async fn put_form(
        &self,
        path: &str,
        form: &Value,
        options: &RequestOptions,
        base_url: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.resolve_url(path, base_url, None, options)?;
        self.send(Method::PUT, url, Payload::Form(form), options).await
    }

    pub async fn patch(
        &self,
        path: &str,
        body: Option<&Value>,
        options: &RequestOptions,
        base_url: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.resolve_url(path, base_url, None, options)?;
        self.send(Method::PATCH, url, Payload::json(body), options).await
    }

    pub async fn delete(
        &self,
        path: &str,
        body: Option<&Value>,
        options: &RequestOptions,
        base_url: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.resolve_url(path, base_url, None, options)?;
        self.send(Method::DELETE, url, Payload::json(body), options).await
    }

    fn resolve_url(
        &self,
        path: &str,
        base_url: Option<&str>,
        params: Option<&Value>,
        options: &RequestOptions,
    ) -> Result<Url, ApiError> {
        let mut url = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            let base = base_url.unwrap_or(&self.base_url).trim_end_matches('/');
            format!("{}/{}", base, path.trim_start_matches('/'))
        };

        for extra in [params, options.query.as_ref()].into_iter().flatten() {
            let query = query::build(extra);
            if query.is_empty() {
                continue;
            }
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query);
        }

        Url::parse(&url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", url, e)))
    }

    fn headers_for(kind: ContentKind, options: &RequestOptions) -> HeaderMap {
        let mut headers = kind.default_headers();
        for (name, value) in &options.headers {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => warn!("Skipping invalid request header '{}'", name),
            }
        }
        headers
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        payload: Payload<'_>,
        options: &RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        let headers = Self::headers_for(payload.kind(), options);
        let mut builder = self.http.request(method, url).headers(headers);

        builder = match payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(body),
            Payload::Form(form) => builder.multipart(multipart_form(form)),
            Payload::UrlEncoded(body) => builder.body(query::build(body)),
        };
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let mut request = builder.build()?;
        for interceptor in &self.request_interceptors {
            interceptor.on_request(&mut request);
        }

        let response = self.http.execute(request).await?;
        let status = response.status();
        let url = response.url().to_string();
        let bytes = read_body(response, self.max_body_bytes).await?;

        debug!(status = status.as_u16(), url = %url, bytes = bytes.len(), "Received response");

        let raw = RawResponse {
            status: status.as_u16(),
            url: url.clone(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        };

        if status.is_success() {
            let data = self.response_interceptor.on_response(raw)?;
            Ok(ApiResponse {
                status: status.as_u16(),
                url,
                data,
            })
        } else {
            warn!(status = status.as_u16(), url = %url, "Request failed");
            Err(self.response_interceptor.on_error_response(raw))
        }
    }
}

/// Collect the body chunk by chunk, failing as soon as it passes `limit`.
/// A declared Content-Length over the limit fails before anything is read.
async fn read_body(mut response: reqwest::Response, limit: Option<usize>) -> Result<Vec<u8>, ApiError> {
    let Some(limit) = limit else {
        return Ok(response.bytes().await?.to_vec());
    };

    if let Some(length) = response.content_length() {
        let length = usize::try_from(length).unwrap_or(usize::MAX);
        if length > limit {
            return Err(ApiError::BodyTooLarge { limit, actual: length });
        }
    }

    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        let actual = body.len() + chunk.len();
        if actual > limit {
            return Err(ApiError::BodyTooLarge { limit, actual });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

fn multipart_form(fields: &Value) -> reqwest::multipart::Form {
    query::flatten(fields)
        .into_iter()
        .fold(reqwest::multipart::Form::new(), |form, (name, value)| {
            form.text(name, value)
        })
}

#[cfg(test)]
mod tests;
