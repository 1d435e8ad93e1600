//! HTTP client for the admin backend
//!
//! Single choke point for every backend call: resolves paths against the
//! configured base URL, attaches the bearer credential, serializes bodies
//! and turns every failure into an [`ApiError`].

use crate::config::ClientConfig;
use crate::error::{ClientResult, ConfigError};
use crate::query::Query;
use crate::session::SessionContext;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use reqwest::{Client, multipart::Form};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::error::{ApiError, ErrorCode, NO_STATUS};

/// Request body
#[derive(Debug)]
pub enum Body {
    /// Structured payload, sent as JSON
    Json(Value),
    /// File payload, sent as-is; the transport sets the content-type
    Multipart(Form),
}

impl Body {
    /// Serialize any value into a JSON body
    pub fn json<T: Serialize + ?Sized>(value: &T) -> ClientResult<Self> {
        serde_json::to_value(value)
            .map(Body::Json)
            .map_err(serialization_error)
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

impl From<Form> for Body {
    fn from(form: Form) -> Self {
        Body::Multipart(form)
    }
}

/// Per-call query parameters and header overrides
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Query,
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    /// Add a header override; invalid names or values are ignored with a warning
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        match (
            http::HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.insert(name, value);
            }
            _ => tracing::warn!(header = name, "Ignoring invalid header override"),
        }
        self
    }
}

impl From<Query> for RequestOptions {
    fn from(query: Query) -> Self {
        Self::new().with_query(query)
    }
}

/// Everything needed to issue one request
#[derive(Debug)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub body: Option<Body>,
    pub options: RequestOptions,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            options: RequestOptions::default(),
        }
    }

    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }
}

/// HTTP client for making requests to the admin backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    session: SessionContext,
}

impl HttpClient {
    /// Create a new HTTP client; the base URL is fixed from here on
    pub fn new(config: &ClientConfig, session: SessionContext) -> Result<Self, ConfigError> {
        let parsed = reqwest::Url::parse(&config.base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout {
            builder = builder.timeout(std::time::Duration::from_secs(seconds));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Base URL without its trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The session this client reads its credential from
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn url(&self, path: &str, query: &Query) -> String {
        let path = path.trim_start_matches('/');
        let query = query.to_query_string();
        if query.is_empty() {
            format!("{}/{}", self.base_url, path)
        } else if path.contains('?') {
            format!("{}/{}&{}", self.base_url, path, &query[1..])
        } else {
            format!("{}/{}{}", self.base_url, path, query)
        }
    }

    fn auth_header(&self) -> Option<HeaderValue> {
        self.session
            .credential()
            .and_then(|t| HeaderValue::from_str(&format!("Bearer {t}")).ok())
    }

    /// Send a request and return the raw response once its status is 2xx.
    ///
    /// Non-2xx and transport failures come back as [`ApiError`].
    pub async fn send(&self, request: RequestDescriptor) -> ClientResult<reqwest::Response> {
        let RequestDescriptor {
            method,
            path,
            body,
            options,
        } = request;

        let url = self.url(&path, &options.query);
        let mut headers = HeaderMap::new();

        if let Some(auth) = self.auth_header() {
            headers.insert(AUTHORIZATION, auth);
        }

        let mut req = self.client.request(method.clone(), &url);
        match body {
            Some(Body::Multipart(form)) => {
                req = req.multipart(form);
            }
            Some(Body::Json(value)) => {
                if !options.headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }
                let bytes = serde_json::to_vec(&value).map_err(serialization_error)?;
                req = req.body(bytes);
            }
            None => {}
        }

        // Caller overrides win over the defaults set above
        for (name, value) in &options.headers {
            headers.insert(name.clone(), value.clone());
        }
        req = req.headers(headers);

        tracing::debug!(method = %method, path = %path, "Sending request");

        let response = req.send().await.map_err(|e| {
            tracing::warn!(method = %method, path = %path, error = %e, "Request failed before a response arrived");
            ApiError::network(format!("Network error: {method} {path}: {e}"))
        })?;

        let status = response.status();
        tracing::debug!(method = %method, path = %path, status = status.as_u16(), "Received response");

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body = parse_body(text);
        let err = ApiError::from_response(
            status.as_u16(),
            body,
            format!("Request failed: {method} {path}"),
        );
        tracing::warn!(
            method = %method,
            path = %path,
            status = err.status,
            code = %err.code,
            "Backend returned an error"
        );
        Err(err)
    }

    /// Issue a request and return its parsed body with the response status
    pub async fn execute(&self, request: RequestDescriptor) -> ClientResult<(StatusCode, Value)> {
        let response = self.send(request).await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok((status, Value::Null));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::network(format!("Failed to read response body: {e}")))?;
        Ok((status, parse_body(text).unwrap_or(Value::Null)))
    }

    /// Issue a request and return its parsed body (`Null` when empty)
    pub async fn request(&self, request: RequestDescriptor) -> ClientResult<Value> {
        self.execute(request).await.map(|(_, value)| value)
    }

    /// Issue a request and deserialize its body into `T`
    pub async fn request_as<T: DeserializeOwned>(&self, request: RequestDescriptor) -> ClientResult<T> {
        let path = request.path.clone();
        let (status, value) = self.execute(request).await?;
        serde_json::from_value(value).map_err(|e| {
            tracing::warn!(path = %path, error = %e, "Unexpected response shape");
            ApiError::invalid_response(status.as_u16(), format!("Unexpected response from {path}: {e}"))
        })
    }

    /// Make a GET request
    pub async fn get(&self, path: &str, options: RequestOptions) -> ClientResult<Value> {
        self.request(RequestDescriptor::new(Method::GET, path).options(options))
            .await
    }

    /// Make a POST request
    pub async fn post(
        &self,
        path: &str,
        body: Option<Body>,
        options: RequestOptions,
    ) -> ClientResult<Value> {
        self.request(with_body(Method::POST, path, body, options)).await
    }

    /// Make a PUT request
    pub async fn put(
        &self,
        path: &str,
        body: Option<Body>,
        options: RequestOptions,
    ) -> ClientResult<Value> {
        self.request(with_body(Method::PUT, path, body, options)).await
    }

    /// Make a PATCH request
    pub async fn patch(
        &self,
        path: &str,
        body: Option<Body>,
        options: RequestOptions,
    ) -> ClientResult<Value> {
        self.request(with_body(Method::PATCH, path, body, options)).await
    }

    /// Make a DELETE request
    pub async fn delete(
        &self,
        path: &str,
        body: Option<Body>,
        options: RequestOptions,
    ) -> ClientResult<Value> {
        self.request(with_body(Method::DELETE, path, body, options)).await
    }

    /// Make a GET request and deserialize the body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> ClientResult<T> {
        self.request_as(RequestDescriptor::new(Method::GET, path).options(options))
            .await
    }

    /// Make a POST request with a JSON body and deserialize the response
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.send_json(Method::POST, path, body).await
    }

    /// Make a request with a JSON body and deserialize the response
    pub async fn send_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.request_as(RequestDescriptor::new(method, path).body(Body::json(body)?))
            .await
    }
}

fn with_body(method: Method, path: &str, body: Option<Body>, options: RequestOptions) -> RequestDescriptor {
    let mut request = RequestDescriptor::new(method, path).options(options);
    request.body = body;
    request
}

fn serialization_error(e: serde_json::Error) -> ApiError {
    ApiError::new(
        format!("Failed to serialize request body: {e}"),
        NO_STATUS,
        ErrorCode::ValidationError.as_str(),
        None,
    )
}

/// Parse a response body: JSON if possible, raw text otherwise, `None` if empty
fn parse_body(text: String) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}
