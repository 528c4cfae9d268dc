//! Transport-level session client.
//!
//! `SessionClient` sends one request to the backend origin, attaching the
//! session cookies supplied by a [`CredentialProvider`] and feeding any
//! `Set-Cookie` headers back into it. It never retries; token refresh lives
//! one layer up in [`super::ApiClient`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Url};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::auth::{CookieCredentials, CredentialProvider};

use super::error::{ApiError, HttpError};

/// HTTP request timeout in seconds when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("projtrack/", env!("CARGO_PKG_VERSION"));

/// Everything needed to send, and later replay, a request.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub headers: HeaderMap,
}

impl PendingRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Cookie-carrying client bound to one backend origin.
/// Clone is cheap - reqwest::Client and the credential provider are shared.
#[derive(Clone)]
pub struct SessionClient {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl SessionClient {
    /// Create a client for `base_url` with an empty cookie session
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        Self::builder().base_url(base_url).build()
    }

    pub fn builder() -> SessionClientBuilder {
        SessionClientBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialProvider> {
        &self.credentials
    }

    fn url_for(&self, path: &str) -> Result<Url, ApiError> {
        let joined = if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        };
        Url::parse(&joined)
            .map_err(|e| ApiError::Configuration(format!("invalid request URL {}: {}", joined, e)))
    }

    /// Send a request once. Returns the parsed JSON body on 2xx (JSON `null`
    /// for an empty body) and an [`HttpError`] holding the request otherwise.
    pub async fn send(&self, request: &PendingRequest) -> Result<Value, ApiError> {
        let url = self.url_for(&request.path)?;

        let mut builder = self
            .client
            .request(request.method.clone(), url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .headers(request.headers.clone());

        if let Some(cookies) = self.credentials.cookie_header(&url) {
            builder = builder.header(header::COOKIE, cookies);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        debug!(method = %request.method, path = %request.path, "Sending request");
        let response = builder.send().await?;

        let status = response.status();
        {
            let mut set_cookies = response.headers().get_all(header::SET_COOKIE).iter();
            self.credentials.store(&url, &mut set_cookies);
        }

        let bytes = response.bytes().await?;
        debug!(method = %request.method, path = %request.path, status = %status, "Response received");

        if !status.is_success() {
            return Err(HttpError {
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
                request: request.clone(),
            }
            .into());
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            ApiError::InvalidResponse(format!(
                "{} {} returned malformed JSON: {}",
                request.method, request.path, e
            ))
        })
    }
}

/// Builder for SessionClient
#[derive(Default)]
pub struct SessionClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    credentials: Option<Arc<dyn CredentialProvider>>,
}

impl SessionClientBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use an existing credential provider instead of a fresh cookie session
    pub fn credentials(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn build(self) -> Result<SessionClient, ApiError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ApiError::Configuration("base_url is required".into()))?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let origin = Url::parse(&base_url)
            .map_err(|e| ApiError::Configuration(format!("invalid base URL {}: {}", base_url, e)))?;
        if origin.cannot_be_a_base() {
            return Err(ApiError::Configuration(format!(
                "base URL {} cannot carry request paths",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(
                self.timeout
                    .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            )
            .user_agent(USER_AGENT)
            .build()?;

        let credentials = self
            .credentials
            .unwrap_or_else(|| Arc::new(CookieCredentials::new(origin)));

        Ok(SessionClient {
            client,
            base_url,
            credentials,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_base_url() {
        let result = SessionClient::builder().build();
        assert!(matches!(result, Err(ApiError::Configuration(_))));
    }

    #[test]
    fn test_builder_rejects_invalid_url() {
        let result = SessionClient::new("not a url");
        assert!(matches!(result, Err(ApiError::Configuration(_))));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = SessionClient::new("http://localhost:8000/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(
            client.url_for("/v1/projects/").unwrap().as_str(),
            "http://localhost:8000/api/v1/projects/"
        );
        assert_eq!(
            client.url_for("auth/me/").unwrap().as_str(),
            "http://localhost:8000/api/auth/me/"
        );
    }

    #[test]
    fn test_pending_request_json_body() {
        let request = PendingRequest::post("/auth/login/")
            .json(&serde_json::json!({"email": "a@b.c", "password": "pw"}))
            .unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body.as_ref().unwrap()["email"], "a@b.c");
        assert!(request.headers.is_empty());
    }
}
