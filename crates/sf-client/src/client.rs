//! Core blocking HTTP client with Salesforce-specific error handling.

use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{RequestBuilder, RequestMethod};
use crate::response::Response;

/// Blocking HTTP client for Salesforce APIs.
///
/// Each call to [`execute`](Self::execute) sends exactly one request. Retry,
/// backoff and rate-limit handling are left to the caller.
#[derive(Debug, Clone)]
pub struct SfHttpClient {
    inner: reqwest::blocking::Client,
    config: ClientConfig,
}

impl SfHttpClient {
    /// Create a new HTTP client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let inner = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::with_source(ErrorKind::Config(e.to_string()), e))?;

        Ok(Self { inner, config })
    }

    /// Create a new HTTP client with default configuration.
    pub fn default_client() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Create a POST request builder.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(RequestMethod::Post, url)
    }

    /// Execute a request and map non-2xx answers to errors.
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub fn execute(&self, request: RequestBuilder) -> Result<Response> {
        self.execute_raw(request)?.check_salesforce_error()
    }

    /// Execute a request and hand back the response whatever its status.
    ///
    /// Used where the caller interprets error bodies itself (SOAP faults).
    pub fn execute_raw(&self, request: RequestBuilder) -> Result<Response> {
        let mut req = self
            .inner
            .request(request.method.to_reqwest(), &request.url);

        if !request.headers.contains_key("Accept") {
            req = req.header("Accept", "application/json");
        }

        if let Some(ref token) = request.bearer_token {
            req = req.bearer_auth(token);
        }

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            req = req.body(body);
        }

        if self.config.enable_tracing {
            debug!(method = %request.method, url = %request.url, "Sending request");
        }

        let response = Response::from_blocking(req.send()?)?;

        if self.config.enable_tracing {
            let status = response.status();
            let content_length = response.body().len();
            if response.is_success() {
                debug!(status, content_length, "Response received");
            } else {
                info!(status, content_length, "Non-success response");
            }
        }

        Ok(response)
    }
}
