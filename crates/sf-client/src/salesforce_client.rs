//! High-level Salesforce client: the bundled [`Session`] implementation.
//!
//! ## Security
//!
//! - Access tokens are redacted in Debug output
//! - Sensitive parameters are skipped in tracing spans

use bytes::Bytes;
use tracing::instrument;

use crate::client::SfHttpClient;
use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::{RequestBuilder, RequestMethod};
use crate::session::Session;
use crate::DEFAULT_API_VERSION;

/// Blocking Salesforce API client bound to one org and access token.
///
/// # Example
///
/// ```rust,ignore
/// use busbar_sf_client::{SalesforceClient, Session, RequestMethod};
///
/// let client = SalesforceClient::new("https://na1.salesforce.com", "00D...")?;
/// let url = client.base_url("limits");
/// let body = client.request(RequestMethod::Get, &url, None)?;
/// ```
#[derive(Clone)]
pub struct SalesforceClient {
    http: SfHttpClient,
    instance_url: String,
    origin: url::Origin,
    access_token: String,
    api_version: String,
    use_tooling_api: bool,
}

impl std::fmt::Debug for SalesforceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceClient")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("use_tooling_api", &self.use_tooling_api)
            .finish_non_exhaustive()
    }
}

impl SalesforceClient {
    /// Create a new Salesforce client with the given instance URL and access token.
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        Self::with_config(instance_url, access_token, ClientConfig::default())
    }

    /// Create a new Salesforce client with custom configuration.
    pub fn with_config(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let instance_url = instance_url.into().trim_end_matches('/').to_string();
        let parsed = url::Url::parse(&instance_url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::new(ErrorKind::Config(format!(
                "instance URL must be http(s), got scheme '{}'",
                parsed.scheme()
            ))));
        }

        let http = SfHttpClient::new(config)?;
        Ok(Self {
            http,
            origin: parsed.origin(),
            instance_url,
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            use_tooling_api: false,
        })
    }

    /// Set the API version (e.g., "62.0").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Route record updates and queries through the Tooling API.
    pub fn with_tooling_api(mut self, enabled: bool) -> Self {
        self.use_tooling_api = enabled;
        self
    }

    /// Get the instance URL.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Get the access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Build the REST API URL for a path.
    ///
    /// Example: `rest_url("sobjects/Case")` -> `{instance}/services/data/v62.0/sobjects/Case`
    pub fn rest_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!(
            "{}/services/data/v{}/{}",
            self.instance_url, self.api_version, path
        )
    }

    fn authorized(&self, method: RequestMethod, url: &str) -> RequestBuilder {
        RequestBuilder::new(method, url).bearer_auth(&self.access_token)
    }
}

impl Session for SalesforceClient {
    /// Absolute URLs on another origin are refused so the token never leaves
    /// the org's instance.
    #[instrument(skip(self, body))]
    fn request(&self, method: RequestMethod, path: &str, body: Option<Vec<u8>>) -> Result<Bytes> {
        let target = self.url(path);
        let origin = url::Url::parse(&target)?.origin();
        if origin != self.origin {
            return Err(Error::new(ErrorKind::Config(format!(
                "refusing to send session to foreign origin '{}'",
                origin.ascii_serialization()
            ))));
        }

        let mut request = self.authorized(method, &target);
        if let Some(body) = body {
            request = request.json_bytes(body);
        }
        let response = self.http.execute(request)?;
        Ok(response.into_body())
    }

    fn base_url(&self, path: &str) -> String {
        self.rest_url(path)
    }

    /// If the path starts with `/`, it's appended to the instance URL.
    /// Full URLs are returned unchanged.
    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.instance_url, path)
        } else {
            format!("{}/{}", self.instance_url, path)
        }
    }

    fn uses_tooling_api(&self) -> bool {
        self.use_tooling_api
    }
}

/// One page of a SOQL query response.
///
/// Field names follow the REST API; the capitalised spellings some proxies
/// and older fixtures emit are accepted as aliases.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct QueryResult<T> {
    /// Total number of records matching the query.
    #[serde(rename = "totalSize", alias = "TotalSize", default)]
    pub total_size: u64,

    /// Whether all records are returned (no more pages).
    #[serde(alias = "Done")]
    pub done: bool,

    /// URL to fetch next batch of results.
    #[serde(rename = "nextRecordsUrl", alias = "NextRecordsURL", default)]
    pub next_records_url: Option<String>,

    /// The records.
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
}
