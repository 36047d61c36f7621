//! Credentials trait and implementations.
//!
//! All credential types implement custom Debug to redact sensitive data.

use busbar_sf_client::{ClientConfig, SalesforceClient};

use crate::error::{Error, ErrorKind, Result};

/// Trait for Salesforce credentials.
pub trait Credentials: Send + Sync {
    /// Get the Salesforce instance URL.
    fn instance_url(&self) -> &str;

    /// Get the access token.
    fn access_token(&self) -> &str;

    /// Get the API version (e.g., "62.0").
    fn api_version(&self) -> &str;

    /// Whether record updates and queries should use the Tooling API.
    fn uses_tooling_api(&self) -> bool {
        false
    }

    /// Returns true if the credentials appear to be valid (non-empty).
    fn is_valid(&self) -> bool {
        !self.instance_url().is_empty() && !self.access_token().is_empty()
    }

    /// Build a [`SalesforceClient`] session from these credentials.
    fn to_client(&self, config: ClientConfig) -> Result<SalesforceClient> {
        if !self.is_valid() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "instance URL and access token are required".to_string(),
            )));
        }
        let client = SalesforceClient::with_config(self.instance_url(), self.access_token(), config)?
            .with_api_version(self.api_version())
            .with_tooling_api(self.uses_tooling_api());
        Ok(client)
    }
}

/// Standard Salesforce credentials implementation.
///
/// The access token is redacted in Debug output to prevent accidental
/// exposure in logs.
#[derive(Clone)]
pub struct SalesforceCredentials {
    instance_url: String,
    access_token: String,
    api_version: String,
    use_tooling_api: bool,
}

impl std::fmt::Debug for SalesforceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceCredentials")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("use_tooling_api", &self.use_tooling_api)
            .finish()
    }
}

impl SalesforceCredentials {
    /// Create new credentials with the given values.
    pub fn new(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            instance_url: instance_url.into(),
            access_token: access_token.into(),
            api_version: api_version.into(),
            use_tooling_api: false,
        }
    }

    /// Route record updates and queries through the Tooling API.
    pub fn with_tooling_api(mut self, enabled: bool) -> Self {
        self.use_tooling_api = enabled;
        self
    }

    /// Set a new access token (e.g., after a fresh login).
    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = token.into();
    }

    /// Load credentials from environment variables.
    ///
    /// Required environment variables:
    /// - `SF_INSTANCE_URL` or `SALESFORCE_INSTANCE_URL`
    /// - `SF_ACCESS_TOKEN` or `SALESFORCE_ACCESS_TOKEN`
    ///
    /// Optional:
    /// - `SF_API_VERSION` or `SALESFORCE_API_VERSION` (default: "62.0")
    /// - `SF_USE_TOOLING_API` (`true`, `1` or `yes`)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let either = |primary: &str, fallback: &str| lookup(primary).or_else(|| lookup(fallback));

        let instance_url = either("SF_INSTANCE_URL", "SALESFORCE_INSTANCE_URL")
            .ok_or_else(|| Error::new(ErrorKind::EnvVar("SF_INSTANCE_URL".to_string())))?;

        let access_token = either("SF_ACCESS_TOKEN", "SALESFORCE_ACCESS_TOKEN")
            .ok_or_else(|| Error::new(ErrorKind::EnvVar("SF_ACCESS_TOKEN".to_string())))?;

        let api_version = either("SF_API_VERSION", "SALESFORCE_API_VERSION")
            .unwrap_or_else(|| busbar_sf_client::DEFAULT_API_VERSION.to_string());

        let use_tooling_api = lookup("SF_USE_TOOLING_API").is_some_and(|value| {
            matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            )
        });

        Ok(Self::new(instance_url, access_token, api_version).with_tooling_api(use_tooling_api))
    }

    /// Build a session with default client configuration.
    pub fn into_client(self) -> Result<SalesforceClient> {
        self.to_client(ClientConfig::default())
    }
}

impl Credentials for SalesforceCredentials {
    fn instance_url(&self) -> &str {
        &self.instance_url
    }

    fn access_token(&self) -> &str {
        &self.access_token
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }

    fn uses_tooling_api(&self) -> bool {
        self.use_tooling_api
    }
}
