//! Username/password login over the SOAP partner API.
//!
//! ## Security
//!
//! - Passwords and security tokens are XML-escaped and never logged
//! - The session id is redacted in Debug output

use std::collections::HashMap;

use busbar_sf_client::security::xml;
use busbar_sf_client::{ClientConfig, SalesforceClient, SfHttpClient};
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, instrument, warn};

use crate::credentials::{Credentials, SalesforceCredentials};
use crate::error::{Error, ErrorKind, Result};

/// Client name sent in the `CallOptions` SOAP header.
pub const DEFAULT_CLIENT_ID: &str = "busbar";

/// SOAP `login` call against a Salesforce login host.
///
/// # Example
///
/// ```rust,ignore
/// use busbar_sf_auth::{SoapLogin, PRODUCTION_LOGIN_URL};
///
/// let login = SoapLogin::new(PRODUCTION_LOGIN_URL)?;
/// let result = login.login_password("user@example.com", "password", "securityToken")?;
/// let client = result.into_client()?;
/// ```
#[derive(Debug, Clone)]
pub struct SoapLogin {
    http: SfHttpClient,
    login_url: String,
    api_version: String,
    client_id: String,
}

impl SoapLogin {
    /// Log in against `login_url` with default client configuration.
    pub fn new(login_url: impl Into<String>) -> Result<Self> {
        Self::with_config(login_url, ClientConfig::default())
    }

    /// Log in against `login_url` with custom client configuration.
    pub fn with_config(login_url: impl Into<String>, config: ClientConfig) -> Result<Self> {
        let login_url = login_url.into().trim_end_matches('/').to_string();
        url::Url::parse(&login_url)?;
        Ok(Self {
            http: SfHttpClient::new(config)?,
            login_url,
            api_version: busbar_sf_client::DEFAULT_API_VERSION.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
        })
    }

    /// Set the API version (e.g., "62.0").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set the client name reported in `CallOptions`.
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    /// The SOAP endpoint the login is posted to.
    pub fn endpoint(&self) -> String {
        format!("{}/services/Soap/u/{}", self.login_url, self.api_version)
    }

    /// Authenticate with a username and password.
    ///
    /// The security token is appended to the password; pass `""` when the
    /// caller's IP is trusted by the org.
    #[instrument(skip(self, password, security_token))]
    pub fn login_password(
        &self,
        username: &str,
        password: &str,
        security_token: &str,
    ) -> Result<LoginResult> {
        let envelope = login_envelope(&self.client_id, username, password, security_token);
        let request = self
            .http
            .post(self.endpoint())
            .xml(envelope)
            .header("SOAPAction", "login");

        // Faults come back as HTTP 500 with a SOAP body
        let response = self.http.execute_raw(request)?;
        let body = response.text()?;
        let elements = parse_elements(&body);

        if let Ok(Some(fault)) = elements.as_ref().map(login_fault) {
            warn!(error = %fault, "Login rejected");
            return Err(fault);
        }

        if !response.is_success() {
            return Err(Error::new(ErrorKind::Http(format!(
                "login failed with status {}",
                response.status()
            ))));
        }

        let result = LoginResult::from_elements(&elements?, &self.api_version)?;
        debug!(instance_url = %result.instance_url, user_id = %result.user_id, "Login succeeded");
        Ok(result)
    }
}

/// Outcome of a successful SOAP login.
#[derive(Clone)]
pub struct LoginResult {
    /// Partner API endpoint for the org.
    pub server_url: String,
    /// Scheme and host of `server_url`.
    pub instance_url: String,
    /// Session id, usable as a bearer token for the REST API.
    pub session_id: String,
    pub user_id: String,
    pub user_email: String,
    pub user_full_name: String,
    pub user_name: String,
    /// API version the login was made with.
    pub api_version: String,
}

impl std::fmt::Debug for LoginResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResult")
            .field("server_url", &self.server_url)
            .field("instance_url", &self.instance_url)
            .field("session_id", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("user_name", &self.user_name)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl LoginResult {
    fn from_elements(elements: &HashMap<String, String>, api_version: &str) -> Result<Self> {
        let required = |name: &str| {
            elements
                .get(name)
                .filter(|value| !value.is_empty())
                .cloned()
                .ok_or_else(|| Error::new(ErrorKind::InvalidResponse(format!("missing {name}"))))
        };
        let optional = |name: &str| elements.get(name).cloned().unwrap_or_default();

        let server_url = required("serverUrl")?;
        let instance_url = url::Url::parse(&server_url)?
            .origin()
            .ascii_serialization();

        Ok(Self {
            instance_url,
            server_url,
            session_id: required("sessionId")?,
            user_id: optional("userId"),
            user_email: optional("userEmail"),
            user_full_name: optional("userFullName"),
            user_name: optional("userName"),
            api_version: api_version.to_string(),
        })
    }

    /// Credentials for the REST API session this login opened.
    pub fn into_credentials(self) -> SalesforceCredentials {
        SalesforceCredentials::new(self.instance_url, self.session_id, self.api_version)
    }

    /// A ready session with default client configuration.
    pub fn into_client(self) -> Result<SalesforceClient> {
        self.to_client(ClientConfig::default())
    }
}

impl Credentials for LoginResult {
    fn instance_url(&self) -> &str {
        &self.instance_url
    }

    fn access_token(&self) -> &str {
        &self.session_id
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }
}

fn login_envelope(client_id: &str, username: &str, password: &str, security_token: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8" ?>
<env:Envelope xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:env="http://schemas.xmlsoap.org/soap/envelope/" xmlns:urn="urn:partner.soap.sforce.com">
  <env:Header>
    <urn:CallOptions>
      <urn:client>{client_id}</urn:client>
      <urn:defaultNamespace>sf</urn:defaultNamespace>
    </urn:CallOptions>
  </env:Header>
  <env:Body>
    <n1:login xmlns:n1="urn:partner.soap.sforce.com">
      <n1:username>{username}</n1:username>
      <n1:password>{password}{security_token}</n1:password>
    </n1:login>
  </env:Body>
</env:Envelope>"#,
        client_id = xml::escape(client_id),
        username = xml::escape(username),
        password = xml::escape(password),
        security_token = xml::escape(security_token),
    )
}

fn login_fault(elements: &HashMap<String, String>) -> Option<Error> {
    let code = elements.get("faultcode")?;
    let message = elements
        .get("faultstring")
        .cloned()
        .unwrap_or_else(|| "Unknown error".to_string());
    Some(Error::new(ErrorKind::LoginFault {
        code: code.clone(),
        message,
    }))
}

/// Collect the text of every leaf element, keyed by local name.
///
/// The login response has no repeated leaves, so the first occurrence wins.
fn parse_elements(body: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(body);
    reader.config_mut().trim_text(true);

    let mut elements = HashMap::new();
    let mut open: Vec<String> = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                open.push(String::from_utf8_lossy(start.local_name().as_ref()).into_owned());
            }
            Event::End(_) => {
                open.pop();
            }
            Event::Text(text) => {
                if let Some(name) = open.last() {
                    let value = text.unescape()?.into_owned();
                    elements.entry(name.clone()).or_insert(value);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(elements)
}
