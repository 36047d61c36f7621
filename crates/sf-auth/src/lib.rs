//! # sf-auth
//!
//! Salesforce authentication for busbar records.
//!
//! ## Security
//!
//! This library is designed with security in mind:
//! - Sensitive data (tokens, passwords, session ids) are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - Error messages sanitize any credential data
//!
//! ## Supported Authentication Methods
//!
//! - **SOAP username/password login** - `login` on the partner API, with an
//!   optional security token
//! - **Environment variables** - an existing access token and instance URL
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_auth::{SalesforceCredentials, SoapLogin, PRODUCTION_LOGIN_URL};
//!
//! fn main() -> Result<(), busbar_sf_auth::Error> {
//!     // From environment variables
//!     let client = SalesforceCredentials::from_env()?.into_client()?;
//!
//!     // Username, password and security token
//!     let login = SoapLogin::new(PRODUCTION_LOGIN_URL)?;
//!     let client = login
//!         .login_password("user@example.com", "password", "token")?
//!         .into_client()?;
//!
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod soap;

pub use credentials::{Credentials, SalesforceCredentials};
pub use error::{Error, ErrorKind, Result};
pub use soap::{LoginResult, SoapLogin, DEFAULT_CLIENT_ID};

/// Default Salesforce login URL for production.
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";

/// Default Salesforce login URL for sandbox.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";
