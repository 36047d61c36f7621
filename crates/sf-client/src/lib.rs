//! # sf-client
//!
//! Transport layer for busbar SObject records.
//!
//! This crate defines the [`Session`] contract that record operations are
//! routed through, and ships a blocking implementation of it:
//! - One authenticated request per call, no hidden retry loop
//! - gzip/deflate response decompression
//! - Salesforce error bodies mapped to typed errors, with tokens redacted
//! - Request/response tracing
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Record Layer                           │
//! │  (sf-sobject: SObject CRUD, linked fields, queries)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │  Session trait
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SalesforceClient                          │
//! │  - Holds instance URL, access token, API version            │
//! │  - Resolves REST / Tooling paths                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SfHttpClient                             │
//! │  - Blocking reqwest client, timeouts, compression           │
//! │  - Error response parsing and sanitizing                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_client::{RequestMethod, SalesforceClient, Session};
//!
//! fn main() -> Result<(), busbar_sf_client::Error> {
//!     let client = SalesforceClient::new("https://na1.salesforce.com", "00D...")?;
//!     let body = client.request(RequestMethod::Get, &client.base_url("limits"), None)?;
//!     println!("{}", String::from_utf8_lossy(&body));
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
mod salesforce_client;
pub mod security;
mod session;

pub use client::SfHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use request::{RequestBuilder, RequestMethod};
pub use response::Response;
pub use salesforce_client::{QueryResult, SalesforceClient};
pub use session::Session;

/// Default Salesforce API version
pub const DEFAULT_API_VERSION: &str = "62.0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("busbar-sf-records/", env!("CARGO_PKG_VERSION"));
