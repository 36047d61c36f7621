//! # busbar-sf-records
//!
//! Schema-less Salesforce records for Rust.
//!
//! Records are JSON field maps bound to a session. They read and write any
//! SObject type without generated structs, follow lookup and relationship
//! fields, and strip metadata and server-managed fields before every write.
//!
//! ## Security
//!
//! This library is designed with security in mind:
//! - Sensitive data (tokens, passwords, session ids) are redacted in Debug output
//! - Tracing/logging skips credential parameters
//! - Error messages sanitize any credential data
//!
//! ## Crates
//!
//! - **busbar-sf-client** - `Session` contract and the blocking `SalesforceClient`
//! - **busbar-sf-auth** - SOAP password login and environment credentials
//! - **busbar-sf-sobject** - `SObject` records: accessors, linked fields, CRUD, query
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use busbar_sf_records::{SalesforceCredentials, SessionExt};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SalesforceCredentials::from_env()?.into_client()?;
//!
//!     let mut case = client.sobject("Case");
//!     case.set("Subject", "Printer jammed");
//!     case.create()?;
//!
//!     for comment in &client.query("SELECT Id, CommentBody, ParentId FROM CaseComment")? {
//!         let parent = comment.sobject_field("Case", "ParentId");
//!         println!("{} on {:?}", comment.string_field("CommentBody"), parent.map(|p| p.id().to_string()));
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export all crates for convenient access
#[cfg(feature = "auth")]
pub use busbar_sf_auth as auth;
#[cfg(feature = "client")]
pub use busbar_sf_client as client;
#[cfg(feature = "sobject")]
pub use busbar_sf_sobject as sobject;

// Re-export commonly used types at the top level
#[cfg(feature = "auth")]
pub use busbar_sf_auth::{Credentials, SalesforceCredentials, SoapLogin};
#[cfg(feature = "client")]
pub use busbar_sf_client::{ClientConfig, SalesforceClient, Session};
#[cfg(feature = "sobject")]
pub use busbar_sf_sobject::{FieldFilter, QueryResult, SObject, SessionExt};
