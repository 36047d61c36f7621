//! # sf-sobject
//!
//! Schema-less Salesforce records.
//!
//! An [`SObject`] is a JSON field map plus a borrowed [`Session`]. Any SObject
//! type can be read, created, updated, upserted, deleted and queried without
//! generated structs.
//!
//! ## Features
//!
//! - **Typed accessors** - `type_name`, `id`, `string_field`, raw `field`
//! - **Linked fields** - follow lookup ids and inline related records
//! - **CRUD** - describe, get, create, update, upsert, delete
//! - **Write payloads** - metadata and server-managed fields are stripped
//!   through a configurable [`FieldFilter`]
//! - **Query** - one page at a time, with explicit `fetch_next`
//!
//! ## Example
//!
//! ```rust,ignore
//! use busbar_sf_client::SalesforceClient;
//! use busbar_sf_sobject::SessionExt;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SalesforceClient::new("https://myorg.my.salesforce.com", "00D...")?;
//!
//!     let mut case = client.sobject("Case");
//!     case.set("Subject", "Printer jammed").set("Origin", "Web");
//!     case.create()?;
//!
//!     case.set("Status", "Working");
//!     case.update()?;
//!
//!     let open = client.query("SELECT Id, Subject, Owner.Name FROM Case WHERE IsClosed = false")?;
//!     for case in &open {
//!         if let Some(owner) = case.sobject_field("User", "Owner") {
//!             println!("{} -> {}", case.string_field("Subject"), owner.string_field("Name"));
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! [`Session`]: busbar_sf_client::Session

mod attributes;
mod codec;
mod crud;
mod error;
mod linked;
mod query;
mod sobject;

#[cfg(test)]
mod test_support;

pub use attributes::Attributes;
pub use codec::{FieldFilter, SERVER_MANAGED_FIELDS};
pub use crud::{OperationError, SObjectMeta};
pub use error::{Error, ErrorKind, Result};
pub use linked::LinkedField;
pub use query::{query, query_more, QueryResult, SessionExt};
pub use sobject::{SObject, ATTRIBUTES_KEY, ID_KEY};

// Re-export sf-client types that users might need
pub use busbar_sf_client::{RequestMethod, Session};
