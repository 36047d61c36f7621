//! The transport contract consumed by the record layer.
//!
//! Anything that can send an authenticated request and resolve API paths
//! can back an SObject: the bundled [`SalesforceClient`](crate::SalesforceClient),
//! a recording fake in tests, or an application's own session with token
//! refresh and retry.

use bytes::Bytes;

use crate::error::Result;
use crate::request::RequestMethod;

/// An authenticated channel to one Salesforce org.
///
/// Calls block until the server answers. Implementations must be safe to
/// share between threads; independent records bound to the same session may
/// issue requests concurrently.
pub trait Session: Send + Sync {
    /// Send a request and return the raw body of a 2xx response.
    ///
    /// Non-2xx responses and connection failures are returned as errors that
    /// carry the status and a sanitized excerpt of the body.
    fn request(&self, method: RequestMethod, url: &str, body: Option<Vec<u8>>) -> Result<Bytes>;

    /// Compose the full REST URL for a path relative to the versioned data API.
    ///
    /// Example: `base_url("sobjects/Case")` ->
    /// `https://na1.salesforce.com/services/data/v62.0/sobjects/Case`
    fn base_url(&self, path: &str) -> String;

    /// Resolve an instance-relative path (such as a `nextRecordsUrl`) or pass
    /// an absolute URL through unchanged.
    fn url(&self, path: &str) -> String;

    /// Whether record updates and queries go through the Tooling API.
    fn uses_tooling_api(&self) -> bool {
        false
    }
}

impl<S: Session + ?Sized> Session for &S {
    fn request(&self, method: RequestMethod, url: &str, body: Option<Vec<u8>>) -> Result<Bytes> {
        (**self).request(method, url, body)
    }

    fn base_url(&self, path: &str) -> String {
        (**self).base_url(path)
    }

    fn url(&self, path: &str) -> String {
        (**self).url(path)
    }

    fn uses_tooling_api(&self) -> bool {
        (**self).uses_tooling_api()
    }
}

impl<S: Session + ?Sized> Session for std::sync::Arc<S> {
    fn request(&self, method: RequestMethod, url: &str, body: Option<Vec<u8>>) -> Result<Bytes> {
        (**self).request(method, url, body)
    }

    fn base_url(&self, path: &str) -> String {
        (**self).base_url(path)
    }

    fn url(&self, path: &str) -> String {
        (**self).url(path)
    }

    fn uses_tooling_api(&self) -> bool {
        (**self).uses_tooling_api()
    }
}
