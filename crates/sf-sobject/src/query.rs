//! SOQL query results as records.
//!
//! Pagination is explicit: a result holds one page, and the caller decides
//! whether to follow [`QueryResult::next_records_url`].

use std::fmt;
use std::sync::Arc;

use busbar_sf_client::{RequestMethod, Session};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::codec::FieldFilter;
use crate::error::{Error, ErrorKind, Result};
use crate::sobject::SObject;

/// One page of query results.
///
/// Every record is bound to the session that ran the query and typed by its
/// own `attributes`.
pub struct QueryResult<'s> {
    total_size: u64,
    done: bool,
    next_records_url: Option<String>,
    records: Vec<SObject<'s>>,
    session: &'s dyn Session,
    field_filter: Arc<FieldFilter>,
}

impl fmt::Debug for QueryResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryResult")
            .field("total_size", &self.total_size)
            .field("done", &self.done)
            .field("next_records_url", &self.next_records_url)
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl<'s> QueryResult<'s> {
    pub(crate) fn decode(
        session: &'s dyn Session,
        body: &[u8],
        field_filter: Arc<FieldFilter>,
    ) -> Result<Self> {
        let page: busbar_sf_client::QueryResult<Map<String, Value>> =
            serde_json::from_slice(body)?;

        let next_records_url = page.next_records_url.filter(|url| !url.is_empty());
        if !page.done && next_records_url.is_none() {
            return Err(Error::new(ErrorKind::Decode(
                "query page is not done but has no nextRecordsUrl".to_string(),
            )));
        }

        let records = page
            .records
            .into_iter()
            .map(|fields| {
                SObject::from_fields(Some(session), fields)
                    .with_field_filter(Arc::clone(&field_filter))
            })
            .collect();

        Ok(Self {
            total_size: page.total_size,
            done: page.done,
            next_records_url,
            records,
            session,
            field_filter,
        })
    }

    /// Total number of records matching the query, across all pages.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Whether this is the last page.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Cursor for the next page, present whenever the result is not done.
    pub fn next_records_url(&self) -> Option<&str> {
        self.next_records_url.as_deref()
    }

    /// Records on this page.
    pub fn records(&self) -> &[SObject<'s>] {
        &self.records
    }

    /// Number of records on this page.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether this page has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over the records on this page.
    pub fn iter(&self) -> std::slice::Iter<'_, SObject<'s>> {
        self.records.iter()
    }

    /// Fetch the following page, or `None` when this one is the last.
    pub fn fetch_next(&self) -> Option<Result<QueryResult<'s>>> {
        if self.done {
            return None;
        }
        let next = self.next_records_url.as_deref()?;
        Some(fetch_page(
            self.session,
            &self.session.url(next),
            Arc::clone(&self.field_filter),
        ))
    }
}

impl<'s> IntoIterator for QueryResult<'s> {
    type Item = SObject<'s>;
    type IntoIter = std::vec::IntoIter<SObject<'s>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, 's> IntoIterator for &'a QueryResult<'s> {
    type Item = &'a SObject<'s>;
    type IntoIter = std::slice::Iter<'a, SObject<'s>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Run a SOQL query and return its first page.
///
/// Goes to `tooling/query` when the session uses the Tooling API.
#[instrument(skip(session))]
pub fn query<'s>(session: &'s dyn Session, soql: &str) -> Result<QueryResult<'s>> {
    let resource = if session.uses_tooling_api() {
        "tooling/query"
    } else {
        "query"
    };
    let url = session.base_url(&format!("{resource}?q={}", urlencoding::encode(soql)));
    fetch_page(session, &url, Arc::default())
}

/// Fetch a page by its `nextRecordsUrl`.
#[instrument(skip(session))]
pub fn query_more<'s>(session: &'s dyn Session, next_records_url: &str) -> Result<QueryResult<'s>> {
    fetch_page(session, &session.url(next_records_url), Arc::default())
}

fn fetch_page<'s>(
    session: &'s dyn Session,
    url: &str,
    field_filter: Arc<FieldFilter>,
) -> Result<QueryResult<'s>> {
    let body = session.request(RequestMethod::Get, url, None)?;
    let page = QueryResult::decode(session, &body, field_filter)?;
    debug!(
        total_size = page.total_size,
        records = page.len(),
        done = page.done,
        "Query page received"
    );
    Ok(page)
}

/// Record-layer entry points on any [`Session`].
///
/// # Example
///
/// ```rust,ignore
/// use busbar_sf_sobject::SessionExt;
///
/// let cases = client.query("SELECT Id, Subject FROM Case WHERE IsClosed = false")?;
/// for case in &cases {
///     println!("{} {}", case.id(), case.string_field("Subject"));
/// }
/// ```
pub trait SessionExt: Session {
    /// An empty record of `type_name` bound to this session.
    fn sobject(&self, type_name: &str) -> SObject<'_>;

    /// Run a SOQL query and return its first page.
    fn query(&self, soql: &str) -> Result<QueryResult<'_>>;

    /// Fetch a page by its `nextRecordsUrl`.
    fn query_more(&self, next_records_url: &str) -> Result<QueryResult<'_>>;
}

impl<S: Session> SessionExt for S {
    fn sobject(&self, type_name: &str) -> SObject<'_> {
        SObject::new(self, type_name)
    }

    fn query(&self, soql: &str) -> Result<QueryResult<'_>> {
        crate::query::query(self, soql)
    }

    fn query_more(&self, next_records_url: &str) -> Result<QueryResult<'_>> {
        crate::query::query_more(self, next_records_url)
    }
}
