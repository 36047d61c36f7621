//! Outbound payload construction for create, update and upsert.
//!
//! Writes must not carry record metadata or fields the server manages
//! itself; Salesforce rejects them with `INVALID_FIELD_FOR_INSERT_UPDATE`.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use crate::sobject::{ATTRIBUTES_KEY, ID_KEY};

/// Read-only fields stripped from write payloads by default.
pub const SERVER_MANAGED_FIELDS: &[&str] = &[
    "LastModifiedDate",
    "LastReferencedDate",
    "IsClosed",
    "ContactPhone",
    "CreatedById",
    "CaseNumber",
    "ContactFax",
    "ContactMobile",
    "IsDeleted",
    "LastViewedDate",
    "SystemModstamp",
    "CreatedDate",
    "ContactEmail",
    "ClosedDate",
    "LastModifiedById",
];

/// The set of field names never sent on a write.
///
/// `attributes` and `Id` are always stripped in addition to the configured
/// names; they are not part of the set itself.
///
/// # Example
///
/// ```rust
/// use busbar_sf_sobject::FieldFilter;
///
/// let filter = FieldFilter::standard()
///     .with_field("Legacy_Score__c")
///     .without_field("IsClosed");
///
/// assert!(filter.contains("CreatedDate"));
/// assert!(filter.contains("Legacy_Score__c"));
/// assert!(!filter.contains("IsClosed"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    fields: BTreeSet<String>,
}

impl FieldFilter {
    /// The default server-managed field list.
    pub fn standard() -> Self {
        Self::new(SERVER_MANAGED_FIELDS.iter().copied())
    }

    /// Strip only `attributes` and `Id`.
    pub fn empty() -> Self {
        Self {
            fields: BTreeSet::new(),
        }
    }

    /// A filter over an explicit list of field names.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Add a field name to the set.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into());
        self
    }

    /// Remove a field name from the set.
    pub fn without_field(mut self, field: &str) -> Self {
        self.fields.remove(field);
        self
    }

    /// Whether `field` is in the configured set.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    /// The configured field names, sorted.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Copy `fields` into a write payload, dropping metadata and every
    /// configured name. Values are copied verbatim.
    pub fn payload(&self, fields: &Map<String, Value>) -> Map<String, Value> {
        fields
            .iter()
            .filter(|(key, _)| {
                key.as_str() != ATTRIBUTES_KEY && key.as_str() != ID_KEY && !self.contains(key)
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl Default for FieldFilter {
    fn default() -> Self {
        Self::standard()
    }
}
