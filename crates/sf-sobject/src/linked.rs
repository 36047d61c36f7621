//! Resolution of fields that point at other records.
//!
//! A relationship shows up in one of two shapes: a lookup field holding the
//! related id (`"ParentId": "500..."`), or a relationship field holding the
//! related record inline, as returned by queries that select through a
//! relationship (`"Owner": {"attributes": {...}, "Name": "..."}`).

use serde_json::{Map, Value};
use tracing::warn;

use crate::attributes::Attributes;
use crate::sobject::{SObject, ATTRIBUTES_KEY};

/// How a field refers to another record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkedField<'a> {
    /// A non-empty id string.
    Reference(&'a str),
    /// An inline record whose attributes carry a non-empty type and url.
    Embedded {
        type_name: &'a str,
        url: &'a str,
        fields: &'a Map<String, Value>,
    },
}

impl<'a> LinkedField<'a> {
    /// Classify a raw field value. `None` for anything else, including empty
    /// strings and objects without usable attributes.
    pub fn classify(value: &'a Value) -> Option<Self> {
        match value {
            Value::String(id) if !id.is_empty() => Some(Self::Reference(id)),
            Value::Object(fields) => {
                let attrs = fields.get(ATTRIBUTES_KEY)?.as_object()?;
                let text = |key: &str| attrs.get(key).and_then(Value::as_str).unwrap_or_default();
                let (type_name, url) = (text("type"), text("url"));
                if type_name.is_empty() || url.is_empty() {
                    return None;
                }
                Some(Self::Embedded {
                    type_name,
                    url,
                    fields,
                })
            }
            _ => None,
        }
    }
}

impl<'s> SObject<'s> {
    /// Classify the value stored under `key`.
    pub fn linked_field(&self, key: &str) -> Option<LinkedField<'_>> {
        LinkedField::classify(self.field(key)?)
    }

    /// Materialize the record a field points at.
    ///
    /// A lookup id yields an unpopulated record of `expected_type` with only
    /// its id set; call [`get`](Self::get) to load it. An inline record yields
    /// a populated record of its declared type, with the id taken from the
    /// last segment of its attributes url. No request is made either way.
    /// The result shares this record's session and field filter.
    pub fn sobject_field(&self, expected_type: &str, key: &str) -> Option<SObject<'s>> {
        match self.linked_field(key)? {
            LinkedField::Reference(id) => {
                let mut related = self.child(expected_type);
                related.set_id(id);
                Some(related)
            }
            LinkedField::Embedded {
                type_name,
                url,
                fields,
            } => {
                let attrs = Attributes {
                    type_name: type_name.to_string(),
                    url: url.to_string(),
                };
                let Some(id) = attrs.id_from_url() else {
                    warn!(field = key, url, "Linked record has an invalid url");
                    return None;
                };
                let mut related = self.child(type_name);
                related.set_id(id);
                related.merge(fields.clone());
                Some(related)
            }
        }
    }
}
