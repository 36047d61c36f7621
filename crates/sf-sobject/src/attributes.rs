//! The `attributes` metadata block carried by every SObject payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalized view of a record's `attributes` entry.
///
/// Salesforce sends `{"type": "Case", "url": "/services/data/v62.0/sobjects/Case/500..."}`.
/// The block is derived data: the record's `Id` field stays authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    /// Schema name of the record.
    #[serde(rename = "type", default)]
    pub type_name: String,

    /// Canonical server path of the record.
    #[serde(default)]
    pub url: String,
}

impl Attributes {
    /// Normalize a raw `attributes` value.
    ///
    /// Returns `None` unless the value is a JSON object. Missing or
    /// non-string `type`/`url` entries become empty strings.
    pub fn from_value(value: &Value) -> Option<Self> {
        let attrs = value.as_object()?;
        let text = |key: &str| {
            attrs
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Some(Self {
            type_name: text("type"),
            url: text("url"),
        })
    }

    /// The trailing segment of `url`, which names the record id.
    ///
    /// `None` when the url has no `/` separator or ends with one.
    pub fn id_from_url(&self) -> Option<&str> {
        match self.url.rsplit_once('/') {
            Some((_, id)) if !id.is_empty() => Some(id),
            _ => None,
        }
    }
}
