//! The generic record: a field map with a borrowed session binding.

use std::fmt;
use std::sync::Arc;

use busbar_sf_client::security::soql;
use busbar_sf_client::Session;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::attributes::Attributes;
use crate::codec::FieldFilter;
use crate::error::{Error, ErrorKind, Result};

/// Field holding the record's metadata block.
pub const ATTRIBUTES_KEY: &str = "attributes";

/// Field holding the record id.
pub const ID_KEY: &str = "Id";

/// A schema-less Salesforce record.
///
/// Fields are kept as a JSON object, so any SObject type can be read and
/// written without generated structs. The session a record is bound to is
/// borrowed, never owned, and is never part of the field map: serializing a
/// record emits only its fields.
///
/// # Example
///
/// ```rust,ignore
/// use busbar_sf_sobject::SessionExt;
///
/// let mut case = client.sobject("Case");
/// case.set("Subject", "Printer jammed").set("Priority", "High");
/// case.create()?;
///
/// let parent = case.sobject_field("Case", "ParentId");
/// ```
#[derive(Clone, Default)]
pub struct SObject<'s> {
    fields: Map<String, Value>,
    session: Option<&'s dyn Session>,
    field_filter: Arc<FieldFilter>,
}

impl fmt::Debug for SObject<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SObject")
            .field("fields", &self.fields)
            .field("bound", &self.is_bound())
            .finish_non_exhaustive()
    }
}

impl Serialize for SObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'s> SObject<'s> {
    /// Create an empty record of `type_name` bound to `session`.
    pub fn new(session: &'s dyn Session, type_name: impl Into<String>) -> Self {
        let mut record = Self {
            session: Some(session),
            ..Self::default()
        };
        record.set_type(type_name);
        record
    }

    /// Wrap an existing field map, e.g. a row decoded from a query.
    pub fn from_fields(session: Option<&'s dyn Session>, fields: Map<String, Value>) -> Self {
        Self {
            fields,
            session,
            field_filter: Arc::default(),
        }
    }

    /// Use a different set of stripped fields for this record's writes.
    ///
    /// Records derived from this one through [`sobject_field`](Self::sobject_field)
    /// inherit the filter.
    pub fn with_field_filter(mut self, filter: impl Into<Arc<FieldFilter>>) -> Self {
        self.field_filter = filter.into();
        self
    }

    /// The field filter applied to write payloads.
    pub fn field_filter(&self) -> &FieldFilter {
        &self.field_filter
    }

    /// Schema name from `attributes.type`, or `""`.
    pub fn type_name(&self) -> &str {
        self.fields
            .get(ATTRIBUTES_KEY)
            .and_then(Value::as_object)
            .and_then(|attrs| attrs.get("type"))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// The record id, or `""` when absent or not a string.
    pub fn id(&self) -> &str {
        self.string_field(ID_KEY)
    }

    /// A field as a string, or `""` when absent or of another JSON type.
    pub fn string_field(&self, key: &str) -> &str {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// The raw value of a field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set one field.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Set several fields; later pairs overwrite earlier ones.
    pub fn set_many<I, K, V>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in fields {
            self.fields.insert(key.into(), value.into());
        }
        self
    }

    /// Normalized `attributes` block, or `None` when missing or not an object.
    pub fn attributes(&self) -> Option<Attributes> {
        self.fields.get(ATTRIBUTES_KEY).and_then(Attributes::from_value)
    }

    /// Set `attributes.type`, keeping any existing `url`.
    pub fn set_type(&mut self, type_name: impl Into<String>) -> &mut Self {
        let type_name = Value::String(type_name.into());
        match self.fields.get_mut(ATTRIBUTES_KEY) {
            Some(Value::Object(attrs)) => {
                attrs.insert("type".to_string(), type_name);
            }
            _ => {
                let mut attrs = Map::new();
                attrs.insert("type".to_string(), type_name);
                self.fields
                    .insert(ATTRIBUTES_KEY.to_string(), Value::Object(attrs));
            }
        }
        self
    }

    /// Set the record id.
    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.fields
            .insert(ID_KEY.to_string(), Value::String(id.into()));
        self
    }

    /// Read-only view of every field, metadata included.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Take the field map, dropping the session binding.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// Whether the record is bound to a session.
    pub fn is_bound(&self) -> bool {
        self.session.is_some()
    }

    /// The bound session, if any.
    pub fn session(&self) -> Option<&'s dyn Session> {
        self.session
    }

    /// The body sent by create, update and upsert.
    pub fn payload(&self) -> Map<String, Value> {
        self.field_filter.payload(&self.fields)
    }

    /// Check that the record can be sent: it has a type name that is safe to
    /// put in a URL and a bound session.
    pub fn check_type_session(&self) -> Result<&'s dyn Session> {
        let type_name = self.type_name();
        if type_name.is_empty() {
            return Err(Error::precondition("SObject type not set"));
        }
        let session = self
            .session
            .ok_or_else(|| Error::precondition("SObject missing session"))?;
        if !soql::is_safe_sobject_name(type_name) {
            return Err(Error::precondition(format!(
                "invalid SObject type name '{type_name}'"
            )));
        }
        Ok(session)
    }

    /// Explicit id if non-empty, else the record's own id.
    pub(crate) fn resolve_id(&self, explicit: Option<&str>) -> Result<String> {
        explicit
            .filter(|id| !id.is_empty())
            .or_else(|| Some(self.id()).filter(|id| !id.is_empty()))
            .map(str::to_string)
            .ok_or_else(|| Error::new(ErrorKind::MissingIdentifier))
    }

    /// An empty record of `type_name` sharing this record's session and filter.
    pub(crate) fn child(&self, type_name: &str) -> SObject<'s> {
        let mut child = SObject {
            fields: Map::new(),
            session: self.session,
            field_filter: Arc::clone(&self.field_filter),
        };
        child.set_type(type_name);
        child
    }

    pub(crate) fn merge(&mut self, fields: Map<String, Value>) {
        self.fields.extend(fields);
    }
}
