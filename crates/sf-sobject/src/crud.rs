//! Describe, get, create, update, upsert and delete on a bound record.
//!
//! Every operation first checks [`SObject::check_type_session`]; a record
//! without a type or session fails before anything is sent.

use busbar_sf_client::security::{soql, url as url_security};
use busbar_sf_client::RequestMethod;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

use crate::error::{Error, ErrorKind, Result};
use crate::sobject::SObject;

/// Describe metadata for an SObject type, kept free-form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SObjectMeta(Map<String, Value>);

impl SObjectMeta {
    /// The API name of the described type.
    pub fn name(&self) -> &str {
        self.0.get("name").and_then(Value::as_str).unwrap_or_default()
    }

    /// API names of every field in the describe result.
    pub fn field_names(&self) -> Vec<&str> {
        self.0
            .get("fields")
            .and_then(Value::as_array)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|field| field.get("name").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// A raw entry of the describe result.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The whole describe result.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Take the whole describe result.
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// One entry of the `errors` array in a write response.
///
/// The REST API reports structured errors; older endpoints and proxies send
/// plain strings. Both decode.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OperationError {
    Message(String),
    Detailed {
        #[serde(rename = "statusCode", default)]
        status_code: String,
        message: String,
        #[serde(default)]
        fields: Vec<String>,
    },
}

impl std::fmt::Display for OperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationError::Message(message) => f.write_str(message),
            OperationError::Detailed {
                status_code,
                message,
                ..
            } if status_code.is_empty() => f.write_str(message),
            OperationError::Detailed {
                status_code,
                message,
                ..
            } => write!(f, "{status_code}: {message}"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WriteResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    errors: Vec<OperationError>,
}

impl WriteResponse {
    fn id(&self) -> &str {
        self.id.as_deref().unwrap_or_default()
    }

    fn failure(&self, operation: &str) -> Error {
        let message = if self.errors.is_empty() {
            format!("{operation} was not successful")
        } else {
            self.errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        };
        Error::new(ErrorKind::Aggregate(message))
    }
}

fn encode(payload: &Map<String, Value>) -> Result<Vec<u8>> {
    serde_json::to_vec(payload)
        .map_err(|e| Error::with_source(ErrorKind::Encode(e.to_string()), e))
}

impl<'s> SObject<'s> {
    /// Fetch describe metadata for this record's type.
    #[instrument(skip(self), fields(sobject = %self.type_name()))]
    pub fn describe(&self) -> Result<SObjectMeta> {
        let session = self.check_type_session()?;
        let url = session.base_url(&format!("sobjects/{}/describe", self.type_name()));
        let body = session.request(RequestMethod::Get, &url, None)?;
        let meta = serde_json::from_slice(&body)?;
        Ok(meta)
    }

    /// Load every field of a record into this one.
    ///
    /// Uses `id` when given, otherwise the record's own `Id`. Returned fields
    /// overwrite local ones; local fields missing from the response are kept.
    /// The record is left untouched if the request or decoding fails.
    #[instrument(skip(self), fields(sobject = %self.type_name()))]
    pub fn get(&mut self, id: Option<&str>) -> Result<&mut Self> {
        let session = self.check_type_session()?;
        let id = self.resolve_id(id)?;
        let url = session.base_url(&format!(
            "sobjects/{}/{}",
            self.type_name(),
            url_security::encode_param(&id)
        ));
        let body = session.request(RequestMethod::Get, &url, None)?;
        let fields: Map<String, Value> = serde_json::from_slice(&body)?;

        debug!(fields = fields.len(), "Record fetched");
        self.merge(fields);
        if self.id().is_empty() {
            self.set_id(id);
        }
        Ok(self)
    }

    /// Insert this record and store the new id.
    ///
    /// A 2xx answer reporting `success: false` or no id is an
    /// [`Aggregate`](ErrorKind::Aggregate) error carrying the server messages.
    #[instrument(skip(self), fields(sobject = %self.type_name()))]
    pub fn create(&mut self) -> Result<&mut Self> {
        let session = self.check_type_session()?;
        let url = session.base_url(&format!("sobjects/{}/", self.type_name()));
        let payload = encode(&self.payload())?;
        let body = session.request(RequestMethod::Post, &url, Some(payload))?;
        let response: WriteResponse = serde_json::from_slice(&body)?;

        if response.success != Some(true) || response.id().is_empty() {
            let err = response.failure("create");
            warn!(error = %err, "Create unsuccessful");
            return Err(err);
        }

        debug!(id = response.id(), "Record created");
        self.set_id(response.id());
        Ok(self)
    }

    /// Send this record's fields to the existing record with the same `Id`.
    ///
    /// Goes through the Tooling API when the session is configured for it.
    #[instrument(skip(self), fields(sobject = %self.type_name()))]
    pub fn update(&mut self) -> Result<&mut Self> {
        let session = self.check_type_session()?;
        let id = self.id();
        if id.is_empty() {
            return Err(Error::new(ErrorKind::MissingIdentifier));
        }
        let base = if session.uses_tooling_api() {
            "tooling/sobjects"
        } else {
            "sobjects"
        };
        let url = session.base_url(&format!(
            "{base}/{}/{}",
            self.type_name(),
            url_security::encode_param(id)
        ));
        let payload = encode(&self.payload())?;
        let body = session.request(RequestMethod::Patch, &url, Some(payload))?;

        debug!(response_len = body.len(), "Record updated");
        Ok(self)
    }

    /// Insert or update by external id.
    ///
    /// The key is the current value of `external_id_field`, a non-empty
    /// string or a number; the field travels in the URL and is left out of
    /// the body. When the server
    /// creates a record it answers with the new id, which is stored.
    #[instrument(skip(self), fields(sobject = %self.type_name()))]
    pub fn upsert(&mut self, external_id_field: &str) -> Result<&mut Self> {
        let session = self.check_type_session()?;
        if !soql::is_safe_field_name(external_id_field) {
            return Err(Error::precondition(format!(
                "invalid external ID field name '{external_id_field}'"
            )));
        }
        let key = match self.field(external_id_field) {
            Some(Value::String(key)) if !key.is_empty() => key.clone(),
            Some(Value::Number(key)) => key.to_string(),
            _ => return Err(Error::new(ErrorKind::MissingIdentifier)),
        };
        let url = session.base_url(&format!(
            "sobjects/{}/{}/{}",
            self.type_name(),
            external_id_field,
            url_security::encode_param(&key)
        ));
        let mut payload = self.payload();
        payload.remove(external_id_field);
        let body = session.request(
            RequestMethod::Patch,
            &url,
            Some(encode(&payload)?),
        )?;

        if body.iter().all(u8::is_ascii_whitespace) {
            debug!("Existing record updated");
            return Ok(self);
        }

        let response: WriteResponse = serde_json::from_slice(&body)?;
        if response.success == Some(false) {
            let err = response.failure("upsert");
            warn!(error = %err, "Upsert unsuccessful");
            return Err(err);
        }
        if !response.id().is_empty() {
            debug!(id = response.id(), "Record created");
            self.set_id(response.id());
        }
        Ok(self)
    }

    /// Delete a record by `id`, or by this record's own `Id`.
    ///
    /// Local fields are left as they are.
    #[instrument(skip(self), fields(sobject = %self.type_name()))]
    pub fn delete(&self, id: Option<&str>) -> Result<()> {
        let session = self.check_type_session()?;
        let id = self.resolve_id(id)?;
        let url = session.base_url(&format!(
            "sobjects/{}/{}",
            self.type_name(),
            url_security::encode_param(&id)
        ));
        session.request(RequestMethod::Delete, &url, None)?;
        Ok(())
    }
}
