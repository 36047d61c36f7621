//! Error types for sf-sobject.

/// Result type alias for record operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for record operations.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    pub(crate) fn precondition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Precondition(message.into()))
    }

    /// Returns true if the operation was rejected before any request was sent.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Precondition(_) | ErrorKind::MissingIdentifier
        )
    }

    /// Returns true if no record id could be resolved.
    pub fn is_missing_identifier(&self) -> bool {
        matches!(self.kind, ErrorKind::MissingIdentifier)
    }

    /// Returns true if the session failed to deliver the request.
    pub fn is_transport(&self) -> bool {
        matches!(self.kind, ErrorKind::Transport(_))
    }

    /// Returns true if a response body could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self.kind, ErrorKind::Decode(_))
    }

    /// Returns true if an outbound body could not be encoded.
    pub fn is_encode(&self) -> bool {
        matches!(self.kind, ErrorKind::Encode(_))
    }

    /// Returns true if the server reported a logical failure in a 2xx body.
    pub fn is_aggregate(&self) -> bool {
        matches!(self.kind, ErrorKind::Aggregate(_))
    }

    /// The underlying transport error, if this error came from the session.
    pub fn transport_error(&self) -> Option<&busbar_sf_client::Error> {
        self.source
            .as_deref()
            .and_then(|source| source.downcast_ref::<busbar_sf_client::Error>())
    }

    /// HTTP status of a failed request, when the session reported one.
    pub fn status(&self) -> Option<u16> {
        self.transport_error().and_then(busbar_sf_client::Error::status)
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// The record has no type name or no bound session, or a name is unsafe.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Neither an explicit id nor the record's `Id` was available.
    #[error("Object id not found")]
    MissingIdentifier,

    /// The session returned an error.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A body was not the JSON shape the operation expects.
    #[error("Decode error: {0}")]
    Decode(String),

    /// A request body could not be serialized.
    #[error("Encode error: {0}")]
    Encode(String),

    /// The server answered 2xx but reported failures in the body.
    #[error("Operation failed: {0}")]
    Aggregate(String),
}

impl From<busbar_sf_client::Error> for Error {
    fn from(err: busbar_sf_client::Error) -> Self {
        Error {
            kind: ErrorKind::Transport(err.to_string()),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error {
            kind: ErrorKind::Decode(err.to_string()),
            source: Some(Box::new(err)),
        }
    }
}
