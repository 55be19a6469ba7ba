//! Error types for the client.
//!
//! Two layers: [`TransportError`] is what the transport collaborator reports
//! for a single request, [`ClientError`] is what every public operation of the
//! client returns. Transport errors pass through unchanged, wrapped in
//! [`ClientError::Transport`]. All other variants originate in the client:
//! most are pre-condition failures raised before any request is issued.

use thiserror::Error;

/// Failure of a single request/response exchange.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The request did not complete within the transport's timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The server could not be reached (refused, reset, DNS failure, TLS).
    #[error("Connection failed: {0}")]
    Connection(String),

    /// The server answered with a non-2xx status.
    #[error("Server responded with HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Malformed response body: {0}")]
    MalformedBody(String),
}

impl TransportError {
    /// HTTP status for server-side failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether retrying the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Connection(_) => true,
            Self::Server { status, .. } => *status >= 500,
            Self::MalformedBody(_) => false,
        }
    }
}

/// Error returned by client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A link descriptor in a payload lacks its method or href.
    #[error("Malformed link '{operation}': {reason}")]
    MalformedLink { operation: String, reason: String },

    /// The resource does not advertise the requested operation.
    #[error("Operation not supported by {resource}: {operation}")]
    UnsupportedOperation { resource: String, operation: String },

    /// A parameter the link declares as required was not supplied.
    #[error("Missing required parameter '{parameter}' for operation {operation}")]
    MissingParameter { operation: String, parameter: String },

    /// The request failed at the transport layer.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A sub-resource with the same identity key already exists.
    #[error("{kind} '{key}' already exists")]
    DuplicateResource { kind: &'static str, key: String },

    /// No sub-resource with this identity key exists.
    #[error("{kind} '{key}' not found")]
    NotFound { kind: &'static str, key: String },

    /// Resource attributes in a payload are missing or ill-typed.
    #[error("Malformed {kind} payload: {reason}")]
    MalformedPayload { kind: &'static str, reason: String },

    /// The resource behind a capability has been dropped.
    #[error("Resource backing this capability is no longer available: {0}")]
    Detached(String),

    /// Local I/O failure (e.g. spawning the availability worker).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    pub(crate) fn unsupported(resource: impl Into<String>, operation: &str) -> Self {
        Self::UnsupportedOperation {
            resource: resource.into(),
            operation: operation.to_string(),
        }
    }

    pub(crate) fn malformed_payload(kind: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            kind,
            reason: reason.into(),
        }
    }

    pub(crate) fn not_found(kind: &'static str, key: &str) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub(crate) fn duplicate(kind: &'static str, key: &str) -> Self {
        Self::DuplicateResource {
            kind,
            key: key.to_string(),
        }
    }

    /// Whether the error originated in the client rather than the transport.
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Transport(_))
    }
}
