//! # Call Errors
//!
//! Errors shared by every Conduit call. Transport-level failures live in
//! [`crate::transport`], configuration failures in [`crate::config`] and argument
//! encoding failures in [`crate::encoding`]; [`CallError`] aggregates all of them.
use crate::{catalog::ProcedureKind, encoding::EncodeError, transport::TransportError};

/// An application-level failure reported inside an otherwise well-formed response envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[{code}] {info}")]
pub struct RemoteApiError {
    /// The `error_code` field of the envelope (e.g. `ERR-CONDUIT-CORE`).
    pub code: String,
    /// The human-readable `error_info` field of the envelope.
    pub info: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The response as a whole could not be decoded.
    #[error("Failed to decode the response of '{procedure}': '{source}'")]
    Envelope {
        procedure: String,
        #[source]
        source: serde_json::Error,
    },
    /// A single record could not be decoded into the requested shape.
    #[error("Failed to decode a record returned by '{procedure}': '{source}'")]
    Record {
        procedure: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("Procedure '{name}' is not a known {expected} procedure")]
    UnknownProcedure {
        name: String,
        expected: ProcedureKind,
    },
    #[error("Procedure name '{name}' does not resolve against the API root: '{source}'")]
    InvalidProcedureName {
        name: String,
        #[source]
        source: url::ParseError,
    },
    #[error("The call was cancelled before it was sent")]
    Cancelled,
    #[error("Failed to encode the arguments: '{0}'")]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("Remote API error: {0}")]
    Remote(#[from] RemoteApiError),
}

impl CallError {
    /// Whether this error ends the stream it was reported on.
    ///
    /// Only per-record decode failures leave a search stream running.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CallError::Decode(DecodeError::Record { .. }))
    }
}
