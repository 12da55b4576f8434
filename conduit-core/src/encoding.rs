//! # Conduit Wire Encoding
//!
//! Conduit speaks form-encoded requests and JSON responses.
//!
//! 1. **Requests**: [`FormArgs`] turns any `Serialize` value into an ordered list of
//!    bracketed key/value pairs (`constraints[statuses][0]=open`) and renders the form body.
//! 2. **Responses**: [`FixupRules`] rewrites known response anomalies in the raw bytes, then
//!    the response envelope (`result`, `error_code`, `error_info`) is decoded and
//!    application-level errors are lifted into [`crate::error::RemoteApiError`].
mod envelope;
mod fixup;
mod form;

pub(crate) use envelope::decode_envelope;
pub use fixup::{Fixup, FixupRules};
pub use form::FormArgs;

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("Arguments must serialize to a key/value object, got {0}")]
    NotAnObject(&'static str),
    #[error("Object identifier must be an integer, a string or absent, got {0}")]
    UnsupportedIdentifier(&'static str),
    #[error("Failed to serialize the arguments: '{0}'")]
    Serialize(#[from] serde_json::Error),
}

/// Name of a JSON value's type, for error messages.
pub(crate) fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
