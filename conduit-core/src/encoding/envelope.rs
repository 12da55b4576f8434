use crate::error::{CallError, DecodeError, RemoteApiError};
use serde::Deserialize;
use serde::de::{DeserializeOwned, Error as _};
use tracing::error;

/// The shape shared by every Conduit response.
#[derive(Debug, Deserialize)]
struct Envelope<R> {
    result: Option<R>,
    error_code: Option<String>,
    error_info: Option<String>,
}

/// Decodes a response envelope, lifting `error_code`/`error_info` into a
/// [`RemoteApiError`].
pub(crate) fn decode_envelope<R: DeserializeOwned>(
    procedure: &str,
    body: &[u8],
) -> Result<R, CallError> {
    let envelope: Envelope<R> = serde_json::from_slice(body).map_err(|source| {
        error!(procedure, error = %source, "Failed to decode JSON");
        DecodeError::Envelope {
            procedure: procedure.to_string(),
            source,
        }
    })?;

    if let Some(code) = envelope.error_code
        && !code.is_empty()
    {
        let info = envelope.error_info.unwrap_or_default();
        error!(
            procedure,
            error_code = %code,
            error_info = %info,
            "Invalid Conduit request"
        );
        return Err(RemoteApiError { code, info }.into());
    }

    envelope.result.ok_or_else(|| {
        error!(procedure, "Response carries neither a result nor an error");
        DecodeError::Envelope {
            procedure: procedure.to_string(),
            source: serde_json::Error::missing_field("result"),
        }
        .into()
    })
}
