use crate::error::DecodeError;
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;

/// Decodes one raw search record into a fresh `T`.
///
/// The engine never looks inside records; the target type is chosen by the caller once per
/// search and applied to every record independently.
pub fn decode_record<T: DeserializeOwned>(procedure: &str, raw: &RawValue) -> Result<T, DecodeError> {
    serde_json::from_str(raw.get()).map_err(|source| DecodeError::Record {
        procedure: procedure.to_string(),
        source,
    })
}
