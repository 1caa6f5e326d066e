//! Response envelope of the remote endpoint: `{ "data": { ... } }`.

use base64::Engine as _;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("malformed response body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed dataUrl: {0}")]
    DataUrl(&'static str),
    #[error("dataUrl payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: RemotePayload,
}

/// The fields of the `data` object this client uses. Only `dataUrl` is
/// required; the server's other size and name fields are ignored because the
/// caller measures the decoded bytes and derives the name itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePayload {
    pub data_url: String,
    #[serde(default)]
    pub converted_size: Option<u64>,
    #[serde(default)]
    pub conversion_method: Option<String>,
}

pub fn parse_envelope(body: &[u8]) -> Result<RemotePayload, EnvelopeError> {
    let envelope: Envelope = serde_json::from_slice(body)?;
    Ok(envelope.data)
}

/// Raw bytes of a `data:<mime>;base64,<payload>` URL.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, EnvelopeError> {
    let rest = url
        .trim()
        .strip_prefix("data:")
        .ok_or(EnvelopeError::DataUrl("missing data: scheme"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or(EnvelopeError::DataUrl("missing ',' separator"))?;
    if !header.to_ascii_lowercase().ends_with(";base64") {
        return Err(EnvelopeError::DataUrl("payload is not base64-encoded"));
    }
    Ok(base64::engine::general_purpose::STANDARD.decode(payload.trim())?)
}
