//! Record envelope encoding
//!
//! A stored record is `{"type": ..., "payload": ...}` as JSON, optionally
//! wrapped in base64 text.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use contracts::{Message, StreamError};
use serde::Serialize;

/// Wire encoding of the record value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordEncoding {
    /// Raw JSON bytes
    #[default]
    Json,
    /// JSON bytes as base64 text
    Base64Json,
}

impl RecordEncoding {
    pub fn from_base64_flag(base64_encode: bool) -> Self {
        if base64_encode {
            Self::Base64Json
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    #[serde(rename = "type")]
    message_type: &'a str,
    payload: &'a serde_json::Value,
}

/// Encode a message into the stored record value
///
/// # Errors
/// `StreamError::Parse` when the message cannot be represented
pub fn encode_record(
    encoding: RecordEncoding,
    message_type: &str,
    payload: &serde_json::Value,
) -> Result<Vec<u8>, StreamError> {
    if message_type.trim().is_empty() {
        return Err(StreamError::parse("message type is empty"));
    }

    let json = serde_json::to_vec(&Envelope {
        message_type,
        payload,
    })
    .map_err(|e| StreamError::parse(format!("json encode error: {e}")))?;

    Ok(match encoding {
        RecordEncoding::Json => json,
        RecordEncoding::Base64Json => STANDARD.encode(json).into_bytes(),
    })
}

/// Decode a stored record value back into a message
pub fn decode_record(encoding: RecordEncoding, value: &[u8]) -> Result<Message, StreamError> {
    let json = match encoding {
        RecordEncoding::Json => value.to_vec(),
        RecordEncoding::Base64Json => STANDARD
            .decode(value)
            .map_err(|e| StreamError::parse(format!("base64 decode error: {e}")))?,
    };

    serde_json::from_slice(&json).map_err(|e| StreamError::parse(format!("json decode error: {e}")))
}
