//! Chat-completion envelope validation
//!
//! Only `choices[0].message.content` is consumed; everything else in the
//! provider's response is ignored.

use crate::error::{EnvelopeCheck, ExtractionError};
use serde_json::Value;
use tracing::warn;

/// Decode a raw response body into a JSON value
pub fn decode_envelope(body: &str) -> Result<Value, ExtractionError> {
    serde_json::from_str(body).map_err(|e| {
        warn!("Completion body is not JSON: {}", e);
        malformed(EnvelopeCheck::NotJson)
    })
}

/// Locate the first choice's message content
pub fn completion_content(envelope: &Value) -> Result<&str, ExtractionError> {
    let object = envelope
        .as_object()
        .ok_or_else(|| malformed(EnvelopeCheck::NotObject))?;

    let choices = object
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| malformed(EnvelopeCheck::MissingChoices))?;

    let first = choices
        .first()
        .ok_or_else(|| malformed(EnvelopeCheck::EmptyChoices))?;

    let choice = first
        .as_object()
        .ok_or_else(|| malformed(EnvelopeCheck::ChoiceNotObject))?;

    let message = choice
        .get("message")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed(EnvelopeCheck::MissingMessage))?;

    match message.get("content") {
        Some(Value::String(content)) if !content.is_empty() => Ok(content),
        Some(Value::String(_)) | Some(Value::Null) | None => {
            Err(malformed(EnvelopeCheck::EmptyContent))
        }
        Some(_) => Err(malformed(EnvelopeCheck::ContentNotString)),
    }
}

fn malformed(check: EnvelopeCheck) -> ExtractionError {
    warn!(%check, "Rejecting completion envelope");
    ExtractionError::MalformedEnvelope { check }
}
