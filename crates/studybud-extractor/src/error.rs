//! Error types for structured-response extraction

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// The envelope sub-check that rejected a completion response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeCheck {
    /// Body is not valid JSON
    NotJson,
    /// Body decoded but is not a JSON object
    NotObject,
    /// `choices` is missing or not an array
    MissingChoices,
    /// `choices` is an empty array
    EmptyChoices,
    /// `choices[0]` is not an object
    ChoiceNotObject,
    /// `message` is missing or not an object
    MissingMessage,
    /// `content` is missing, null or empty
    EmptyContent,
    /// `content` is present but not a string
    ContentNotString,
}

impl fmt::Display for EnvelopeCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            EnvelopeCheck::NotJson => "response body is not valid JSON",
            EnvelopeCheck::NotObject => "response body is not a JSON object",
            EnvelopeCheck::MissingChoices => "missing 'choices' array",
            EnvelopeCheck::EmptyChoices => "'choices' array is empty",
            EnvelopeCheck::ChoiceNotObject => "first choice is not an object",
            EnvelopeCheck::MissingMessage => "missing or invalid 'message' field",
            EnvelopeCheck::EmptyContent => "empty 'content' field",
            EnvelopeCheck::ContentNotString => "'content' is not a string",
        };
        f.write_str(reason)
    }
}

/// Errors that can occur while extracting a domain object from a completion
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// The completion envelope does not carry `choices[0].message.content`
    #[error("Malformed completion envelope: {check}")]
    MalformedEnvelope {
        /// Which sub-check failed
        check: EnvelopeCheck,
    },

    /// The (fence-stripped) content is not valid JSON
    #[error("Invalid JSON at line {line}, column {column} (offset {offset}): {message}")]
    InvalidJson {
        /// Parser error message
        message: String,
        /// 1-based line reported by the parser
        line: usize,
        /// Column reported by the parser
        column: usize,
        /// Byte offset into `text` of the failure position
        offset: usize,
        /// The text handed to the parser
        text: String,
    },

    /// The decoded content is valid JSON but not an object
    #[error("Unexpected shape: expected a JSON object, found {found}")]
    UnexpectedShape {
        /// JSON type that was found instead
        found: &'static str,
    },

    /// A required field is missing or has the wrong type
    #[error("Schema violation: field '{field}' must be {expected}")]
    SchemaViolation {
        /// Path of the offending field (e.g. `quiz[2].question`)
        field: String,
        /// Human-readable description of the expected type
        expected: String,
    },
}

impl ExtractionError {
    /// Short machine-readable classification, stable across messages
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractionError::MalformedEnvelope { .. } => "malformed_envelope",
            ExtractionError::InvalidJson { .. } => "invalid_json",
            ExtractionError::UnexpectedShape { .. } => "unexpected_shape",
            ExtractionError::SchemaViolation { .. } => "schema_violation",
        }
    }
}

/// Name of a JSON value's type, for diagnostics
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
