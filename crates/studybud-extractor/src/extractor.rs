//! Core extraction pipeline
//!
//! ```text
//! Envelope → Fenced → Decoded → ShapeChecked → Reconciled
//! ```
//!
//! Each stage short-circuits on failure. The pipeline is a single pass with
//! no retries and no I/O.

use crate::envelope::{completion_content, decode_envelope};
use crate::error::{json_kind, ExtractionError};
use crate::parser::{decode_json, strip_code_fence};
use crate::schema::{FieldKind, FieldSpec, SoftDefault, TargetSchema};
use crate::types::StructuredOutput;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// A reconciled object that satisfies its target schema
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DomainObject {
    #[serde(skip)]
    schema: &'static str,
    fields: Map<String, Value>,
}

impl DomainObject {
    /// Name of the schema this object was reconciled against
    pub fn schema_name(&self) -> &'static str {
        self.schema
    }

    /// Get a field by name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// All fields, including any extras the model returned
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Convert into a plain JSON object
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }

    /// Deserialize into a typed domain struct
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, ExtractionError> {
        let schema = self.schema;
        serde_json::from_value(Value::Object(self.fields)).map_err(|e| {
            ExtractionError::SchemaViolation {
                field: schema.to_string(),
                expected: e.to_string(),
            }
        })
    }
}

/// Turns raw chat-completion responses into validated domain objects
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredResponseExtractor;

impl StructuredResponseExtractor {
    /// Create an extractor
    pub fn new() -> Self {
        Self
    }

    /// Extract from a raw response body
    pub fn extract(
        &self,
        body: &str,
        schema: &TargetSchema,
        soft_defaults: &[SoftDefault],
    ) -> Result<DomainObject, ExtractionError> {
        let envelope = decode_envelope(body)?;
        self.extract_value(&envelope, schema, soft_defaults)
    }

    /// Extract from an already-decoded response envelope
    pub fn extract_value(
        &self,
        envelope: &Value,
        schema: &TargetSchema,
        soft_defaults: &[SoftDefault],
    ) -> Result<DomainObject, ExtractionError> {
        let content = completion_content(envelope)?;
        debug!(schema = schema.name, "Completion content length: {} chars", content.len());

        let cleaned = strip_code_fence(content);
        let parsed = decode_json(&cleaned)?;
        let object = expect_object(parsed)?;
        let fields = reconcile(object, schema.fields, soft_defaults, None)?;

        debug!(schema = schema.name, "Reconciled {} fields", fields.len());
        Ok(DomainObject {
            schema: schema.name,
            fields,
        })
    }

    /// Extract a typed domain object from a raw response body
    pub fn extract_as<T: StructuredOutput>(&self, body: &str) -> Result<T, ExtractionError> {
        self.extract(body, &T::SCHEMA, T::SOFT_DEFAULTS)?.into_typed()
    }

    /// Extract a typed domain object from a decoded response envelope
    pub fn extract_value_as<T: StructuredOutput>(
        &self,
        envelope: &Value,
    ) -> Result<T, ExtractionError> {
        self.extract_value(envelope, &T::SCHEMA, T::SOFT_DEFAULTS)?
            .into_typed()
    }
}

fn expect_object(value: Value) -> Result<Map<String, Value>, ExtractionError> {
    match value {
        Value::Object(map) => Ok(map),
        other => {
            let found = json_kind(&other);
            warn!(found, "Model output is not a JSON object");
            Err(ExtractionError::UnexpectedShape { found })
        }
    }
}

/// Fill soft defaults, then check every required field
fn reconcile(
    mut object: Map<String, Value>,
    fields: &[FieldSpec],
    soft_defaults: &[SoftDefault],
    path: Option<&str>,
) -> Result<Map<String, Value>, ExtractionError> {
    for default in soft_defaults {
        if !object.contains_key(default.field) {
            debug!(
                field = %field_path(path, default.field),
                "Missing field, providing default value"
            );
            object.insert(default.field.to_string(), default.value.to_value());
        }
    }

    for spec in fields {
        let field = field_path(path, spec.name);
        let value = object
            .get_mut(spec.name)
            .ok_or_else(|| violation(&field, spec.kind))?;

        match spec.kind {
            FieldKind::Records(record) => {
                let Value::Array(items) = value.take() else {
                    return Err(violation(&field, spec.kind));
                };

                let mut kept = Vec::with_capacity(items.len());
                for (idx, item) in items.into_iter().enumerate() {
                    match item {
                        Value::Object(element) => {
                            let element_path = format!("{}[{}]", field, idx);
                            let element = reconcile(
                                element,
                                record.fields,
                                record.soft_defaults,
                                Some(&element_path),
                            )?;
                            kept.push(Value::Object(element));
                        }
                        other => {
                            warn!(
                                field = %field,
                                index = idx,
                                found = json_kind(&other),
                                "Dropping non-object element"
                            );
                        }
                    }
                }
                *value = Value::Array(kept);
            }
            kind if kind.matches(value) => {}
            kind => return Err(violation(&field, kind)),
        }
    }

    Ok(object)
}

fn field_path(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) => format!("{}.{}", parent, name),
        None => name.to_string(),
    }
}

fn violation(field: &str, kind: FieldKind) -> ExtractionError {
    warn!(field, expected = kind.expected(), "Schema violation");
    ExtractionError::SchemaViolation {
        field: field.to_string(),
        expected: kind.expected().to_string(),
    }
}
