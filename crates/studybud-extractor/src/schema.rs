//! Target schema descriptors and soft-default allow-lists

use serde_json::{json, Map, Value};

/// Expected JSON type of a schema field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// A string
    Text,
    /// An integral number
    Integer,
    /// Any number
    Number,
    /// An array of strings
    TextList,
    /// An array of arbitrary values
    List,
    /// An array of objects with no fixed fields
    ObjectList,
    /// An object mapping keys to arrays of strings
    TextListMap,
    /// An object mapping keys to numbers
    NumberMap,
    /// An array of records, each reconciled against its own schema.
    /// Non-object elements are dropped.
    Records(&'static RecordSchema),
}

impl FieldKind {
    /// Whether `value` has this kind's JSON type
    ///
    /// For `Records` only the outer array is checked here; the elements are
    /// reconciled separately.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Number => value.is_number(),
            FieldKind::TextList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            FieldKind::List | FieldKind::Records(_) => value.is_array(),
            FieldKind::ObjectList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_object)),
            FieldKind::TextListMap => value.as_object().is_some_and(|map| {
                map.values().all(|v| FieldKind::TextList.matches(v))
            }),
            FieldKind::NumberMap => value
                .as_object()
                .is_some_and(|map| map.values().all(Value::is_number)),
        }
    }

    /// Description used in schema-violation messages
    pub fn expected(&self) -> &'static str {
        match self {
            FieldKind::Text => "a string",
            FieldKind::Integer => "an integer",
            FieldKind::Number => "a number",
            FieldKind::TextList => "an array of strings",
            FieldKind::List => "an array",
            FieldKind::ObjectList => "an array of objects",
            FieldKind::TextListMap => "an object of string arrays",
            FieldKind::NumberMap => "an object of numbers",
            FieldKind::Records(_) => "an array of objects",
        }
    }

    fn json_schema(&self) -> Value {
        match self {
            FieldKind::Text => json!({"type": "string"}),
            FieldKind::Integer => json!({"type": "integer"}),
            FieldKind::Number => json!({"type": "number"}),
            FieldKind::TextList => json!({"type": "array", "items": {"type": "string"}}),
            FieldKind::List => json!({"type": "array"}),
            FieldKind::ObjectList => json!({"type": "array", "items": {"type": "object"}}),
            FieldKind::TextListMap => json!({
                "type": "object",
                "additionalProperties": {"type": "array", "items": {"type": "string"}}
            }),
            FieldKind::NumberMap => json!({
                "type": "object",
                "additionalProperties": {"type": "number"}
            }),
            FieldKind::Records(record) => json!({
                "type": "array",
                "items": object_schema(record.fields),
            }),
        }
    }
}

/// A named field in a schema
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// JSON key
    pub name: &'static str,
    /// Expected type
    pub kind: FieldKind,
    /// Description forwarded to the model in the response format
    pub description: &'static str,
}

impl FieldSpec {
    /// Create a field spec
    pub const fn new(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
        }
    }
}

/// Fallback value for a soft-default field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    /// `[]`
    EmptyList,
    /// `{}`
    EmptyMap,
    /// `""`
    EmptyText,
    /// A fixed integer
    Integer(i64),
}

impl DefaultValue {
    /// JSON value to insert
    pub fn to_value(self) -> Value {
        match self {
            DefaultValue::EmptyList => Value::Array(Vec::new()),
            DefaultValue::EmptyMap => Value::Object(Map::new()),
            DefaultValue::EmptyText => Value::String(String::new()),
            DefaultValue::Integer(n) => Value::from(n),
        }
    }
}

/// An allow-listed field and the value used when the model omits it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftDefault {
    /// JSON key
    pub field: &'static str,
    /// Fallback value
    pub value: DefaultValue,
}

impl SoftDefault {
    /// Create a soft default
    pub const fn new(field: &'static str, value: DefaultValue) -> Self {
        Self { field, value }
    }
}

/// Schema of each element in a record collection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordSchema {
    /// Required fields of each element
    pub fields: &'static [FieldSpec],
    /// Allow-listed per-element defaults
    pub soft_defaults: &'static [SoftDefault],
}

/// Shape of the object a completion must decode into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSchema {
    /// Schema name, also used as the response-format title
    pub name: &'static str,
    /// Required top-level fields
    pub fields: &'static [FieldSpec],
}

impl TargetSchema {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Render as a JSON Schema document for `response_format`
    pub fn to_json_schema(&self) -> Value {
        let mut schema = object_schema(self.fields);
        if let Value::Object(map) = &mut schema {
            map.insert("title".to_string(), Value::String(self.name.to_string()));
        }
        schema
    }
}

fn object_schema(fields: &[FieldSpec]) -> Value {
    let mut properties = Map::new();
    for field in fields {
        let mut property = field.kind.json_schema();
        if let Value::Object(map) = &mut property {
            map.insert(
                "description".to_string(),
                Value::String(field.description.to_string()),
            );
        }
        properties.insert(field.name.to_string(), property);
    }

    let required: Vec<&str> = fields.iter().map(|f| f.name).collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CARD: RecordSchema = RecordSchema {
        fields: &[
            FieldSpec::new("question", FieldKind::Text, "Question"),
            FieldSpec::new("difficulty", FieldKind::Integer, "Difficulty"),
        ],
        soft_defaults: &[SoftDefault::new("difficulty", DefaultValue::Integer(3))],
    };

    const DECK: TargetSchema = TargetSchema {
        name: "deck",
        fields: &[FieldSpec::new("quiz", FieldKind::Records(&CARD), "Cards")],
    };

    #[test]
    fn test_kind_matching() {
        assert!(FieldKind::Text.matches(&json!("a")));
        assert!(!FieldKind::Text.matches(&json!(1)));
        assert!(FieldKind::Integer.matches(&json!(3)));
        assert!(!FieldKind::Integer.matches(&json!(3.5)));
        assert!(FieldKind::Number.matches(&json!(3.5)));
        assert!(FieldKind::TextList.matches(&json!(["a", "b"])));
        assert!(FieldKind::TextList.matches(&json!([])));
        assert!(!FieldKind::TextList.matches(&json!(["a", 1])));
        assert!(FieldKind::List.matches(&json!(["a", {"b": 1}])));
        assert!(!FieldKind::ObjectList.matches(&json!(["a"])));
        assert!(FieldKind::TextListMap.matches(&json!({"a": ["x"], "b": []})));
        assert!(!FieldKind::TextListMap.matches(&json!({"a": "x"})));
        assert!(FieldKind::NumberMap.matches(&json!({"a": 1, "b": 2.5})));
        assert!(!FieldKind::NumberMap.matches(&json!({"a": "1"})));
    }

    #[test]
    fn test_default_values() {
        assert_eq!(DefaultValue::EmptyList.to_value(), json!([]));
        assert_eq!(DefaultValue::EmptyMap.to_value(), json!({}));
        assert_eq!(DefaultValue::EmptyText.to_value(), json!(""));
        assert_eq!(DefaultValue::Integer(3).to_value(), json!(3));
    }

    #[test]
    fn test_json_schema_rendering() {
        let schema = DECK.to_json_schema();
        assert_eq!(schema["title"], "deck");
        assert_eq!(schema["required"], json!(["quiz"]));
        assert_eq!(schema["properties"]["quiz"]["type"], "array");
        assert_eq!(
            schema["properties"]["quiz"]["items"]["required"],
            json!(["question", "difficulty"])
        );
        assert_eq!(
            schema["properties"]["quiz"]["items"]["properties"]["difficulty"]["type"],
            "integer"
        );
    }

    #[test]
    fn test_field_lookup() {
        assert!(DECK.field("quiz").is_some());
        assert!(DECK.field("missing").is_none());
    }
}
