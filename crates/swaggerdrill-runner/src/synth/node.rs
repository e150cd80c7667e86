//! Typed schema nodes, decoded once from raw JSON
//!
//! Decoding never fails: anything unrecognizable becomes [`SchemaNode::Empty`].
//! Keyword presence follows JavaScript truthiness where the generator's
//! precedence rules depend on it (`example`/`default` on strings, objects and
//! arrays ignore `""`, `0`, `false` and `null`; numbers accept any present value).

use serde_json::Value;

/// Nesting deeper than this decodes to [`SchemaNode::Empty`].
const MAX_DEPTH: u32 = 32;

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// `$ref`, left unresolved
    Ref,
    Composite(Composition),
    Object(ObjectSchema),
    Array(ArraySchema),
    String(StringSchema),
    Number(NumberSchema),
    Boolean,
    Null,
    /// Absent, malformed or typeless without structure
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Composition {
    /// Only the first member is used
    OneOf(Vec<SchemaNode>),
    /// Only the first member is used
    AnyOf(Vec<SchemaNode>),
    /// Every member, shallow-merged left to right
    AllOf(Vec<SchemaNode>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    pub example: Option<Value>,
    /// Declaration order
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub schema: SchemaNode,
    pub read_only: bool,
    /// Listed in the parent's `required`
    pub required: bool,
}

impl Property {
    /// Server-assigned fields are not sent.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.read_only && self.required
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArraySchema {
    pub example: Option<Value>,
    pub items: Box<SchemaNode>,
    pub min_items: u64,
    pub max_items: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringSchema {
    pub example: Option<Value>,
    pub enum_values: Vec<Value>,
    pub default: Option<Value>,
    pub format: Option<StringFormat>,
    pub has_pattern: bool,
    pub min_length: u64,
    pub max_length: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    Date,
    DateTime,
    Email,
    /// `uri`, `url` and `hostname`
    Url,
    Uuid,
    Password,
    Byte,
    Binary,
    Ipv4,
    Ipv6,
}

impl StringFormat {
    fn parse(format: &str) -> Option<Self> {
        Some(match format {
            "date" => Self::Date,
            "date-time" => Self::DateTime,
            "email" => Self::Email,
            "uri" | "url" | "hostname" => Self::Url,
            "uuid" => Self::Uuid,
            "password" => Self::Password,
            "byte" => Self::Byte,
            "binary" => Self::Binary,
            "ipv4" => Self::Ipv4,
            "ipv6" => Self::Ipv6,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberSchema {
    pub integer: bool,
    pub example: Option<Value>,
    pub enum_values: Vec<Value>,
    pub default: Option<Value>,
    pub minimum: f64,
    pub maximum: f64,
}

impl SchemaNode {
    /// Decode a raw schema fragment.
    #[must_use]
    pub fn decode(schema: &Value) -> Self {
        decode_inner(schema, 0)
    }
}

fn decode_inner(schema: &Value, depth: u32) -> SchemaNode {
    if depth > MAX_DEPTH {
        return SchemaNode::Empty;
    }
    let Some(obj) = schema.as_object() else {
        return SchemaNode::Empty;
    };

    if obj.contains_key("$ref") {
        return SchemaNode::Ref;
    }
    if let Some(parts) = members(schema, "oneOf", depth) {
        return SchemaNode::Composite(Composition::OneOf(parts));
    }
    if let Some(parts) = members(schema, "anyOf", depth) {
        return SchemaNode::Composite(Composition::AnyOf(parts));
    }
    if let Some(parts) = members(schema, "allOf", depth) {
        return SchemaNode::Composite(Composition::AllOf(parts));
    }

    match schema_type(schema) {
        Some("object") => decode_object(schema, depth),
        Some("array") => decode_array(schema, depth),
        Some("string") => decode_string(schema),
        Some("integer") => decode_number(schema, true),
        Some("number") => decode_number(schema, false),
        Some("boolean") => SchemaNode::Boolean,
        Some("null") => SchemaNode::Null,
        _ => {
            if obj.get("properties").is_some_and(is_truthy) {
                decode_object(schema, depth)
            } else if obj.get("items").is_some_and(is_truthy) {
                decode_array(schema, depth)
            } else {
                SchemaNode::Empty
            }
        }
    }
}

/// Decoded members of a composition keyword. A present but non-array value
/// yields no members.
fn members(schema: &Value, key: &str, depth: u32) -> Option<Vec<SchemaNode>> {
    let raw = schema.get(key).filter(|v| is_truthy(v))?;
    Some(
        raw.as_array()
            .map(|m| m.iter().map(|s| decode_inner(s, depth + 1)).collect())
            .unwrap_or_default(),
    )
}

/// `type: "string"`, or the first non-null entry of `type: ["string", "null"]`.
fn schema_type(schema: &Value) -> Option<&str> {
    match schema.get("type")? {
        Value::String(t) => Some(t.as_str()),
        Value::Array(types) => {
            let names: Vec<&str> = types.iter().filter_map(Value::as_str).collect();
            names
                .iter()
                .find(|t| **t != "null")
                .or_else(|| names.first())
                .copied()
        }
        _ => None,
    }
}

fn decode_object(schema: &Value, depth: u32) -> SchemaNode {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|r| r.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, prop)| Property {
                    name: name.clone(),
                    schema: decode_inner(prop, depth + 1),
                    read_only: prop.get("readOnly").and_then(Value::as_bool) == Some(true),
                    required: required.contains(&name.as_str()),
                })
                .collect()
        })
        .unwrap_or_default();

    SchemaNode::Object(ObjectSchema {
        example: truthy(schema, "example"),
        properties,
    })
}

fn decode_array(schema: &Value, depth: u32) -> SchemaNode {
    let items = schema
        .get("items")
        .map_or(SchemaNode::Empty, |i| decode_inner(i, depth + 1));
    SchemaNode::Array(ArraySchema {
        example: truthy(schema, "example"),
        items: Box::new(items),
        min_items: positive(schema, "minItems").unwrap_or(1),
        max_items: positive(schema, "maxItems").unwrap_or(3),
    })
}

fn decode_string(schema: &Value) -> SchemaNode {
    SchemaNode::String(StringSchema {
        example: truthy(schema, "example"),
        enum_values: enum_values(schema),
        default: truthy(schema, "default"),
        format: schema
            .get("format")
            .and_then(Value::as_str)
            .and_then(StringFormat::parse),
        has_pattern: schema.get("pattern").is_some_and(is_truthy),
        min_length: positive(schema, "minLength").unwrap_or(1),
        max_length: positive(schema, "maxLength").unwrap_or(50),
    })
}

fn decode_number(schema: &Value, integer: bool) -> SchemaNode {
    SchemaNode::Number(NumberSchema {
        integer,
        example: schema.get("example").cloned(),
        enum_values: enum_values(schema),
        default: schema.get("default").cloned(),
        minimum: schema.get("minimum").and_then(Value::as_f64).unwrap_or(0.0),
        maximum: schema.get("maximum").and_then(Value::as_f64).unwrap_or(1000.0),
    })
}

fn enum_values(schema: &Value) -> Vec<Value> {
    schema
        .get("enum")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn truthy(schema: &Value, key: &str) -> Option<Value> {
    schema.get(key).filter(|v| is_truthy(v)).cloned()
}

/// Non-zero unsigned integer keyword; `0` counts as unset.
fn positive(schema: &Value, key: &str) -> Option<u64> {
    schema.get(key).and_then(Value::as_u64).filter(|n| *n > 0)
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
