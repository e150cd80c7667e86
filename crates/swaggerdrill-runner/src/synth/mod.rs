//! JSON Schema → plausible request payload
//!
//! Handles the OpenAPI 2/3 subset endpoints actually declare: string (with
//! formats), integer, number, boolean, array, object, enum, example, default,
//! oneOf, anyOf and allOf. `$ref` is not resolved and yields `{}`.
//!
//! Never fails; anything the generator does not understand becomes `{}`.

mod fake;
mod node;

pub use node::{
    ArraySchema, Composition, NumberSchema, ObjectSchema, Property, SchemaNode, StringFormat,
    StringSchema,
};

use rand::Rng;
use serde_json::{Map, Value};

/// Upper bound on generated array length, whatever `minItems` asks for.
const MAX_ITEMS: u64 = 1000;

/// Generate a payload for an optional raw schema. Absent schemas yield `{}`.
pub fn synthesize(schema: Option<&Value>, rng: &mut impl Rng) -> Value {
    match schema {
        Some(raw) => generate(&SchemaNode::decode(raw), rng),
        None => empty_object(),
    }
}

/// Generate a value for a decoded schema node.
pub fn generate(node: &SchemaNode, rng: &mut impl Rng) -> Value {
    match node {
        SchemaNode::Ref | SchemaNode::Empty => empty_object(),
        SchemaNode::Composite(composition) => gen_composite(composition, rng),
        SchemaNode::Object(obj) => gen_object(obj, rng),
        SchemaNode::Array(arr) => gen_array(arr, rng),
        SchemaNode::String(s) => gen_string(s, rng),
        SchemaNode::Number(n) => gen_number(n, rng),
        SchemaNode::Boolean => Value::Bool(rng.gen_bool(0.5)),
        SchemaNode::Null => Value::Null,
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn gen_composite(composition: &Composition, rng: &mut impl Rng) -> Value {
    match composition {
        Composition::OneOf(members) | Composition::AnyOf(members) => members
            .first()
            .map_or_else(empty_object, |first| generate(first, rng)),
        Composition::AllOf(members) => {
            // Later members overwrite earlier keys; non-object parts contribute nothing.
            let mut merged = Map::new();
            for member in members {
                if let Value::Object(obj) = generate(member, rng) {
                    merged.extend(obj);
                }
            }
            Value::Object(merged)
        }
    }
}

fn gen_object(obj: &ObjectSchema, rng: &mut impl Rng) -> Value {
    if let Some(example) = &obj.example {
        return example.clone();
    }
    let map = obj
        .properties
        .iter()
        .filter(|p| !p.is_skipped())
        .map(|p| (p.name.clone(), generate(&p.schema, rng)))
        .collect();
    Value::Object(map)
}

fn gen_array(arr: &ArraySchema, rng: &mut impl Rng) -> Value {
    if let Some(example) = &arr.example {
        return example.clone();
    }
    let count = arr
        .min_items
        .max(arr.max_items.min(rng.gen_range(1..=3)))
        .min(MAX_ITEMS);
    Value::Array((0..count).map(|_| generate(&arr.items, rng)).collect())
}

fn gen_string(s: &StringSchema, rng: &mut impl Rng) -> Value {
    if let Some(example) = &s.example {
        return example.clone();
    }
    if !s.enum_values.is_empty() {
        return s.enum_values[rng.gen_range(0..s.enum_values.len())].clone();
    }
    if let Some(default) = &s.default {
        return default.clone();
    }

    let text = match s.format {
        Some(StringFormat::Date) => fake::date(rng),
        Some(StringFormat::DateTime) => fake::date_time(rng),
        Some(StringFormat::Email) => fake::email(rng),
        Some(StringFormat::Url) => fake::url(rng),
        Some(StringFormat::Uuid) => fake::uuid(rng),
        Some(StringFormat::Password) => fake::password(rng),
        Some(StringFormat::Byte) => fake::byte(rng),
        Some(StringFormat::Binary) => fake::word(rng),
        Some(StringFormat::Ipv4) => fake::ipv4(rng),
        Some(StringFormat::Ipv6) => fake::ipv6(rng),
        None if s.has_pattern => fake::word(rng),
        None => {
            let text = if s.min_length > 20 {
                fake::paragraph(rng)
            } else {
                fake::words(rng)
            };
            let max = usize::try_from(s.max_length).unwrap_or(usize::MAX);
            text.chars().take(max).collect()
        }
    };
    Value::String(text)
}

fn gen_number(n: &NumberSchema, rng: &mut impl Rng) -> Value {
    if let Some(example) = &n.example {
        return example.clone();
    }
    if !n.enum_values.is_empty() {
        return n.enum_values[rng.gen_range(0..n.enum_values.len())].clone();
    }
    if let Some(default) = &n.default {
        return default.clone();
    }

    let (lo, hi) = bounds(n.minimum, n.maximum);
    if n.integer {
        let (lo, hi) = (lo.ceil() as i64, hi.floor() as i64);
        if lo >= hi {
            return Value::from(lo);
        }
        Value::from(rng.gen_range(lo..=hi))
    } else {
        let raw = if lo < hi { lerp(lo, hi, rng.r#gen::<f64>()) } else { lo };
        let rounded = ((raw * 100.0).round() / 100.0).clamp(lo, hi);
        serde_json::Number::from_f64(rounded).map_or(Value::Null, Value::Number)
    }
}

/// Point `t` of the way from `lo` to `hi`; the span may overflow for extreme bounds.
fn lerp(lo: f64, hi: f64, t: f64) -> f64 {
    let span = hi - lo;
    if span.is_finite() {
        lo + span * t
    } else {
        lo * (1.0 - t) + hi * t
    }
}

/// Ordered, finite bounds; swapped when the schema has them backwards.
fn bounds(minimum: f64, maximum: f64) -> (f64, f64) {
    let lo = if minimum.is_finite() { minimum } else { 0.0 };
    let hi = if maximum.is_finite() { maximum } else { 1000.0 };
    if lo <= hi { (lo, hi) } else { (hi, lo) }
}
