//! JSON <-> attribute conversion.
//!
//! Inbound numbers become decimals from their textual form, so `8.1` is
//! stored as exactly `8.1`. Outbound decimals become `f64`, which is the
//! only lossy step.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

use super::attribute::{Attribute, Item};
use super::errors::{CodecError, CodecResult};

/// Convert a JSON number to an exact decimal
pub fn decode_number(number: &Number) -> CodecResult<Decimal> {
    if let Some(i) = number.as_i64() {
        return Ok(Decimal::from(i));
    }
    if let Some(u) = number.as_u64() {
        return Ok(Decimal::from(u));
    }
    decode_numeric_str(&number.to_string())
}

/// Parse decimal text, accepting plain and scientific notation
pub fn decode_numeric_str(text: &str) -> CodecResult<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CodecError::InvalidNumber(text.to_string()));
    }

    Decimal::from_str_exact(text)
        .or_else(|_| Decimal::from_str(text))
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| match text.parse::<f64>() {
            Ok(f) if f.is_finite() => CodecError::NumberOutOfRange(text.to_string()),
            _ => CodecError::InvalidNumber(text.to_string()),
        })
}

/// Convert any JSON value to a stored attribute, recursively
pub fn decode_value(value: &Value) -> CodecResult<Attribute> {
    Ok(match value {
        Value::Null => Attribute::Null,
        Value::Bool(b) => Attribute::Bool(*b),
        Value::Number(n) => Attribute::Number(decode_number(n)?),
        Value::String(s) => Attribute::String(s.clone()),
        Value::Array(items) => Attribute::List(
            items
                .iter()
                .map(decode_value)
                .collect::<CodecResult<Vec<_>>>()?,
        ),
        Value::Object(map) => Attribute::Map(decode_object(map)?),
    })
}

/// Convert a JSON object to a stored item
pub fn decode_object(map: &Map<String, Value>) -> CodecResult<Item> {
    map.iter()
        .map(|(k, v)| Ok((k.clone(), decode_value(v)?)))
        .collect()
}

/// Convert a stored attribute to JSON, rendering decimals as floats
pub fn encode_attribute(attribute: &Attribute) -> Value {
    match attribute {
        Attribute::Null => Value::Null,
        Attribute::Bool(b) => Value::Bool(*b),
        Attribute::String(s) => Value::String(s.clone()),
        Attribute::Number(d) => encode_decimal(d),
        Attribute::List(items) => Value::Array(items.iter().map(encode_attribute).collect()),
        Attribute::Map(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), encode_attribute(v)))
                .collect(),
        ),
    }
}

/// Convert a stored item to a JSON object
pub fn encode_item(item: &Item) -> Value {
    Value::Object(
        item.iter()
            .map(|(k, v)| (k.clone(), encode_attribute(v)))
            .collect(),
    )
}

/// Convert a sequence of stored items to a JSON array
pub fn encode_items(items: &[Item]) -> Value {
    Value::Array(items.iter().map(encode_item).collect())
}

fn encode_decimal(d: &Decimal) -> Value {
    d.to_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
