//! Stored attribute values.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

/// A single stored record, keyed by attribute name
pub type Item = BTreeMap<String, Attribute>;

/// A schemaless attribute value as held by the record store
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Null,
    Bool(bool),
    String(String),
    /// Exact decimal; never rendered as-is in a response
    Number(Decimal),
    List(Vec<Attribute>),
    Map(BTreeMap<String, Attribute>),
}

impl Attribute {
    /// Borrow the string payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Attribute::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Attribute {
    fn from(value: &str) -> Self {
        Attribute::String(value.to_string())
    }
}

impl From<String> for Attribute {
    fn from(value: String) -> Self {
        Attribute::String(value)
    }
}

impl From<Decimal> for Attribute {
    fn from(value: Decimal) -> Self {
        Attribute::Number(value)
    }
}
