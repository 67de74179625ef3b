//! # Payload Codec
//!
//! Conversion between wire JSON and the stored attribute representation.
//!
//! Numbers are stored as exact decimals and rendered as floats on the way
//! out: store exact, display approximate.

pub mod attribute;
pub mod errors;
pub mod json;

pub use attribute::{Attribute, Item};
pub use errors::{CodecError, CodecResult};
pub use json::{
    decode_number, decode_numeric_str, decode_object, decode_value, encode_attribute,
    encode_item, encode_items,
};
