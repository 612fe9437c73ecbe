//! Envelope encoding and decoding.
//!
//! The transport already delivers one complete document per frame, so the
//! codec only deals with the structure of a single document. Decode errors
//! are local to the message; the session that received the frame keeps
//! running.

use crate::{error::DecodeError, messaging::Envelope};
use serde_json::{Map, Value};

/// Decodes a text frame into an envelope.
pub fn decode(text: &str) -> Result<Envelope, DecodeError> {
    decode_value(serde_json::from_str(text)?)
}

/// Decodes a binary frame whose payload is a UTF-8 JSON document.
pub fn decode_bytes(bytes: &[u8]) -> Result<Envelope, DecodeError> {
    decode_value(serde_json::from_slice(bytes)?)
}

fn decode_value(value: Value) -> Result<Envelope, DecodeError> {
    let mut fields = match value {
        Value::Object(map) => map,
        Value::Null => return Err(DecodeError::NotAnObject("null")),
        Value::Bool(_) => return Err(DecodeError::NotAnObject("a boolean")),
        Value::Number(_) => return Err(DecodeError::NotAnObject("a number")),
        Value::String(_) => return Err(DecodeError::NotAnObject("a string")),
        Value::Array(_) => return Err(DecodeError::NotAnObject("an array")),
    };

    match fields.remove("type") {
        Some(Value::String(kind)) => Ok(Envelope { kind, fields }),
        _ => Err(DecodeError::MissingType),
    }
}

/// Encodes an envelope as a JSON text document.
pub fn encode(envelope: &Envelope) -> String {
    let mut object = Map::with_capacity(envelope.fields.len() + 1);
    for (key, value) in &envelope.fields {
        object.insert(key.clone(), value.clone());
    }
    object.insert("type".to_string(), Value::String(envelope.kind.clone()));
    Value::Object(object).to_string()
}
