//! JSON interop: converting interpreter values to and from JSON documents.
//! Backs the `json-encode` and `json-decode` natives (feature `json`).
//!
//! The mapping is the natural one: nil/null, booleans, numbers (decoded
//! numbers are re-classified, so `3.0` decodes as an integer), strings,
//! arrays (decoded as vectors), and objects (decoded as maps with string
//! keys). Keywords and symbols encode as their text - a keyword sheds its
//! sigil - so `{:a 1}` encodes to `{"a":1}`. Callables and atoms have no
//! JSON form and refuse to encode; non-finite numbers likewise.

use std::collections::BTreeMap;

use crate::value::Value;
use crate::{Error, ParseError, ParseErrorKind};

/// Parse a JSON document into a value.
pub fn decode(input: &str) -> Result<Value, Error> {
    let json: serde_json::Value = serde_json::from_str(input).map_err(|e| {
        Error::Parse(ParseError::from_message(
            ParseErrorKind::InvalidSyntax,
            format!("invalid JSON: {e}"),
        ))
    })?;
    Ok(from_json(&json))
}

/// Render a value as a JSON document.
pub fn encode(value: &Value) -> Result<String, Error> {
    to_json(value).map(|json| json.to_string())
}

/// Convert a parsed JSON tree to a value. Total - every JSON document has a
/// value form.
pub fn from_json(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Nil,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            // Re-classify so whole-valued doubles regain the integer tag
            None => Value::number(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::string(s.as_str()),
        serde_json::Value::Array(elements) => {
            Value::vector(elements.iter().map(from_json).collect())
        }
        serde_json::Value::Object(object) => {
            let mut entries = BTreeMap::new();
            for (key, value) in object {
                entries.insert(Value::string(key.as_str()), from_json(value));
            }
            Value::map(entries)
        }
    }
}

/// Convert a value to a JSON tree, rejecting kinds with no JSON form.
pub fn to_json(value: &Value) -> Result<serde_json::Value, Error> {
    match value {
        Value::Nil => Ok(serde_json::Value::Null),
        Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
        Value::Int(n) => Ok(serde_json::Value::Number((*n).into())),
        Value::Float(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .ok_or_else(|| {
                Error::Eval("cannot encode a non-finite number as JSON".to_string())
            }),
        Value::String(text) | Value::Symbol(text) => {
            Ok(serde_json::Value::String(text.to_string()))
        }
        Value::Keyword(text) => Ok(serde_json::Value::String(
            text.strip_prefix(':').unwrap_or(text).to_string(),
        )),
        Value::List(elements) | Value::Vector(elements) => elements
            .iter()
            .map(to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(serde_json::Value::Array),
        Value::Map(entries) => {
            let mut object = serde_json::Map::new();
            for (key, value) in entries.iter() {
                let key = match key {
                    Value::String(text) | Value::Symbol(text) => text.to_string(),
                    Value::Keyword(text) => {
                        text.strip_prefix(':').unwrap_or(text).to_string()
                    }
                    other => {
                        return Err(Error::Type {
                            expected: "string, symbol, or keyword map key",
                            actual: other.type_name(),
                        });
                    }
                };
                object.insert(key, to_json(value)?);
            }
            Ok(serde_json::Value::Object(object))
        }
        other @ (Value::Native(_) | Value::Closure(_) | Value::Atom(_)) => Err(Error::Type {
            expected: "JSON-representable value",
            actual: other.type_name(),
        }),
    }
}
