//! JSON tree helpers shared by the clause, predicate and trigger codecs
//!
//! every getter takes the path of the object being read so that errors
//! point at the offending node, e.g. `condition.and[1].field`

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// a JSON object as handled by the codecs
pub type JsonObject = Map<String, Value>;

/// join a parent path and a key: `("and[0]", "field")` -> `"and[0].field"`
pub fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

/// path of an array element: `("and", 2)` -> `"and[2]"`
pub fn index_path(path: &str, index: usize) -> String {
    format!("{}[{}]", path, index)
}

/// short name of a JSON value's type, for error messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "double",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a JsonObject> {
    value
        .as_object()
        .ok_or_else(|| Error::malformed(format!("expected object, got {}", type_name(value)), path))
}

pub fn require<'a>(obj: &'a JsonObject, key: &str, path: &str) -> Result<&'a Value> {
    obj.get(key)
        .ok_or_else(|| Error::malformed(format!("missing '{}'", key), path))
}

pub fn require_str<'a>(obj: &'a JsonObject, key: &str, path: &str) -> Result<&'a str> {
    let value = require(obj, key, path)?;
    value.as_str().ok_or_else(|| {
        Error::malformed(
            format!("expected string, got {}", type_name(value)),
            child_path(path, key),
        )
    })
}

/// optional string; present-but-wrong-type is still an error
pub fn optional_str<'a>(obj: &'a JsonObject, key: &str, path: &str) -> Result<Option<&'a str>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(Error::malformed(
            format!("expected string, got {}", type_name(other)),
            child_path(path, key),
        )),
    }
}

pub fn optional_bool(obj: &JsonObject, key: &str, path: &str) -> Result<Option<bool>> {
    match obj.get(key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(Error::malformed(
            format!("expected boolean, got {}", type_name(other)),
            child_path(path, key),
        )),
    }
}

pub fn optional_object<'a>(
    obj: &'a JsonObject,
    key: &str,
    path: &str,
) -> Result<Option<&'a JsonObject>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(Error::malformed(
            format!("expected object, got {}", type_name(other)),
            child_path(path, key),
        )),
    }
}

/// look up a dotted field name in a state document
///
/// `"light.color"` resolves `{"light": {"color": 3}}`; a key containing the
/// full dotted name wins over nested lookup
pub fn lookup_field<'a>(state: &'a Value, field: &str) -> Option<&'a Value> {
    let obj = state.as_object()?;
    if let Some(v) = obj.get(field) {
        return Some(v);
    }

    let mut current = state;
    for part in field.split('.') {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}
