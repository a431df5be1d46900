//! JSON → flat `(path, scalar)` pairs.
//!
//! Top-level keys are used verbatim so they match dictionary rows as MRIQC
//! writes them, unless they contain path syntax (`.`, `[`, `]`, `"`); those
//! become `["escaped"]` so a literal `"a.b"` key never collides with the
//! nested `{"a": {"b": ..}}`. Below the top level, simple identifier segments
//! are joined with `.`, anything else becomes `["escaped"]`, and array
//! elements become `[index]`.

use nidm_core::{RawRecord, ScalarValue};
use serde_json::{Map, Value};

/// Append every leaf of `object` to `record`, in document order.
pub(super) fn flatten_object(object: Map<String, Value>, record: &mut RawRecord) {
    for (key, value) in object {
        let path = if has_path_syntax(&key) {
            bracketed("", &key)
        } else {
            key
        };
        flatten_value(path, value, record);
    }
}

fn flatten_value(path: String, value: Value, record: &mut RawRecord) {
    match value {
        Value::Object(object) => {
            for (key, child) in object {
                flatten_value(path_join(&path, &key), child, record);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.into_iter().enumerate() {
                flatten_value(format!("{path}[{index}]"), child, record);
            }
        }
        scalar => record.push(path, scalar_of(scalar)),
    }
}

/// Map a non-container JSON value to a [`ScalarValue`], keeping number lexicals.
pub(super) fn scalar_of(value: Value) -> ScalarValue {
    match value {
        Value::Null => ScalarValue::Null,
        Value::Bool(flag) => ScalarValue::Bool(flag),
        Value::Number(number) => ScalarValue::Number(number.to_string()),
        Value::String(text) => ScalarValue::Text(text),
        container @ (Value::Array(_) | Value::Object(_)) => ScalarValue::Text(container.to_string()),
    }
}

fn path_join(prefix: &str, segment: &str) -> String {
    if is_simple_segment(segment) {
        if prefix.is_empty() {
            segment.to_string()
        } else {
            format!("{prefix}.{segment}")
        }
    } else {
        bracketed(prefix, segment)
    }
}

fn bracketed(prefix: &str, segment: &str) -> String {
    let escaped = segment.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{prefix}[\"{escaped}\"]")
}

fn has_path_syntax(key: &str) -> bool {
    key.contains(['.', '[', ']', '"'])
}

fn is_simple_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
