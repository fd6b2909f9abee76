//! JSON export of node metadata.

use serde_json::{json, Value};

use crate::core::{NodeMetadata, ValueVisitor};
use crate::util::Vector3;

/// Convert a store to a JSON array of `{"key", "type", "value"}` objects.
///
/// Slot order and duplicate keys are preserved. Unset slots have `null`
/// type and value.
pub fn to_json(meta: &NodeMetadata) -> Value {
    let entries: Vec<Value> = meta
        .iter()
        .map(|entry| match entry.value() {
            Some(value) => json!({
                "key": entry.key(),
                "type": value.kind().name(),
                "value": value.visit(JsonValue),
            }),
            None => json!({
                "key": entry.key(),
                "type": null,
                "value": null,
            }),
        })
        .collect();
    Value::Array(entries)
}

/// Pretty-printed [`to_json`].
pub fn to_json_string(meta: &NodeMetadata) -> String {
    serde_json::to_string_pretty(&to_json(meta)).unwrap_or_default()
}

struct JsonValue;

impl ValueVisitor for JsonValue {
    type Output = Value;

    fn visit_bool(self, value: bool) -> Value {
        Value::Bool(value)
    }

    fn visit_int32(self, value: i32) -> Value {
        json!(value)
    }

    fn visit_uint64(self, value: u64) -> Value {
        json!(value)
    }

    // Non-finite floats have no JSON form and become null.
    fn visit_float32(self, value: f32) -> Value {
        json!(value)
    }

    fn visit_string(self, value: &str) -> Value {
        Value::String(value.to_string())
    }

    fn visit_vector3(self, value: Vector3) -> Value {
        json!([value.x, value.y, value.z])
    }
}
