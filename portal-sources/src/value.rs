//! Firestore typed values <-> plain JSON
//!
//! Firestore wraps every value in a single-key object naming its type
//! (`{"stringValue": "a"}`, `{"integerValue": "42"}`, ...). Records are
//! decoded from plain JSON, so documents are unwrapped on the way in and
//! filter operands wrapped on the way out.

use serde_json::{json, Map, Value};

/// Unwrap a typed Firestore value
pub fn decode_value(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return Value::Null;
    };
    let Some((kind, inner)) = obj.iter().next() else {
        return Value::Null;
    };

    match kind.as_str() {
        "nullValue" => Value::Null,
        "integerValue" => match inner {
            Value::String(s) => s.parse::<i64>().map(Value::from).unwrap_or_else(|_| inner.clone()),
            other => other.clone(),
        },
        "mapValue" => Value::Object(
            inner
                .get("fields")
                .and_then(Value::as_object)
                .map(decode_fields)
                .unwrap_or_default(),
        ),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        // stringValue, booleanValue, doubleValue, timestampValue,
        // referenceValue, bytesValue, geoPointValue
        _ => inner.clone(),
    }
}

/// Unwrap every field of a document's `fields` object
pub fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(name, value)| (name.clone(), decode_value(value)))
        .collect()
}

/// Wrap plain JSON as a typed Firestore value
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(fields) => {
            let encoded: Map<String, Value> = fields
                .iter()
                .map(|(name, v)| (name.clone(), encode_value(v)))
                .collect();
            json!({ "mapValue": { "fields": encoded } })
        }
    }
}
