//! Conversions between JSON payloads and Qdrant's protobuf values.

use std::collections::HashMap;

use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{ListValue, Struct, Value};
use serde_json::Value as Json;

use crate::Payload;

/// Converts a JSON payload into Qdrant payload fields.
pub(super) fn payload_to_qdrant(payload: Payload) -> HashMap<String, Value> {
    payload
        .into_iter()
        .map(|(key, value)| (key, json_to_qdrant(value)))
        .collect()
}

/// Converts Qdrant payload fields into a JSON payload.
pub(super) fn payload_from_qdrant(payload: HashMap<String, Value>) -> Payload {
    payload
        .into_iter()
        .map(|(key, value)| (key, qdrant_to_json(value)))
        .collect()
}

fn json_to_qdrant(value: Json) -> Value {
    let kind = match value {
        Json::Null => Kind::NullValue(0),
        Json::Bool(b) => Kind::BoolValue(b),
        Json::Number(n) => match n.as_i64() {
            Some(i) => Kind::IntegerValue(i),
            None => n
                .as_f64()
                .map(Kind::DoubleValue)
                .unwrap_or_else(|| Kind::StringValue(n.to_string())),
        },
        Json::String(s) => Kind::StringValue(s),
        Json::Array(items) => Kind::ListValue(ListValue {
            values: items.into_iter().map(json_to_qdrant).collect(),
        }),
        Json::Object(fields) => Kind::StructValue(Struct {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k, json_to_qdrant(v)))
                .collect(),
        }),
    };

    Value { kind: Some(kind) }
}

fn qdrant_to_json(value: Value) -> Json {
    match value.kind {
        None | Some(Kind::NullValue(_)) => Json::Null,
        Some(Kind::BoolValue(b)) => Json::Bool(b),
        Some(Kind::IntegerValue(i)) => Json::from(i),
        Some(Kind::DoubleValue(f)) => Json::from(f),
        Some(Kind::StringValue(s)) => Json::String(s),
        Some(Kind::ListValue(list)) => {
            Json::Array(list.values.into_iter().map(qdrant_to_json).collect())
        }
        Some(Kind::StructValue(obj)) => Json::Object(
            obj.fields
                .into_iter()
                .map(|(k, v)| (k, qdrant_to_json(v)))
                .collect(),
        ),
    }
}
