//! serde_json interop for value trees.
//!
//! Import is total: every JSON document maps to a [`Value`]. Export is
//! lossy for the variants JSON cannot carry: capabilities and
//! numeric-special values become null, regular expressions export their
//! pattern text, dates export their epoch milliseconds and error
//! surrogates export their message.

use crate::value::Value;
use serde_json::{Map, Number, Value as JsonValue};
use std::collections::BTreeMap;

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(flag) => Value::Bool(flag),
            JsonValue::Number(number) => Value::Number(number.as_f64().unwrap_or(f64::NAN)),
            JsonValue::String(text) => Value::String(text),
            JsonValue::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            JsonValue::Object(entries) => {
                let mut converted = BTreeMap::new();
                for (key, value) in entries {
                    converted.insert(key, Value::from(value));
                }
                Value::Object(converted)
            }
        }
    }
}

/// Exports a value as JSON, dropping what JSON cannot represent.
pub fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(flag) => JsonValue::Bool(*flag),
        Value::Number(number) => Number::from_f64(*number)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::String(text) => JsonValue::String(text.clone()),
        Value::Array(items) => JsonValue::Array(items.iter().map(to_json).collect()),
        Value::Object(entries) => {
            let mut exported = Map::new();
            for (key, item) in entries {
                exported.insert(key.clone(), to_json(item));
            }
            JsonValue::Object(exported)
        }
        Value::Function(_) => JsonValue::Null,
        Value::Date(epoch_ms) => JsonValue::Number(Number::from(*epoch_ms)),
        Value::Regex(pattern) => JsonValue::String(pattern.as_str().to_string()),
        Value::Error(message) => JsonValue::String(message.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{classify, TypeTag};
    use crate::vmap;
    use serde_json::json;

    #[test]
    fn json_import_is_total_over_documents() {
        let value = Value::from(json!({
            "name": "Bob",
            "age": 30,
            "tags": ["a", "b"],
            "nested": { "active": true, "score": 1.5 },
            "missing": null,
        }));
        assert_eq!(classify(&value), TypeTag::Object);
        assert_eq!(value.get("age"), Some(&Value::Number(30.0)));
        assert_eq!(
            value.get("nested").and_then(|v| v.get("active")),
            Some(&Value::Bool(true))
        );
        assert_eq!(value.get("missing"), Some(&Value::Null));
    }

    #[test]
    fn json_export_drops_unrepresentable_variants() {
        let value = vmap! {
            "nan" => f64::NAN,
            "date" => Value::Date(1_500_000_000_000),
            "err" => Value::Error("boom".into()),
        };
        let exported = to_json(&value);
        assert_eq!(exported["nan"], json!(null));
        assert_eq!(exported["date"], json!(1_500_000_000_000_i64));
        assert_eq!(exported["err"], json!("boom"));
    }

    #[test]
    fn json_round_trips_plain_data() {
        let document = json!({ "a": 1.0, "b": ["x", false], "c": { "d": null } });
        let value = Value::from(document.clone());
        assert_eq!(to_json(&value), document);
    }
}
