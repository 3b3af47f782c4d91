use liquid::model::Value as LiquidValue;
use serde_json::{Map, Number, Value as JsonValue};
use serde_yaml::Value as YamlValue;

/// Convert a YAML value to JSON, the common currency of both template engines
pub fn yaml_to_json(yaml: YamlValue) -> JsonValue {
    match yaml {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::from(i)
            } else if let Some(u) = n.as_u64() {
                JsonValue::from(u)
            } else {
                n.as_f64()
                    .and_then(Number::from_f64)
                    .map(JsonValue::Number)
                    // NaN and infinities have no JSON form
                    .unwrap_or_else(|| JsonValue::String(n.to_string()))
            }
        }
        YamlValue::String(s) => JsonValue::String(s),
        YamlValue::Sequence(seq) => JsonValue::Array(seq.into_iter().map(yaml_to_json).collect()),
        YamlValue::Mapping(map) => {
            let mut obj = Map::new();
            for (k, v) in map {
                obj.insert(yaml_key(k), yaml_to_json(v));
            }
            JsonValue::Object(obj)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value),
    }
}

/// Mapping keys that are not strings (`2024: ...`, `true: ...`) keep their
/// scalar spelling
fn yaml_key(key: YamlValue) -> String {
    match key {
        YamlValue::String(s) => s,
        YamlValue::Number(n) => n.to_string(),
        YamlValue::Bool(b) => b.to_string(),
        YamlValue::Null => "null".to_string(),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

/// Convert JSON value to Liquid value
pub fn json_to_liquid(json: JsonValue) -> LiquidValue {
    match json {
        JsonValue::Null => LiquidValue::Nil,
        JsonValue::Bool(b) => LiquidValue::scalar(b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                LiquidValue::scalar(i)
            } else if let Some(f) = n.as_f64() {
                LiquidValue::scalar(f)
            } else {
                LiquidValue::scalar(n.to_string())
            }
        }
        JsonValue::String(s) => LiquidValue::scalar(s),
        JsonValue::Array(arr) => LiquidValue::Array(arr.into_iter().map(json_to_liquid).collect()),
        JsonValue::Object(obj) => {
            let mut liquid_obj = liquid::Object::new();
            for (k, v) in obj {
                liquid_obj.insert(k.into(), json_to_liquid(v));
            }
            LiquidValue::Object(liquid_obj)
        }
    }
}
