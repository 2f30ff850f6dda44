//! Snapshot Format v0 schema
//!
//! Defines the YAML/JSON structure of one deployment's asset graph

use branchdiff_core::model::{MetadataValue, PartitionsSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level snapshot file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotFileV0 {
    /// Schema version (must be 0 for this format)
    pub schema_version: u32,

    /// Deployment the graph was captured from (`prod`, `pr-123`)
    pub deployment: String,

    /// Asset definitions
    #[serde(default)]
    pub assets: Vec<SnapshotAsset>,
}

/// Asset definition in a snapshot file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotAsset {
    /// `analytics/orders` or `[analytics, orders]`
    pub key: KeyRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_version: Option<String>,

    /// Upstream asset keys
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deps: Vec<KeyRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partitions: Option<PartitionsSpec>,

    /// Tag values; scalar YAML values are read as their string form
    #[serde(
        default,
        deserialize_with = "deserialize_tags",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub tags: BTreeMap<String, String>,

    /// Plain YAML/JSON values, or `{type: url|path|json, value: ...}`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Asset key as written in a file: slash-joined string or segment list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyRef {
    Path(String),
    Segments(Vec<String>),
}

impl KeyRef {
    pub fn display(&self) -> String {
        match self {
            KeyRef::Path(path) => path.clone(),
            KeyRef::Segments(segments) => segments.join("/"),
        }
    }
}

/// Map a plain YAML/JSON metadata value onto the closed variant set.
///
/// An object of exactly `{type, value}` is the explicit typed form:
/// - `url` / `path` with a string value
/// - `json` with any value, kept verbatim
/// - `map` with an object value, an escaped user map
/// - `float` with `NaN`, `inf` or `-inf`
///
/// Any other object is a `Map`.
///
/// # Errors
///
/// Rejects integers outside the `i64` range rather than rounding them.
pub fn metadata_from_value(value: serde_json::Value) -> Result<MetadataValue, String> {
    use serde_json::Value;
    Ok(match value {
        Value::Null => MetadataValue::Null,
        Value::Bool(b) => MetadataValue::Bool(b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                MetadataValue::Int(i)
            } else if n.is_u64() {
                return Err(format!("integer {} is outside the 64-bit signed range", n));
            } else {
                match n.as_f64() {
                    Some(f) => MetadataValue::Float(f),
                    None => return Err(format!("unrepresentable number {}", n)),
                }
            }
        }
        Value::String(s) => MetadataValue::Text(s),
        Value::Array(items) => MetadataValue::List(
            items
                .into_iter()
                .map(metadata_from_value)
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(mut map) => {
            if map.len() == 2 {
                let typed = match (map.get("type"), map.get("value")) {
                    (Some(Value::String(kind)), Some(_)) => Some(kind.clone()),
                    _ => None,
                };
                match (typed.as_deref(), map.remove("value")) {
                    (Some("url"), Some(Value::String(url))) => return Ok(MetadataValue::Url(url)),
                    (Some("path"), Some(Value::String(path))) => {
                        return Ok(MetadataValue::Path(path))
                    }
                    (Some("json"), Some(payload)) => return Ok(MetadataValue::Json(payload)),
                    (Some("map"), Some(Value::Object(inner))) => {
                        map = inner;
                    }
                    (Some("float"), Some(Value::String(text))) => {
                        return match text.parse::<f64>() {
                            Ok(f) if !f.is_finite() => Ok(MetadataValue::Float(f)),
                            _ => Err(format!(
                                "typed float '{}' must be NaN, inf or -inf",
                                text
                            )),
                        };
                    }
                    (_, Some(value)) => {
                        map.insert("value".to_string(), value);
                    }
                    (_, None) => {}
                }
            }
            MetadataValue::Map(
                map.into_iter()
                    .map(|(k, v)| metadata_from_value(v).map(|v| (k, v)))
                    .collect::<Result<_, _>>()?,
            )
        }
    })
}

/// Inverse of [`metadata_from_value`], used when writing snapshot files
///
/// User maps shaped like the typed form are escaped as `{type: map, ...}`
/// and non-finite floats are written as `{type: float, value: "NaN"}`, so
/// reading the output back yields an equal value.
pub fn metadata_to_value(value: &MetadataValue) -> serde_json::Value {
    use serde_json::{json, Value};
    match value {
        MetadataValue::Null => Value::Null,
        MetadataValue::Bool(b) => Value::Bool(*b),
        MetadataValue::Int(i) => json!(i),
        MetadataValue::Float(f) if !f.is_finite() => {
            json!({"type": "float", "value": f.to_string()})
        }
        MetadataValue::Float(f) => json!(f),
        MetadataValue::Text(s) => Value::String(s.clone()),
        MetadataValue::Url(url) => json!({"type": "url", "value": url}),
        MetadataValue::Path(path) => json!({"type": "path", "value": path}),
        MetadataValue::Json(payload) => json!({"type": "json", "value": payload}),
        MetadataValue::List(items) => Value::Array(items.iter().map(metadata_to_value).collect()),
        MetadataValue::Map(map) => {
            let object: serde_json::Map<String, Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), metadata_to_value(v)))
                .collect();
            if looks_typed(map) {
                json!({"type": "map", "value": object})
            } else {
                Value::Object(object)
            }
        }
    }
}

fn looks_typed(map: &BTreeMap<String, MetadataValue>) -> bool {
    map.len() == 2 && map.contains_key("type") && map.contains_key("value")
}

/// Custom deserializer for tags to accept any scalar as the value
fn deserialize_tags<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde_json::Value;

    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(key, value)| {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(D::Error::custom(format!(
                        "tag '{}' must be a scalar, got {}",
                        key, other
                    )))
                }
            };
            Ok((key, text))
        })
        .collect()
}
