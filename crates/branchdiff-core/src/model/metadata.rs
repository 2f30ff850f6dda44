use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Definition-time metadata value
///
/// A closed set of variants so that comparison is exhaustive. Structured
/// values (`List`, `Map`, `Json`) compare deeply. Floats compare by total
/// order, which makes a value always equal to itself (including NaN).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MetadataValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Url(String),
    Path(String),
    /// Arbitrary structured payload kept verbatim
    Json(serde_json::Value),
    List(Vec<MetadataValue>),
    Map(BTreeMap<String, MetadataValue>),
    Null,
}

impl PartialEq for MetadataValue {
    fn eq(&self, other: &Self) -> bool {
        use MetadataValue::*;
        match (self, other) {
            (Text(a), Text(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a.total_cmp(b).is_eq(),
            (Bool(a), Bool(b)) => a == b,
            (Url(a), Url(b)) => a == b,
            (Path(a), Path(b)) => a == b,
            (Json(a), Json(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Null, Null) => true,
            _ => false,
        }
    }
}

impl Eq for MetadataValue {}

impl MetadataValue {
    /// Short variant name, used in change details and summaries
    pub fn type_name(&self) -> &'static str {
        match self {
            MetadataValue::Text(_) => "text",
            MetadataValue::Int(_) => "int",
            MetadataValue::Float(_) => "float",
            MetadataValue::Bool(_) => "bool",
            MetadataValue::Url(_) => "url",
            MetadataValue::Path(_) => "path",
            MetadataValue::Json(_) => "json",
            MetadataValue::List(_) => "list",
            MetadataValue::Map(_) => "map",
            MetadataValue::Null => "null",
        }
    }

    /// Convenience constructor for a list of text values
    pub fn text_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MetadataValue::List(
            items
                .into_iter()
                .map(|s| MetadataValue::Text(s.into()))
                .collect(),
        )
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        MetadataValue::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        MetadataValue::Text(s)
    }
}

impl From<i64> for MetadataValue {
    fn from(n: i64) -> Self {
        MetadataValue::Int(n)
    }
}

impl From<f64> for MetadataValue {
    fn from(n: f64) -> Self {
        MetadataValue::Float(n)
    }
}

impl From<bool> for MetadataValue {
    fn from(b: bool) -> Self {
        MetadataValue::Bool(b)
    }
}
