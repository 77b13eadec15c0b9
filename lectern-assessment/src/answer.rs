//! Submitted answers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// An answer as submitted by a learner.
///
/// Choice, text and numeric questions take scalars; matching questions take
/// a mapping from prompt to chosen value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Bool(bool),
    Number(Number),
    Text(String),
    Mapping(Map<String, Value>),
}

impl Answer {
    /// Text form used for storage and string comparison.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
            Self::Mapping(map) => Value::Object(map.clone()).to_string(),
        }
    }

    #[must_use]
    pub fn as_mapping(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Answer {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Answer {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Answer {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<Map<String, Value>> for Answer {
    fn from(map: Map<String, Value>) -> Self {
        Self::Mapping(map)
    }
}

/// Text form of a stored correct answer, if it is a scalar.
pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
