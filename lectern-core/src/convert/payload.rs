//! Tolerant field access over a stored JSON payload.

use serde_json::{Map, Value};
use tracing::warn;

use crate::types::ContentId;

/// Stand-in for required text missing from a stored payload.
pub const MISSING_TEXT: &str = "(not provided)";

/// Reads typed fields from a payload object, falling back to defaults.
///
/// Substituting a default for a required field is logged with the content id.
pub(super) struct PayloadReader<'a> {
    id: ContentId,
    data: &'a Map<String, Value>,
}

impl<'a> PayloadReader<'a> {
    pub fn new(id: ContentId, data: &'a Map<String, Value>) -> Self {
        Self { id, data }
    }

    /// Reader over a nested object belonging to the same content unit.
    pub fn nested(&self, data: &'a Map<String, Value>) -> Self {
        Self { id: self.id, data }
    }

    pub fn id(&self) -> ContentId {
        self.id
    }

    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.data.get(key).filter(|v| !v.is_null())
    }

    pub fn optional_text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            other => {
                warn!(content_id = %self.id, field = key, value = %other, "Ignoring non-text field");
                None
            }
        }
    }

    /// Required text, or `default` when absent or blank.
    pub fn text_or(&self, key: &str, default: &str) -> String {
        match self.optional_text(key) {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                warn!(content_id = %self.id, field = key, default, "Required field missing, using default");
                default.to_string()
            }
        }
    }

    /// Required text, or the placeholder when absent or blank.
    pub fn required_text(&self, key: &str) -> String {
        self.text_or(key, MISSING_TEXT)
    }

    /// First non-empty string among `keys`.
    pub fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|k| self.get(k).and_then(Value::as_str))
            .find(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn strings(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            Some(other) => {
                warn!(content_id = %self.id, field = key, value = %other, "Expected a list of strings");
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    pub fn object(&self, key: &str) -> Map<String, Value> {
        match self.get(key) {
            Some(Value::Object(map)) => map.clone(),
            Some(other) => {
                warn!(content_id = %self.id, field = key, value = %other, "Expected an object");
                Map::new()
            }
            None => Map::new(),
        }
    }

    pub fn flag(&self, key: &str) -> bool {
        self.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn number_or(&self, key: &str, default: f64) -> f64 {
        match self.get(key).and_then(Value::as_f64) {
            Some(n) => n,
            None => {
                warn!(content_id = %self.id, field = key, default, "Required field missing, using default");
                default
            }
        }
    }

    /// Non-negative whole number; `30.0` counts, `2.5` does not.
    pub fn count(&self, key: &str) -> Option<u32> {
        let value = self.get(key)?;
        match value.as_u64() {
            Some(n) => u32::try_from(n).ok(),
            None => value
                .as_f64()
                .filter(|n| n.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(n))
                .map(|n| n as u32),
        }
    }
}
