//! Metadata schemas attached to content types.
//!
//! A deliberately small subset of JSON Schema: a flat object whose declared
//! properties have a primitive type and, for strings, an optional set of
//! allowed values. Properties the schema does not declare are accepted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Primitive type of a metadata property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    String,
    Number,
    Boolean,
    StringArray,
}

impl PropertyKind {
    fn as_str(&self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Number => "a number",
            Self::Boolean => "a boolean",
            Self::StringArray => "an array of strings",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::StringArray => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }
}

/// Declaration of a single metadata property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySchema {
    pub kind: PropertyKind,
    /// Allowed values for string properties; empty means unrestricted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed: Vec<String>,
}

/// Schema for the structured metadata of one content type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSchema {
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchema>,
}

impl MetadataSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a string property, optionally restricted to `allowed` values.
    pub fn string(mut self, name: &str, allowed: &[&str]) -> Self {
        self.properties.insert(
            name.to_string(),
            PropertySchema {
                kind: PropertyKind::String,
                allowed: allowed.iter().map(|s| s.to_string()).collect(),
            },
        );
        self
    }

    pub fn number(self, name: &str) -> Self {
        self.declare(name, PropertyKind::Number)
    }

    pub fn boolean(self, name: &str) -> Self {
        self.declare(name, PropertyKind::Boolean)
    }

    pub fn string_array(self, name: &str) -> Self {
        self.declare(name, PropertyKind::StringArray)
    }

    fn declare(mut self, name: &str, kind: PropertyKind) -> Self {
        self.properties.insert(
            name.to_string(),
            PropertySchema {
                kind,
                allowed: Vec::new(),
            },
        );
        self
    }

    /// Check metadata against the schema, returning one message per violation.
    pub fn check(&self, metadata: &Map<String, Value>) -> Vec<String> {
        let mut errors = Vec::new();
        for (name, value) in metadata {
            let Some(property) = self.properties.get(name) else {
                continue;
            };
            if !property.kind.accepts(value) {
                errors.push(format!(
                    "Metadata '{name}' must be {}",
                    property.kind.as_str()
                ));
                continue;
            }
            if let (PropertyKind::String, Some(text)) = (property.kind, value.as_str())
                && !property.allowed.is_empty()
                && !property.allowed.iter().any(|a| a == text)
            {
                errors.push(format!(
                    "Metadata '{name}' must be one of: {}",
                    property.allowed.join(", ")
                ));
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> MetadataSchema {
        MetadataSchema::new()
            .string("complexity", &["beginner", "intermediate", "advanced"])
            .string_array("keywords")
            .boolean("is_timed")
    }

    fn meta(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn valid_metadata_passes() {
        let errors = schema().check(&meta(json!({
            "complexity": "beginner",
            "keywords": ["loops", "iteration"],
            "is_timed": true
        })));
        assert!(errors.is_empty());
    }

    #[test]
    fn undeclared_properties_pass() {
        assert!(schema().check(&meta(json!({"author": 42}))).is_empty());
    }

    #[test]
    fn wrong_type_is_reported() {
        let errors = schema().check(&meta(json!({"keywords": "loops"})));
        assert_eq!(errors, vec!["Metadata 'keywords' must be an array of strings"]);
    }

    #[test]
    fn value_outside_enum_is_reported() {
        let errors = schema().check(&meta(json!({"complexity": "expert"})));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("beginner, intermediate, advanced"));
    }

    #[test]
    fn schema_round_trips_through_json() {
        let original = schema();
        let value = serde_json::to_value(&original).unwrap();
        let parsed: MetadataSchema = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, original);
    }
}
