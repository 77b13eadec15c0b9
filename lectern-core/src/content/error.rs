//! Content construction errors

use thiserror::Error;

use super::kind::ContentKind;

/// A content unit or one of its parts failed a required-field or range check.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} is required for {kind} content")]
    MissingField {
        kind: ContentKind,
        field: &'static str,
    },

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("content type '{tag}' does not match the {kind} payload")]
    TagMismatch { tag: String, kind: ContentKind },

    #[error("content type tag cannot be empty")]
    EmptyTag,

    #[error("question {index} is invalid: {reason}")]
    InvalidQuestion { index: usize, reason: String },
}

impl ValidationError {
    /// The offending field, when the error is about a single field.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field, .. } | Self::OutOfRange { field, .. } => Some(field),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_names_field_and_kind() {
        let err = ValidationError::MissingField {
            kind: ContentKind::Exercise,
            field: "solution",
        };
        assert_eq!(err.to_string(), "solution is required for exercise content");
        assert_eq!(err.field(), Some("solution"));
    }

    #[test]
    fn out_of_range_display() {
        let err = ValidationError::OutOfRange {
            field: "passing_score",
            min: 0.0,
            max: 100.0,
            value: 120.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("passing_score"));
        assert!(msg.contains("120"));
    }

    #[test]
    fn tag_mismatch_has_no_field() {
        let err = ValidationError::TagMismatch {
            tag: "theory".into(),
            kind: ContentKind::Resource,
        };
        assert!(err.field().is_none());
        assert!(err.to_string().contains("resource"));
    }
}
