//! Conversion error types

use thiserror::Error;

use crate::content::ValidationError;

/// A stored record could not be turned into a content unit
#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Unknown content type: {0}")]
    UnknownType(String),

    #[error("{0} payload is not a JSON object")]
    PayloadNotObject(String),

    #[error("Field '{field}' is malformed: {reason}")]
    MalformedField { field: &'static str, reason: String },

    #[error("No questions in {0} payload")]
    MissingQuestions(String),

    #[error("Content rejected: {0}")]
    Rejected(#[from] ValidationError),
}
