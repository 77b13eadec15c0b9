//! Engine error types

use thiserror::Error;

use lectern_core::{ContentError, ContentId, QuestionId, StoreError};

/// Errors returned by [`AssessmentEngine`](crate::engine::AssessmentEngine)
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Assessment not found: {0}")]
    AssessmentNotFound(ContentId),

    #[error("Question {question} not found in assessment {assessment}")]
    QuestionNotFound {
        assessment: ContentId,
        question: QuestionId,
    },

    #[error("Failed to record answer to question {question_id}: {source}")]
    GradingFault {
        question_id: QuestionId,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Content(ContentError),
}

impl From<ContentError> for EngineError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Store(e) => Self::Store(e),
            other => Self::Content(other),
        }
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
