//! Interaction log entries written by the assessment engine.
//!
//! The log is the source of truth for attempts: counts, state and history
//! are all derived by replaying these entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use lectern_core::QuestionId;

/// Kind of interaction recorded against an assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    StartAssessment,
    AnswerQuestion,
    CompleteAssessment,
}

impl InteractionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StartAssessment => "start_assessment",
            Self::AnswerQuestion => "answer_question",
            Self::CompleteAssessment => "complete_assessment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "start_assessment" => Some(Self::StartAssessment),
            "answer_question" => Some(Self::AnswerQuestion),
            "complete_assessment" => Some(Self::CompleteAssessment),
            _ => None,
        }
    }
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry as returned by the log, in append order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEntry {
    pub timestamp: DateTime<Utc>,
    pub kind: InteractionKind,
    pub data: Value,
}

/// Payload of a start interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartData {
    /// 1-based attempt ordinal
    pub attempt: u32,
}

/// Payload of an answer interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerData {
    pub question_id: QuestionId,
    pub is_correct: bool,
    pub points_earned: u32,
}

/// Payload of a complete interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteData {
    /// Ordinal of the attempt being closed; absent in older logs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attempt: Option<u32>,
    pub score: f64,
    pub passed: bool,
    pub correct_count: u32,
    pub total_questions: u32,
}
