//! Questions embedded in quiz and assessment payloads.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ValidationError;
use crate::types::QuestionId;

/// The answer format a question expects.
///
/// Tags that lectern does not recognise are preserved verbatim so the
/// record round-trips; such questions always grade as incorrect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnswerModality {
    #[default]
    MultipleChoice,
    OpenEnded,
    Code,
    Mathematical,
    Matching,
    TrueFalse,
    Unrecognized(String),
}

impl AnswerModality {
    /// Convert to the persisted tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::MultipleChoice => "multiple_choice",
            Self::OpenEnded => "open_ended",
            Self::Code => "code",
            Self::Mathematical => "mathematical",
            Self::Matching => "matching",
            Self::TrueFalse => "true_false",
            Self::Unrecognized(tag) => tag,
        }
    }

    /// Parse a persisted tag. Matching is case-insensitive.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "multiple_choice" => Self::MultipleChoice,
            "open_ended" => Self::OpenEnded,
            "code" => Self::Code,
            "mathematical" => Self::Mathematical,
            "matching" => Self::Matching,
            "true_false" => Self::TrueFalse,
            _ => Self::Unrecognized(s.to_string()),
        }
    }
}

impl From<String> for AnswerModality {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<AnswerModality> for String {
    fn from(modality: AnswerModality) -> Self {
        modality.as_str().to_string()
    }
}

impl std::fmt::Display for AnswerModality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feedback shown after grading, keyed by correctness.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incorrect: Option<String>,
}

impl Feedback {
    /// Feedback for the given outcome, or an empty string when none is configured.
    #[must_use]
    pub fn for_outcome(&self, is_correct: bool) -> &str {
        let text = if is_correct {
            &self.correct
        } else {
            &self.incorrect
        };
        text.as_deref().unwrap_or("")
    }

    fn is_empty(&self) -> bool {
        self.correct.is_none() && self.incorrect.is_none()
    }
}

fn default_points() -> u32 {
    1
}

/// A single question with its grading data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub answer_type: AnswerModality,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Correct option, text or mapping depending on the modality
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<Value>,
    /// Accepted answers for open-ended questions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub acceptable_answers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default = "default_points")]
    pub points: u32,
    #[serde(default, skip_serializing_if = "Feedback::is_empty")]
    pub feedback: Feedback,
}

impl Question {
    /// Create a question worth one point with no grading data.
    pub fn new(id: impl Into<String>, text: impl Into<String>, answer_type: AnswerModality) -> Self {
        Self {
            id: QuestionId::new(id),
            text: text.into(),
            answer_type,
            options: Vec::new(),
            correct_answer: None,
            acceptable_answers: Vec::new(),
            explanation: None,
            points: default_points(),
            feedback: Feedback::default(),
        }
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    pub fn with_correct_answer(mut self, answer: impl Into<Value>) -> Self {
        self.correct_answer = Some(answer.into());
        self
    }

    pub fn with_acceptable_answers(mut self, answers: Vec<String>) -> Self {
        self.acceptable_answers = answers;
        self
    }

    pub fn with_points(mut self, points: u32) -> Self {
        self.points = points;
        self
    }

    pub fn with_feedback(mut self, correct: impl Into<String>, incorrect: impl Into<String>) -> Self {
        self.feedback = Feedback {
            correct: Some(correct.into()),
            incorrect: Some(incorrect.into()),
        };
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }
}

/// Check a question list before it is placed in a quiz or assessment.
///
/// Questions are looked up by id during grading, so ids must be present and unique.
pub(crate) fn check_questions(questions: &[Question]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for (index, question) in questions.iter().enumerate() {
        if question.id.as_str().trim().is_empty() {
            return Err(ValidationError::InvalidQuestion {
                index,
                reason: "id is required".to_string(),
            });
        }
        if !seen.insert(question.id.as_str()) {
            return Err(ValidationError::InvalidQuestion {
                index,
                reason: format!("duplicate id '{}'", question.id),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn modality_parses_case_insensitively() {
        assert_eq!(AnswerModality::parse("Multiple_Choice"), AnswerModality::MultipleChoice);
        assert_eq!(AnswerModality::parse(" matching "), AnswerModality::Matching);
    }

    #[test]
    fn unrecognized_modality_keeps_its_tag() {
        let modality = AnswerModality::parse("drag_and_drop");
        assert_eq!(modality, AnswerModality::Unrecognized("drag_and_drop".into()));
        assert_eq!(modality.as_str(), "drag_and_drop");
    }

    #[test]
    fn question_deserializes_with_defaults() {
        let question: Question = serde_json::from_value(json!({
            "id": "q1",
            "text": "What is 2+2?",
            "correct_answer": "4"
        }))
        .unwrap();

        assert_eq!(question.answer_type, AnswerModality::MultipleChoice);
        assert_eq!(question.points, 1);
        assert!(question.feedback.correct.is_none());
        assert_eq!(question.correct_answer, Some(json!("4")));
    }

    #[test]
    fn question_serializes_without_empty_fields() {
        let question = Question::new("q1", "Pick one", AnswerModality::TrueFalse)
            .with_correct_answer("true");
        let value = serde_json::to_value(&question).unwrap();

        assert_eq!(value["answer_type"], "true_false");
        assert!(value.get("options").is_none());
        assert!(value.get("feedback").is_none());
    }

    #[test]
    fn feedback_falls_back_to_empty_string() {
        let feedback = Feedback {
            correct: Some("Well done!".into()),
            incorrect: None,
        };
        assert_eq!(feedback.for_outcome(true), "Well done!");
        assert_eq!(feedback.for_outcome(false), "");
    }

    #[test]
    fn duplicate_question_ids_are_rejected() {
        let questions = vec![
            Question::new("q1", "a", AnswerModality::Code),
            Question::new("q1", "b", AnswerModality::Code),
        ];
        let err = check_questions(&questions).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidQuestion { index: 1, .. }));
    }

    #[test]
    fn blank_question_id_is_rejected() {
        let questions = vec![Question::new("  ", "a", AnswerModality::Code)];
        assert!(check_questions(&questions).is_err());
    }
}
