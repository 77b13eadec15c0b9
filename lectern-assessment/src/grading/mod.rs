//! Answer grading
//!
//! A [`GraderTable`] maps each answer modality to a [`Grader`]. The table
//! starts with the built-in graders; hosts can swap any entry, including
//! adding graders for modality tags lectern does not recognise.

mod builtin;

pub use builtin::{AcceptableAnswers, ExactChoice, ExactText, MatchingPairs, NeverCorrect};

use std::collections::HashMap;
use std::sync::Arc;

use lectern_core::{AnswerModality, Question};
use serde::Serialize;
use tracing::debug;

use crate::answer::Answer;

/// Outcome of grading one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Grade {
    pub is_correct: bool,
    pub points: u32,
}

impl Grade {
    #[must_use]
    pub fn incorrect() -> Self {
        Self {
            is_correct: false,
            points: 0,
        }
    }

    /// Full points when correct, nothing otherwise
    #[must_use]
    pub fn all_or_nothing(is_correct: bool, points: u32) -> Self {
        Self {
            is_correct,
            points: if is_correct { points } else { 0 },
        }
    }
}

/// Grading strategy for one modality
///
/// Implementations must be pure: the same question and answer always give
/// the same grade.
pub trait Grader: Send + Sync {
    fn grade(&self, question: &Question, answer: &Answer) -> Grade;
}

/// Lookup table from modality to grader
#[derive(Clone)]
pub struct GraderTable {
    graders: HashMap<AnswerModality, Arc<dyn Grader>>,
}

impl GraderTable {
    /// Table with the built-in grader for every recognised modality
    pub fn builtin() -> Self {
        let mut graders: HashMap<AnswerModality, Arc<dyn Grader>> = HashMap::new();
        graders.insert(AnswerModality::MultipleChoice, Arc::new(ExactChoice));
        graders.insert(AnswerModality::TrueFalse, Arc::new(ExactChoice));
        graders.insert(AnswerModality::OpenEnded, Arc::new(AcceptableAnswers));
        graders.insert(AnswerModality::Code, Arc::new(NeverCorrect));
        graders.insert(AnswerModality::Mathematical, Arc::new(ExactText));
        graders.insert(AnswerModality::Matching, Arc::new(MatchingPairs));
        Self { graders }
    }

    /// Replace or add the grader for a modality
    pub fn with_grader(mut self, modality: AnswerModality, grader: impl Grader + 'static) -> Self {
        self.graders.insert(modality, Arc::new(grader));
        self
    }

    /// Grade with the question's modality; modalities without a grader score zero
    pub fn grade(&self, question: &Question, answer: &Answer) -> Grade {
        match self.graders.get(&question.answer_type) {
            Some(grader) => grader.grade(question, answer),
            None => {
                debug!(question_id = %question.id, modality = %question.answer_type, "No grader for modality");
                Grade::incorrect()
            }
        }
    }
}

impl Default for GraderTable {
    fn default() -> Self {
        Self::builtin()
    }
}
