//! Assessment attempts.
//!
//! [`AssessmentEngine`] runs the start, answer and complete lifecycle for a
//! user's attempts at an assessment. Nothing about an attempt is stored
//! directly: every command appends to the interaction log, and every query
//! replays it.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use lectern_core::{
    Assessment, ContentId, ContentKind, ContentService, ContentUnit, LessonId, Question,
    QuestionId, UserId,
};

use crate::answer::Answer;
use crate::error::{EngineError, Result};
use crate::grading::{Grade, GraderTable};
use crate::history::{self, AttemptSummary, HistoryPairing, LegacyPairing, PairingStrategy};
use crate::interaction::{AnswerData, CompleteData, InteractionKind, StartData};
use crate::store::{self, InteractionLog, ProgressSink, UserAnswerStore};

/// Where a user stands with an assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    NotStarted,
    InProgress,
    Completed,
}

/// An attempt that has just been started
#[derive(Debug, Clone, Serialize)]
pub struct AttemptSession {
    pub assessment_id: ContentId,
    pub user: UserId,
    /// 1-based attempt ordinal
    pub attempt: u32,
    pub attempts_allowed: u32,
    pub questions: Vec<Question>,
    pub started_at: DateTime<Utc>,
    /// Absent when the assessment has no time limit
    pub deadline: Option<DateTime<Utc>>,
}

impl AttemptSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| now > deadline)
    }

    /// Time left before the deadline, clamped at zero
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.deadline
            .map(|deadline| (deadline - now).max(Duration::zero()))
    }
}

/// Result of asking to start an attempt
#[derive(Debug, Clone)]
pub enum StartOutcome {
    Started(AttemptSession),
    Exhausted { used: u32, allowed: u32 },
}

/// Result of grading one submitted answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradingResult {
    pub question_id: QuestionId,
    pub is_correct: bool,
    pub points_earned: u32,
    pub max_points: u32,
    /// Empty when the question has no feedback for this outcome
    pub feedback: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    Correct,
    Incorrect,
    Unanswered,
}

/// Per-question line of a completed attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionOutcome {
    pub question_id: QuestionId,
    pub status: QuestionStatus,
    pub is_correct: bool,
    pub points_earned: u32,
    pub max_points: u32,
    /// Set when the answer was graded but could not be recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
}

impl QuestionOutcome {
    fn unanswered(question: &Question) -> Self {
        Self {
            question_id: question.id.clone(),
            status: QuestionStatus::Unanswered,
            is_correct: false,
            points_earned: 0,
            max_points: question.points,
            fault: None,
        }
    }

    fn graded(question: &Question, grade: Grade, fault: Option<String>) -> Self {
        Self {
            question_id: question.id.clone(),
            status: if grade.is_correct {
                QuestionStatus::Correct
            } else {
                QuestionStatus::Incorrect
            },
            is_correct: grade.is_correct,
            points_earned: grade.points,
            max_points: question.points,
            fault,
        }
    }
}

/// Scored outcome of a completed attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentResult {
    pub questions: Vec<QuestionOutcome>,
    pub total_points: u64,
    pub max_points: u64,
    /// Percentage in `0.0..=100.0`
    pub score: f64,
    pub passed: bool,
    pub correct_count: u32,
    pub total_questions: u32,
    /// Ordinal of the attempt closed, if one had been started
    pub attempt: Option<u32>,
    pub completed_at: DateTime<Utc>,
}

fn percentage(earned: u64, max: u64) -> f64 {
    if max == 0 {
        return 0.0;
    }
    earned as f64 / max as f64 * 100.0
}

/// Runs assessment attempts against injected collaborators
pub struct AssessmentEngine {
    content: Arc<ContentService>,
    interactions: Arc<dyn InteractionLog>,
    progress: Arc<dyn ProgressSink>,
    answers: Arc<dyn UserAnswerStore>,
    graders: GraderTable,
    pairing: Box<dyn HistoryPairing>,
}

impl AssessmentEngine {
    /// Create an engine with the built-in graders and legacy history pairing
    pub fn new(
        content: Arc<ContentService>,
        interactions: Arc<dyn InteractionLog>,
        progress: Arc<dyn ProgressSink>,
        answers: Arc<dyn UserAnswerStore>,
    ) -> Self {
        Self {
            content,
            interactions,
            progress,
            answers,
            graders: GraderTable::builtin(),
            pairing: Box::new(LegacyPairing),
        }
    }

    pub fn with_graders(mut self, graders: GraderTable) -> Self {
        self.graders = graders;
        self
    }

    pub fn with_pairing(mut self, pairing: impl HistoryPairing + 'static) -> Self {
        self.pairing = Box::new(pairing);
        self
    }

    pub fn with_pairing_strategy(mut self, strategy: PairingStrategy) -> Self {
        self.pairing = strategy.build();
        self
    }

    fn log(
        &self,
        user: &UserId,
        assessment_id: ContentId,
        kind: InteractionKind,
        data: &impl Serialize,
    ) -> store::Result<()> {
        let data = serde_json::to_value(data)?;
        self.interactions.append(user, assessment_id, kind, data)
    }

    /// Store the answer and log it; grading has already happened
    fn persist_answer(
        &self,
        user: &UserId,
        assessment_id: ContentId,
        question: &Question,
        answer: &Answer,
        grade: Grade,
    ) -> store::Result<()> {
        let mut stored = self.answers.create(user, &question.id, &answer.as_text())?;
        stored.is_correct = grade.is_correct;
        stored.points_earned = grade.points;
        self.answers.save(&stored)?;
        self.log(
            user,
            assessment_id,
            InteractionKind::AnswerQuestion,
            &AnswerData {
                question_id: question.id.clone(),
                is_correct: grade.is_correct,
                points_earned: grade.points,
            },
        )
    }

    // === Commands ===

    /// Start a new attempt, unless the allowance is used up.
    ///
    /// An exhausted allowance is reported as [`StartOutcome::Exhausted`] and
    /// leaves the log untouched.
    pub fn start_attempt(&self, user: &UserId, assessment_id: ContentId) -> Result<StartOutcome> {
        let assessment = self.assessment(assessment_id)?;
        let used = self.attempts_used(user, assessment_id)?;
        let allowed = assessment.attempts_allowed();
        if used >= allowed {
            info!(%user, %assessment_id, used, allowed, "Attempt allowance exhausted");
            return Ok(StartOutcome::Exhausted { used, allowed });
        }

        let attempt = used + 1;
        let started_at = Utc::now();
        let deadline = assessment
            .time_limit_minutes()
            .map(|minutes| started_at + Duration::minutes(i64::from(minutes)));
        self.log(
            user,
            assessment_id,
            InteractionKind::StartAssessment,
            &StartData { attempt },
        )
        .inspect_err(|e| warn!(%user, %assessment_id, error = %e, "Failed to log attempt start"))?;

        info!(%user, %assessment_id, attempt, allowed, "Attempt started");
        Ok(StartOutcome::Started(AttemptSession {
            assessment_id,
            user: user.clone(),
            attempt,
            attempts_allowed: allowed,
            questions: assessment.questions().to_vec(),
            started_at,
            deadline,
        }))
    }

    /// Grade a single answer and record it.
    ///
    /// Deadlines are not checked here; see [`AttemptSession::is_expired`].
    pub fn submit_answer(
        &self,
        user: &UserId,
        assessment_id: ContentId,
        question_id: &QuestionId,
        answer: &Answer,
    ) -> Result<GradingResult> {
        let assessment = self.assessment(assessment_id)?;
        let question = assessment.question(question_id.as_str()).ok_or_else(|| {
            EngineError::QuestionNotFound {
                assessment: assessment_id,
                question: question_id.clone(),
            }
        })?;

        let grade = self.graders.grade(question, answer);
        self.persist_answer(user, assessment_id, question, answer, grade)
            .map_err(|source| {
                warn!(%user, %assessment_id, %question_id, error = %source, "Failed to record answer");
                EngineError::GradingFault {
                    question_id: question_id.clone(),
                    source,
                }
            })?;

        debug!(%user, %question_id, is_correct = grade.is_correct, points = grade.points, "Answer graded");
        Ok(GradingResult {
            question_id: question_id.clone(),
            is_correct: grade.is_correct,
            points_earned: grade.points,
            max_points: question.points,
            feedback: question.feedback.for_outcome(grade.is_correct).to_string(),
        })
    }

    /// Grade a full set of answers and close the current attempt.
    ///
    /// Questions missing from `answers` score nothing but still count toward
    /// the maximum. A question whose answer cannot be recorded keeps its
    /// grade and carries the failure in [`QuestionOutcome::fault`].
    pub fn complete_attempt(
        &self,
        user: &UserId,
        assessment_id: ContentId,
        answers: &HashMap<QuestionId, Answer>,
    ) -> Result<AssessmentResult> {
        let assessment = self.assessment(assessment_id)?;
        let used = self.attempts_used(user, assessment_id)?;
        let attempt = (used > 0).then_some(used);
        if attempt.is_none() {
            debug!(%user, %assessment_id, "Completing assessment that was never started");
        }

        let mut outcomes = Vec::with_capacity(assessment.questions().len());
        let mut total_points: u64 = 0;
        let mut correct_count = 0;
        for question in assessment.questions() {
            let Some(answer) = answers.get(&question.id) else {
                outcomes.push(QuestionOutcome::unanswered(question));
                continue;
            };

            let grade = self.graders.grade(question, answer);
            let fault = self
                .persist_answer(user, assessment_id, question, answer, grade)
                .err()
                .map(|e| {
                    warn!(%user, %assessment_id, question_id = %question.id, error = %e, "Failed to record answer");
                    e.to_string()
                });
            total_points += u64::from(grade.points);
            if grade.is_correct {
                correct_count += 1;
            }
            outcomes.push(QuestionOutcome::graded(question, grade, fault));
        }

        let max_points = assessment.max_points();
        let score = percentage(total_points, max_points);
        let passed = score >= assessment.passing_score();
        let total_questions = outcomes.len() as u32;

        self.progress
            .record_content_progress(user, assessment_id, true, score)
            .inspect_err(|e| warn!(%user, %assessment_id, error = %e, "Failed to record progress"))?;
        self.log(
            user,
            assessment_id,
            InteractionKind::CompleteAssessment,
            &CompleteData {
                attempt,
                score,
                passed,
                correct_count,
                total_questions,
            },
        )
        .inspect_err(|e| warn!(%user, %assessment_id, error = %e, "Failed to log completion"))?;

        info!(%user, %assessment_id, score, passed, correct_count, total_questions, "Attempt completed");
        Ok(AssessmentResult {
            questions: outcomes,
            total_points,
            max_points,
            score,
            passed,
            correct_count,
            total_questions,
            attempt,
            completed_at: Utc::now(),
        })
    }

    // === Queries ===

    /// Load an assessment; other content kinds count as not found
    pub fn assessment(&self, assessment_id: ContentId) -> Result<Assessment> {
        self.content
            .get_content(assessment_id)?
            .and_then(|unit| unit.as_assessment().cloned())
            .ok_or(EngineError::AssessmentNotFound(assessment_id))
    }

    /// Assessments in a lesson, in lesson order
    pub fn lesson_assessments(&self, lesson_id: LessonId) -> Result<Vec<ContentUnit>> {
        Ok(self
            .content
            .lesson_content(lesson_id)?
            .into_iter()
            .filter(|unit| unit.kind() == ContentKind::Assessment)
            .collect())
    }

    /// Number of attempts started so far
    pub fn attempts_used(&self, user: &UserId, assessment_id: ContentId) -> Result<u32> {
        let starts = self.interactions.query(
            user,
            assessment_id,
            Some(InteractionKind::StartAssessment),
        )?;
        Ok(starts.len() as u32)
    }

    /// State derived from the most recent start or complete
    pub fn attempt_state(&self, user: &UserId, assessment_id: ContentId) -> Result<AttemptState> {
        let entries = self.interactions.query(user, assessment_id, None)?;
        let last = entries.iter().rev().find_map(|entry| match entry.kind {
            InteractionKind::StartAssessment => Some(AttemptState::InProgress),
            InteractionKind::CompleteAssessment => Some(AttemptState::Completed),
            InteractionKind::AnswerQuestion => None,
        });
        Ok(last.unwrap_or(AttemptState::NotStarted))
    }

    /// Attempts reconstructed from the log, ordered by ordinal
    pub fn attempt_history(
        &self,
        user: &UserId,
        assessment_id: ContentId,
    ) -> Result<Vec<AttemptSummary>> {
        let entries = self.interactions.query(user, assessment_id, None)?;
        let (starts, completes) = history::replay(&entries);
        Ok(self.pairing.pair(&starts, &completes))
    }
}
