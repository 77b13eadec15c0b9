//! End-to-end tests for the assessment lifecycle against in-memory collaborators

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;

use lectern_assessment::{
    Answer, AssessmentEngine, AttemptState, EngineError, InteractionKind, InteractionLog,
    MemoryAnswerStore, MemoryInteractionLog, MemoryProgressSink, OrdinalPairing, QuestionStatus,
    StartOutcome,
};
use lectern_core::{
    AnswerModality, Assessment, ContentHeader, ContentId, ContentService, ContentTypeRegistry,
    ContentUnit, LessonId, MemoryContentStore, Question, QuestionId, Theory, UserId,
};

struct Harness {
    content: Arc<ContentService>,
    log: Arc<MemoryInteractionLog>,
    progress: Arc<MemoryProgressSink>,
    answers: Arc<MemoryAnswerStore>,
    lesson: LessonId,
    user: UserId,
}

impl Harness {
    fn new() -> Self {
        let registry = Arc::new(ContentTypeRegistry::new());
        let store = Arc::new(MemoryContentStore::new());
        Self {
            content: Arc::new(ContentService::new(store, registry)),
            log: Arc::new(MemoryInteractionLog::new()),
            progress: Arc::new(MemoryProgressSink::new()),
            answers: Arc::new(MemoryAnswerStore::new()),
            lesson: LessonId::new(),
            user: UserId::new("learner-1"),
        }
    }

    fn engine(&self) -> AssessmentEngine {
        AssessmentEngine::new(
            self.content.clone(),
            self.log.clone(),
            self.progress.clone(),
            self.answers.clone(),
        )
    }

    fn add(&self, title: &str, body: impl Into<lectern_core::ContentBody>) -> ContentId {
        let unit = ContentUnit::new(ContentHeader::new(self.lesson, title), body);
        self.content.create_content(&unit).unwrap().id()
    }
}

/// One-point choice question and three-point mathematical question
fn two_questions() -> Vec<Question> {
    vec![
        Question::new("q1", "2 + 2 = ?", AnswerModality::MultipleChoice)
            .with_options(vec!["3".into(), "4".into()])
            .with_correct_answer("4")
            .with_feedback("Right", "Count again"),
        Question::new("q2", "Simplify x + x", AnswerModality::Mathematical)
            .with_correct_answer("2x")
            .with_points(3),
    ]
}

fn answers(pairs: &[(&str, Answer)]) -> HashMap<QuestionId, Answer> {
    pairs
        .iter()
        .map(|(id, answer)| (QuestionId::new(*id), answer.clone()))
        .collect()
}

fn started(outcome: StartOutcome) -> lectern_assessment::AttemptSession {
    match outcome {
        StartOutcome::Started(session) => session,
        StartOutcome::Exhausted { used, allowed } => {
            panic!("expected a new attempt, allowance {used}/{allowed} exhausted")
        }
    }
}

// ===== Starting attempts =====

#[test]
fn test_start_stops_at_allowance() {
    let h = Harness::new();
    let engine = h.engine();
    let id = h.add(
        "Checkpoint",
        Assessment::new(two_questions())
            .unwrap()
            .with_attempts_allowed(3)
            .unwrap(),
    );

    for ordinal in 1..=3 {
        let session = started(engine.start_attempt(&h.user, id).unwrap());
        assert_eq!(session.attempt, ordinal);
        assert_eq!(session.attempts_allowed, 3);
    }

    let outcome = engine.start_attempt(&h.user, id).unwrap();
    assert!(matches!(
        outcome,
        StartOutcome::Exhausted {
            used: 3,
            allowed: 3
        }
    ));
    let starts = h
        .log
        .query(&h.user, id, Some(InteractionKind::StartAssessment))
        .unwrap();
    assert_eq!(starts.len(), 3);
}

#[test]
fn test_start_sets_deadline_from_time_limit() {
    let h = Harness::new();
    let engine = h.engine();
    let timed = h.add(
        "Timed",
        Assessment::new(two_questions())
            .unwrap()
            .with_time_limit(Some(30)),
    );
    let untimed = h.add("Untimed", Assessment::new(two_questions()).unwrap());

    let session = started(engine.start_attempt(&h.user, timed).unwrap());
    assert_eq!(
        session.deadline,
        Some(session.started_at + Duration::minutes(30))
    );
    assert_eq!(session.questions.len(), 2);
    assert!(session.is_expired(session.started_at + Duration::minutes(31)));

    let session = started(engine.start_attempt(&h.user, untimed).unwrap());
    assert!(session.deadline.is_none());
}

#[test]
fn test_attempts_are_counted_per_user() {
    let h = Harness::new();
    let engine = h.engine();
    let id = h.add(
        "Once",
        Assessment::new(two_questions())
            .unwrap()
            .with_attempts_allowed(1)
            .unwrap(),
    );

    started(engine.start_attempt(&h.user, id).unwrap());
    assert!(matches!(
        engine.start_attempt(&h.user, id).unwrap(),
        StartOutcome::Exhausted { .. }
    ));
    let other = UserId::new("learner-2");
    assert_eq!(started(engine.start_attempt(&other, id).unwrap()).attempt, 1);
}

#[test]
fn test_non_assessment_content_is_not_found() {
    let h = Harness::new();
    let engine = h.engine();
    let theory = h.add("Reading", Theory::new("Loops repeat work").unwrap());

    let err = engine.start_attempt(&h.user, theory).unwrap_err();
    assert!(matches!(err, EngineError::AssessmentNotFound(id) if id == theory));
    let err = engine.start_attempt(&h.user, ContentId::new()).unwrap_err();
    assert!(matches!(err, EngineError::AssessmentNotFound(_)));
}

// ===== Submitting answers =====

#[test]
fn test_submit_answer_grades_and_records() {
    let h = Harness::new();
    let engine = h.engine();
    let id = h.add("Checkpoint", Assessment::new(two_questions()).unwrap());

    let result = engine
        .submit_answer(&h.user, id, &QuestionId::new("q1"), &Answer::from(" 4 "))
        .unwrap();
    assert!(result.is_correct);
    assert_eq!(result.points_earned, 1);
    assert_eq!(result.max_points, 1);
    assert_eq!(result.feedback, "Right");

    let result = engine
        .submit_answer(&h.user, id, &QuestionId::new("q2"), &Answer::from("2X"))
        .unwrap();
    assert!(!result.is_correct);
    assert_eq!(result.feedback, "");

    let saved = h.answers.answers_for(&h.user);
    assert_eq!(saved.len(), 2);
    assert!(saved.iter().any(|a| a.answer_text == " 4 " && a.is_correct && a.points_earned == 1));

    let logged = h
        .log
        .query(&h.user, id, Some(InteractionKind::AnswerQuestion))
        .unwrap();
    assert_eq!(
        logged[0].data,
        json!({"question_id": "q1", "is_correct": true, "points_earned": 1})
    );
}

#[test]
fn test_submit_unknown_question_fails() {
    let h = Harness::new();
    let engine = h.engine();
    let id = h.add("Checkpoint", Assessment::new(two_questions()).unwrap());

    let err = engine
        .submit_answer(&h.user, id, &QuestionId::new("q9"), &Answer::from("4"))
        .unwrap_err();
    assert!(matches!(err, EngineError::QuestionNotFound { .. }));
    assert!(h.log.is_empty());
}

#[test]
fn test_submit_reports_persistence_fault() {
    let h = Harness::new();
    let engine = h.engine();
    let id = h.add("Checkpoint", Assessment::new(two_questions()).unwrap());
    h.answers.set_failing(true);

    let err = engine
        .submit_answer(&h.user, id, &QuestionId::new("q1"), &Answer::from("4"))
        .unwrap_err();
    assert!(matches!(err, EngineError::GradingFault { ref question_id, .. } if question_id.as_str() == "q1"));
}

// ===== Completing attempts =====

#[test]
fn test_complete_scores_partial_attempt() {
    let h = Harness::new();
    let engine = h.engine();
    let id = h.add("Checkpoint", Assessment::new(two_questions()).unwrap());
    started(engine.start_attempt(&h.user, id).unwrap());

    let result = engine
        .complete_attempt(
            &h.user,
            id,
            &answers(&[("q1", Answer::from("4")), ("q2", Answer::from("x"))]),
        )
        .unwrap();

    assert_eq!(result.total_points, 1);
    assert_eq!(result.max_points, 4);
    assert_eq!(result.score, 25.0);
    assert!(!result.passed);
    assert_eq!(result.correct_count, 1);
    assert_eq!(result.total_questions, 2);
    assert_eq!(result.attempt, Some(1));

    let progress = h.progress.get(&h.user, id).unwrap();
    assert!(progress.completed);
    assert_eq!(progress.score, 25.0);

    let completes = h
        .log
        .query(&h.user, id, Some(InteractionKind::CompleteAssessment))
        .unwrap();
    assert_eq!(
        completes[0].data,
        json!({"attempt": 1, "score": 25.0, "passed": false, "correct_count": 1, "total_questions": 2})
    );
    assert_eq!(engine.attempt_state(&h.user, id).unwrap(), AttemptState::Completed);
}

#[test]
fn test_complete_counts_unanswered_questions() {
    let h = Harness::new();
    let engine = h.engine();
    let id = h.add("Checkpoint", Assessment::new(two_questions()).unwrap());

    let result = engine
        .complete_attempt(&h.user, id, &answers(&[("q2", Answer::from("2x"))]))
        .unwrap();

    assert_eq!(result.questions[0].status, QuestionStatus::Unanswered);
    assert_eq!(result.questions[1].status, QuestionStatus::Correct);
    assert_eq!(result.max_points, 4);
    assert_eq!(result.score, 75.0);
    assert!(result.passed);
    assert!(result.attempt.is_none());
    // only the answered question is stored
    assert_eq!(h.answers.answers_for(&h.user).len(), 1);
}

#[test]
fn test_complete_totals_points_past_u32() {
    let h = Harness::new();
    let engine = h.engine();
    let id = h.add(
        "Heavy",
        Assessment::new(vec![
            Question::new("q1", "Simplify x + x", AnswerModality::Mathematical)
                .with_correct_answer("2x")
                .with_points(u32::MAX),
            Question::new("q2", "Simplify y + y", AnswerModality::Mathematical)
                .with_correct_answer("2y")
                .with_points(u32::MAX),
        ])
        .unwrap(),
    );

    let result = engine
        .complete_attempt(
            &h.user,
            id,
            &answers(&[("q1", Answer::from("2x")), ("q2", Answer::from("2y"))]),
        )
        .unwrap();

    assert_eq!(result.total_points, 2 * u64::from(u32::MAX));
    assert_eq!(result.max_points, 2 * u64::from(u32::MAX));
    assert_eq!(result.score, 100.0);
    assert!(result.passed);
    assert_eq!(result.correct_count, 2);
}

#[test]
fn test_complete_survives_answer_faults() {
    let h = Harness::new();
    let engine = h.engine();
    let id = h.add("Checkpoint", Assessment::new(two_questions()).unwrap());
    started(engine.start_attempt(&h.user, id).unwrap());
    h.answers.set_failing(true);

    let result = engine
        .complete_attempt(
            &h.user,
            id,
            &answers(&[("q1", Answer::from("4")), ("q2", Answer::from("2x"))]),
        )
        .unwrap();

    assert_eq!(result.score, 100.0);
    assert!(result.questions.iter().all(|q| q.fault.is_some()));
    assert!(result.questions.iter().all(|q| q.is_correct));
    assert!(h.progress.get(&h.user, id).is_some());

    let history = engine.attempt_history(&h.user, id).unwrap();
    assert_eq!(history[0].completion.as_ref().map(|c| c.score), Some(100.0));
}

#[test]
fn test_passing_threshold_is_inclusive() {
    let h = Harness::new();
    let engine = h.engine();
    let id = h.add(
        "Checkpoint",
        Assessment::new(two_questions())
            .unwrap()
            .with_passing_score(75.0)
            .unwrap(),
    );
    let result = engine
        .complete_attempt(&h.user, id, &answers(&[("q2", Answer::from("2x"))]))
        .unwrap();
    assert_eq!(result.score, 75.0);
    assert!(result.passed);
}

// ===== State and history =====

#[test]
fn test_attempt_state_follows_log() {
    let h = Harness::new();
    let engine = h.engine();
    let id = h.add("Checkpoint", Assessment::new(two_questions()).unwrap());

    assert_eq!(engine.attempt_state(&h.user, id).unwrap(), AttemptState::NotStarted);
    started(engine.start_attempt(&h.user, id).unwrap());
    engine
        .submit_answer(&h.user, id, &QuestionId::new("q1"), &Answer::from("4"))
        .unwrap();
    assert_eq!(engine.attempt_state(&h.user, id).unwrap(), AttemptState::InProgress);
    engine.complete_attempt(&h.user, id, &HashMap::new()).unwrap();
    assert_eq!(engine.attempt_state(&h.user, id).unwrap(), AttemptState::Completed);
    started(engine.start_attempt(&h.user, id).unwrap());
    assert_eq!(engine.attempt_state(&h.user, id).unwrap(), AttemptState::InProgress);
    assert_eq!(engine.attempts_used(&h.user, id).unwrap(), 2);
}

#[test]
fn test_history_lists_open_and_closed_attempts() {
    let h = Harness::new();
    let engine = h.engine();
    let id = h.add("Checkpoint", Assessment::new(two_questions()).unwrap());

    started(engine.start_attempt(&h.user, id).unwrap());
    engine
        .complete_attempt(&h.user, id, &answers(&[("q1", Answer::from("4"))]))
        .unwrap();
    started(engine.start_attempt(&h.user, id).unwrap());

    let history = engine.attempt_history(&h.user, id).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].attempt, 1);
    assert_eq!(history[0].completion.as_ref().map(|c| c.score), Some(25.0));
    assert_eq!(history[1].attempt, 2);
    assert!(history[1].completion.is_none());
}

#[test]
fn test_history_pairing_is_selectable() {
    let h = Harness::new();
    let id = h.add("Checkpoint", Assessment::new(two_questions()).unwrap());
    let base = Utc::now() - Duration::hours(1);
    let entries = [
        (InteractionKind::StartAssessment, json!({"attempt": 1}), 0),
        (InteractionKind::StartAssessment, json!({"attempt": 2}), 5),
        (
            InteractionKind::CompleteAssessment,
            json!({"attempt": 2, "score": 90.0, "passed": true, "correct_count": 2, "total_questions": 2}),
            10,
        ),
    ];
    for (kind, data, minute) in entries {
        h.log
            .append_at(&h.user, id, kind, data, base + Duration::minutes(minute))
            .unwrap();
    }

    let legacy = h.engine().attempt_history(&h.user, id).unwrap();
    assert!(legacy[0].completion.is_some());
    assert!(legacy[1].completion.is_none());

    let ordinal = h
        .engine()
        .with_pairing(OrdinalPairing)
        .attempt_history(&h.user, id)
        .unwrap();
    assert!(ordinal[0].completion.is_none());
    assert_eq!(
        ordinal[1].completion.as_ref().map(|c| c.completed_at),
        Some(base + Duration::minutes(10))
    );
}

#[test]
fn test_lesson_assessments_filters_kinds() {
    let h = Harness::new();
    let engine = h.engine();
    h.add("Reading", Theory::new("Loops repeat work").unwrap());
    let id = h.add("Checkpoint", Assessment::new(two_questions()).unwrap());

    let found = engine.lesson_assessments(h.lesson).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id(), id);
    assert!(engine.lesson_assessments(LessonId::new()).unwrap().is_empty());
}
