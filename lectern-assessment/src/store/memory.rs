//! In-memory collaborators for tests and local tools

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use lectern_core::{ContentId, QuestionId, UserId};

use super::{InteractionLog, ProgressSink, Result, StoreError, UserAnswer, UserAnswerStore};
use crate::interaction::{InteractionEntry, InteractionKind};

#[derive(Debug, Clone)]
struct LoggedInteraction {
    user: UserId,
    content: ContentId,
    entry: InteractionEntry,
}

/// Interaction log kept in a vector
#[derive(Default)]
pub struct MemoryInteractionLog {
    entries: Mutex<Vec<LoggedInteraction>>,
}

impl MemoryInteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry with an explicit timestamp, e.g. to replay an old log
    pub fn append_at(
        &self,
        user: &UserId,
        content: ContentId,
        kind: InteractionKind,
        data: Value,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        self.entries.lock()?.push(LoggedInteraction {
            user: user.clone(),
            content,
            entry: InteractionEntry {
                timestamp,
                kind,
                data,
            },
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InteractionLog for MemoryInteractionLog {
    fn append(
        &self,
        user: &UserId,
        content: ContentId,
        kind: InteractionKind,
        data: Value,
    ) -> Result<()> {
        self.append_at(user, content, kind, data, Utc::now())
    }

    fn query(
        &self,
        user: &UserId,
        content: ContentId,
        kind: Option<InteractionKind>,
    ) -> Result<Vec<InteractionEntry>> {
        Ok(self
            .entries
            .lock()?
            .iter()
            .filter(|e| &e.user == user && e.content == content)
            .filter(|e| kind.is_none_or(|k| e.entry.kind == k))
            .map(|e| e.entry.clone())
            .collect())
    }
}

/// Last progress reported for a (user, content) pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressRecord {
    pub completed: bool,
    pub score: f64,
}

/// Progress sink that keeps the latest report per pair
#[derive(Default)]
pub struct MemoryProgressSink {
    progress: Mutex<HashMap<(UserId, ContentId), ProgressRecord>>,
}

impl MemoryProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user: &UserId, content: ContentId) -> Option<ProgressRecord> {
        self.progress
            .lock()
            .ok()?
            .get(&(user.clone(), content))
            .copied()
    }
}

impl ProgressSink for MemoryProgressSink {
    fn record_content_progress(
        &self,
        user: &UserId,
        content: ContentId,
        completed: bool,
        score: f64,
    ) -> Result<()> {
        self.progress
            .lock()?
            .insert((user.clone(), content), ProgressRecord { completed, score });
        Ok(())
    }
}

/// Answer store kept in a map, with a switch to simulate write failures
#[derive(Default)]
pub struct MemoryAnswerStore {
    answers: Mutex<HashMap<Uuid, UserAnswer>>,
    failing: AtomicBool,
}

impl MemoryAnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every call fails with `Unavailable`
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Saved answers for a user, oldest first
    pub fn answers_for(&self, user: &UserId) -> Vec<UserAnswer> {
        let mut answers: Vec<_> = self
            .answers
            .lock()
            .map(|a| a.values().filter(|a| &a.user_id == user).cloned().collect())
            .unwrap_or_default();
        answers.sort_by_key(|a| a.id);
        answers
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("answer store offline".to_string()));
        }
        Ok(())
    }
}

impl UserAnswerStore for MemoryAnswerStore {
    fn create(&self, user: &UserId, question: &QuestionId, answer_text: &str) -> Result<UserAnswer> {
        self.check()?;
        let answer = UserAnswer {
            id: Uuid::now_v7(),
            user_id: user.clone(),
            question_id: question.clone(),
            answer_text: answer_text.to_string(),
            is_correct: false,
            points_earned: 0,
            created_at: Utc::now(),
        };
        self.answers.lock()?.insert(answer.id, answer.clone());
        Ok(answer)
    }

    fn save(&self, answer: &UserAnswer) -> Result<()> {
        self.check()?;
        let mut answers = self.answers.lock()?;
        if !answers.contains_key(&answer.id) {
            return Err(StoreError::NotFound(answer.id.to_string()));
        }
        answers.insert(answer.id, answer.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_filters_by_pair_and_kind() {
        let log = MemoryInteractionLog::new();
        let user = UserId::new("u1");
        let other = UserId::new("u2");
        let content = ContentId::new();

        log.append(&user, content, InteractionKind::StartAssessment, json!({"attempt": 1}))
            .unwrap();
        log.append(&user, content, InteractionKind::AnswerQuestion, json!({}))
            .unwrap();
        log.append(&other, content, InteractionKind::StartAssessment, json!({"attempt": 1}))
            .unwrap();
        log.append(&user, ContentId::new(), InteractionKind::StartAssessment, json!({}))
            .unwrap();

        assert_eq!(log.query(&user, content, None).unwrap().len(), 2);
        let starts = log
            .query(&user, content, Some(InteractionKind::StartAssessment))
            .unwrap();
        assert_eq!(starts.len(), 1);
        assert_eq!(starts[0].data, json!({"attempt": 1}));
    }

    #[test]
    fn query_preserves_append_order() {
        let log = MemoryInteractionLog::new();
        let user = UserId::new("u1");
        let content = ContentId::new();
        for attempt in 1..=3 {
            log.append(
                &user,
                content,
                InteractionKind::StartAssessment,
                json!({ "attempt": attempt }),
            )
            .unwrap();
        }
        let attempts: Vec<_> = log
            .query(&user, content, None)
            .unwrap()
            .iter()
            .map(|e| e.data["attempt"].as_u64().unwrap())
            .collect();
        assert_eq!(attempts, vec![1, 2, 3]);
    }

    #[test]
    fn progress_keeps_latest_report() {
        let sink = MemoryProgressSink::new();
        let user = UserId::new("u1");
        let content = ContentId::new();
        sink.record_content_progress(&user, content, false, 10.0).unwrap();
        sink.record_content_progress(&user, content, true, 80.0).unwrap();
        assert_eq!(
            sink.get(&user, content),
            Some(ProgressRecord {
                completed: true,
                score: 80.0
            })
        );
    }

    #[test]
    fn answer_create_then_save() {
        let store = MemoryAnswerStore::new();
        let user = UserId::new("u1");
        let mut answer = store.create(&user, &QuestionId::new("q1"), "4").unwrap();
        answer.is_correct = true;
        answer.points_earned = 2;
        store.save(&answer).unwrap();
        let saved = store.answers_for(&user);
        assert_eq!(saved.len(), 1);
        assert!(saved[0].is_correct);
        assert_eq!(saved[0].answer_text, "4");
    }

    #[test]
    fn failing_answer_store_rejects_writes() {
        let store = MemoryAnswerStore::new();
        store.set_failing(true);
        let err = store
            .create(&UserId::new("u1"), &QuestionId::new("q1"), "4")
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
