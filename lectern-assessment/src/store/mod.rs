//! Collaborators the engine persists through

mod memory;

pub use lectern_core::store::{Result, StoreError};
pub use memory::{MemoryAnswerStore, MemoryInteractionLog, MemoryProgressSink, ProgressRecord};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use lectern_core::{ContentId, QuestionId, UserId};

use crate::interaction::{InteractionEntry, InteractionKind};

/// Append-only log of user interactions with content
pub trait InteractionLog: Send + Sync {
    fn append(
        &self,
        user: &UserId,
        content: ContentId,
        kind: InteractionKind,
        data: Value,
    ) -> Result<()>;

    /// Entries for the pair, optionally filtered by kind, in append order
    fn query(
        &self,
        user: &UserId,
        content: ContentId,
        kind: Option<InteractionKind>,
    ) -> Result<Vec<InteractionEntry>>;
}

/// Receives per-content progress for a user
pub trait ProgressSink: Send + Sync {
    fn record_content_progress(
        &self,
        user: &UserId,
        content: ContentId,
        completed: bool,
        score: f64,
    ) -> Result<()>;
}

/// A stored answer to a single question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAnswer {
    pub id: Uuid,
    pub user_id: UserId,
    pub question_id: QuestionId,
    pub answer_text: String,
    pub is_correct: bool,
    pub points_earned: u32,
    pub created_at: DateTime<Utc>,
}

/// Raw answer storage
///
/// `create` stores the submitted text; the caller then sets correctness and
/// points and persists them with `save`.
pub trait UserAnswerStore: Send + Sync {
    fn create(&self, user: &UserId, question: &QuestionId, answer_text: &str) -> Result<UserAnswer>;

    fn save(&self, answer: &UserAnswer) -> Result<()>;
}
