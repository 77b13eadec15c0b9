//! lectern-assessment - Graded attempts at lectern assessments
//!
//! The [`AssessmentEngine`] starts attempts within the allowance, grades
//! answers through a swappable [`GraderTable`], scores completed attempts
//! and rebuilds attempt history from the interaction log.

pub mod answer;
pub mod engine;
pub mod error;
pub mod grading;
pub mod history;
pub mod interaction;
pub mod store;

pub use answer::Answer;
pub use engine::{
    AssessmentEngine, AssessmentResult, AttemptSession, AttemptState, GradingResult,
    QuestionOutcome, QuestionStatus, StartOutcome,
};
pub use error::{EngineError, Result};
pub use grading::{Grade, Grader, GraderTable};
pub use history::{
    AttemptCompletion, AttemptSummary, HistoryPairing, LegacyPairing, OrdinalPairing,
    PairingStrategy,
};
pub use interaction::{InteractionEntry, InteractionKind};
pub use store::{
    InteractionLog, MemoryAnswerStore, MemoryInteractionLog, MemoryProgressSink, ProgressSink,
    UserAnswer, UserAnswerStore,
};
