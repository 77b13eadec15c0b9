//! Attempt history reconstruction.
//!
//! Attempts are never stored. They are rebuilt from start and complete
//! interactions, and the rule that decides which complete closes which
//! start lives behind [`HistoryPairing`] so it can be replaced wholesale.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::interaction::{CompleteData, InteractionEntry, InteractionKind, StartData};

/// A start interaction read back from the log
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartRecord {
    pub attempt: u32,
    pub at: DateTime<Utc>,
}

/// A complete interaction read back from the log
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteRecord {
    pub at: DateTime<Utc>,
    pub data: CompleteData,
}

/// Outcome recorded when an attempt was completed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptCompletion {
    pub completed_at: DateTime<Utc>,
    pub score: f64,
    pub passed: bool,
    pub correct_count: u32,
    pub total_questions: u32,
}

impl From<&CompleteRecord> for AttemptCompletion {
    fn from(record: &CompleteRecord) -> Self {
        Self {
            completed_at: record.at,
            score: record.data.score,
            passed: record.data.passed,
            correct_count: record.data.correct_count,
            total_questions: record.data.total_questions,
        }
    }
}

/// One reconstructed attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttemptSummary {
    pub attempt: u32,
    pub started_at: DateTime<Utc>,
    /// `None` while the attempt is still open
    pub completion: Option<AttemptCompletion>,
}

/// Read starts and completes out of a log, skipping unreadable entries
pub fn replay(entries: &[InteractionEntry]) -> (Vec<StartRecord>, Vec<CompleteRecord>) {
    let mut starts = Vec::new();
    let mut completes = Vec::new();
    for entry in entries {
        match entry.kind {
            InteractionKind::StartAssessment => {
                match serde_json::from_value::<StartData>(entry.data.clone()) {
                    Ok(data) if data.attempt > 0 => starts.push(StartRecord {
                        attempt: data.attempt,
                        at: entry.timestamp,
                    }),
                    Ok(_) => warn!(timestamp = %entry.timestamp, "Ignoring start without attempt ordinal"),
                    Err(e) => warn!(timestamp = %entry.timestamp, error = %e, "Ignoring unreadable start interaction"),
                }
            }
            InteractionKind::CompleteAssessment => {
                match serde_json::from_value::<CompleteData>(entry.data.clone()) {
                    Ok(data) => completes.push(CompleteRecord {
                        at: entry.timestamp,
                        data,
                    }),
                    Err(e) => warn!(timestamp = %entry.timestamp, error = %e, "Ignoring unreadable complete interaction"),
                }
            }
            InteractionKind::AnswerQuestion => {}
        }
    }
    (starts, completes)
}

/// Strategy pairing complete interactions with the attempts they close
pub trait HistoryPairing: Send + Sync {
    /// Build attempt summaries ordered by ordinal
    fn pair(&self, starts: &[StartRecord], completes: &[CompleteRecord]) -> Vec<AttemptSummary>;
}

/// Group starts by ordinal; a repeated ordinal keeps the latest start time
fn open_attempts(starts: &[StartRecord]) -> BTreeMap<u32, AttemptSummary> {
    let mut attempts = BTreeMap::new();
    for start in starts {
        attempts.insert(
            start.attempt,
            AttemptSummary {
                attempt: start.attempt,
                started_at: start.at,
                completion: None,
            },
        );
    }
    attempts
}

fn close_earliest_open(attempts: &mut BTreeMap<u32, AttemptSummary>, complete: &CompleteRecord) {
    match attempts.values_mut().find(|a| a.completion.is_none()) {
        Some(open) => open.completion = Some(complete.into()),
        None => warn!(completed_at = %complete.at, "Complete interaction has no open attempt"),
    }
}

/// Pairs each complete with the earliest open attempt
///
/// When the log holds exactly one start and one complete they are paired
/// directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyPairing;

impl HistoryPairing for LegacyPairing {
    fn pair(&self, starts: &[StartRecord], completes: &[CompleteRecord]) -> Vec<AttemptSummary> {
        let mut attempts = open_attempts(starts);
        if let ([start], [complete]) = (starts, completes) {
            if let Some(attempt) = attempts.get_mut(&start.attempt) {
                attempt.completion = Some(complete.into());
            }
        } else {
            for complete in completes {
                close_earliest_open(&mut attempts, complete);
            }
        }
        attempts.into_values().collect()
    }
}

/// Pairs a complete with the attempt named in its payload
///
/// Completes without an ordinal, or naming an attempt that is unknown or
/// already closed, fall back to the earliest open attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrdinalPairing;

impl HistoryPairing for OrdinalPairing {
    fn pair(&self, starts: &[StartRecord], completes: &[CompleteRecord]) -> Vec<AttemptSummary> {
        let mut attempts = open_attempts(starts);
        for complete in completes {
            if let Some(ordinal) = complete.data.attempt
                && let Some(attempt) = attempts.get_mut(&ordinal)
                && attempt.completion.is_none()
            {
                attempt.completion = Some(complete.into());
                continue;
            }
            close_earliest_open(&mut attempts, complete);
        }
        attempts.into_values().collect()
    }
}

/// Selectable pairing strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairingStrategy {
    #[default]
    Legacy,
    Ordinal,
}

impl PairingStrategy {
    pub fn build(self) -> Box<dyn HistoryPairing> {
        match self {
            Self::Legacy => Box::new(LegacyPairing),
            Self::Ordinal => Box::new(OrdinalPairing),
        }
    }
}
