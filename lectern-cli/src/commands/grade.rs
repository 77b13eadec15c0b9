//! Take an assessment end to end against in-memory collaborators

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{Cell, Color};
use lectern_assessment::{
    Answer, AssessmentEngine, AssessmentResult, AttemptSummary, MemoryAnswerStore,
    MemoryInteractionLog, MemoryProgressSink, QuestionStatus, StartOutcome,
};
use lectern_core::{ContentId, QuestionId, UserId};
use tracing::info;

use super::{content_service, table};
use crate::config::LecternConfig;

#[derive(Args, Debug)]
pub struct GradeArgs {
    /// JSON file holding an array of content records
    pub records: PathBuf,

    /// Assessment to take
    pub assessment_id: String,

    /// JSON object mapping question ids to answers
    pub answers: PathBuf,

    /// User taking the assessment
    #[arg(long, default_value = "learner")]
    pub user: String,
}

fn load_answers(path: &Path) -> Result<HashMap<QuestionId, Answer>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read answers from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Answers in {} must be an object of question ids", path.display()))
}

pub fn run(args: GradeArgs, config: &LecternConfig) -> Result<()> {
    let assessment_id = ContentId::parse(&args.assessment_id)
        .with_context(|| format!("Invalid assessment id: {}", args.assessment_id))?;
    let answers = load_answers(&args.answers)?;
    let user = UserId::new(args.user);

    let engine = AssessmentEngine::new(
        content_service(&args.records)?,
        Arc::new(MemoryInteractionLog::new()),
        Arc::new(MemoryProgressSink::new()),
        Arc::new(MemoryAnswerStore::new()),
    )
    .with_pairing_strategy(config.assessment.pairing);

    let session = match engine.start_attempt(&user, assessment_id)? {
        StartOutcome::Started(session) => session,
        StartOutcome::Exhausted { used, allowed } => {
            println!("No attempts left ({used} of {allowed} used)");
            return Ok(());
        }
    };
    info!(%user, attempt = session.attempt, questions = session.questions.len(), "Submitting answers");

    let result = engine.complete_attempt(&user, assessment_id, &answers)?;
    print_result(&result);

    let history = engine.attempt_history(&user, assessment_id)?;
    print_history(&history, config);
    Ok(())
}

fn status_cell(status: QuestionStatus) -> Cell {
    match status {
        QuestionStatus::Correct => Cell::new("correct").fg(Color::Green),
        QuestionStatus::Incorrect => Cell::new("incorrect").fg(Color::Red),
        QuestionStatus::Unanswered => Cell::new("unanswered").fg(Color::Yellow),
    }
}

fn print_result(result: &AssessmentResult) {
    let mut table = table(&["Question", "Status", "Points", "Note"]);
    for outcome in &result.questions {
        table.add_row(vec![
            Cell::new(&outcome.question_id),
            status_cell(outcome.status),
            Cell::new(format!("{}/{}", outcome.points_earned, outcome.max_points)),
            Cell::new(outcome.fault.as_deref().unwrap_or("")),
        ]);
    }
    println!("{table}");
    println!(
        "Score: {:.1}% ({}/{} points, {} of {} correct) - {}",
        result.score,
        result.total_points,
        result.max_points,
        result.correct_count,
        result.total_questions,
        if result.passed { "passed" } else { "not passed" }
    );
}

fn print_history(history: &[AttemptSummary], config: &LecternConfig) {
    let dates = config.display.date_display();
    let mut table = table(&["Attempt", "Started", "Completed", "Score", "Passed"]);
    for summary in history {
        let (completed, score, passed) = match &summary.completion {
            Some(c) => (
                dates.render(Some(c.completed_at)),
                format!("{:.1}%", c.score),
                if c.passed { "yes" } else { "no" }.to_string(),
            ),
            None => (dates.render(None), String::new(), String::new()),
        };
        table.add_row(vec![
            Cell::new(summary.attempt),
            Cell::new(dates.render(Some(summary.started_at))),
            Cell::new(completed),
            Cell::new(score),
            Cell::new(passed),
        ]);
    }
    println!("{table}");
}
