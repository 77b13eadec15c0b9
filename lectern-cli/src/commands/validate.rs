//! Record validation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color};
use lectern_core::{ContentConverter, ContentRecord};

use super::{load_store, registry, table};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON file holding an array of content records
    pub records: PathBuf,
}

/// Problems found in one record; empty when it is valid
fn check_record(converter: &ContentConverter, record: &ContentRecord) -> Vec<String> {
    match converter.try_to_model(record) {
        Ok(unit) => converter.registry().validate(&unit),
        Err(e) => vec![e.to_string()],
    }
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let store = load_store(&args.records)?;
    let converter = ContentConverter::new(registry());
    let records = store.records()?;

    let mut table = table(&["Id", "Type", "Title", "Result"]);
    let mut failed = 0;
    for record in &records {
        let problems = check_record(&converter, record);
        let result = if problems.is_empty() {
            Cell::new("ok").fg(Color::Green)
        } else {
            failed += 1;
            Cell::new(problems.join("\n")).fg(Color::Red)
        };
        table.add_row(vec![
            Cell::new(record.id),
            Cell::new(&record.content_type),
            Cell::new(&record.title),
            result,
        ]);
    }

    println!("{table}");
    if failed > 0 {
        anyhow::bail!("{failed} of {} records failed validation", records.len());
    }
    println!("All {} records are valid", records.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::{ContentId, LessonId};
    use serde_json::{Value, json};

    fn record(content_type: &str, title: &str, content_data: Value) -> ContentRecord {
        serde_json::from_value(json!({
            "id": ContentId::new().to_string(),
            "lesson_id": LessonId::new().to_string(),
            "content_type": content_type,
            "title": title,
            "content_data": content_data,
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_record_has_no_problems() {
        let converter = ContentConverter::new(registry());
        let record = record("theory", "Intro", json!({"text_content": "Hello"}));
        assert!(check_record(&converter, &record).is_empty());
    }

    #[test]
    fn test_unknown_type_is_reported() {
        let converter = ContentConverter::new(registry());
        let record = record("podcast", "Episode 1", json!({}));
        let problems = check_record(&converter, &record);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("podcast"));
    }

    #[test]
    fn test_registry_problems_are_listed() {
        let converter = ContentConverter::new(registry());
        let record = record(
            "assessment",
            "Checkpoint",
            json!({"questions": [{"id": "q1", "text": "2 + 2?", "answer_type": "multiple_choice"}]}),
        );
        let problems = check_record(&converter, &record);
        assert_eq!(problems, vec!["Question q1: correct answer is required"]);
    }
}
