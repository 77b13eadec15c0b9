//! Lesson listing

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::Cell;
use lectern_core::LessonId;

use super::{content_service, table};
use crate::config::LecternConfig;

#[derive(Args, Debug)]
pub struct LessonArgs {
    /// JSON file holding an array of content records
    pub records: PathBuf,

    /// Lesson to show
    pub lesson_id: String,
}

pub fn run(args: LessonArgs, config: &LecternConfig) -> Result<()> {
    let lesson_id = LessonId::parse(&args.lesson_id)
        .with_context(|| format!("Invalid lesson id: {}", args.lesson_id))?;
    let service = content_service(&args.records)?;
    let units = service.lesson_content(lesson_id)?;

    if units.is_empty() {
        println!("No content found for lesson {lesson_id}");
        return Ok(());
    }

    let dates = config.display.date_display();
    let mut table = table(&["#", "Type", "Title", "Minutes", "Created", "Updated", "Id"]);
    for unit in &units {
        let header = unit.header();
        table.add_row(vec![
            Cell::new(header.order),
            Cell::new(unit.content_type()),
            Cell::new(unit.title()),
            Cell::new(
                header
                    .estimated_minutes
                    .map(|m| m.to_string())
                    .unwrap_or_default(),
            ),
            Cell::new(unit.formatted_created_date_with(&dates)),
            Cell::new(unit.formatted_updated_date_with(&dates)),
            Cell::new(unit.id()),
        ]);
    }

    println!("{table}");
    Ok(())
}
