//! Content type listing

use anyhow::Result;
use clap::Args;
use comfy_table::Cell;

use super::{registry, table};

#[derive(Args, Debug)]
pub struct TypesArgs {
    /// Print as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: TypesArgs) -> Result<()> {
    let registry = registry();
    let summaries = registry.content_types();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    let mut table = table(&["Type", "Name", "Shape", "Icon", "Description"]);
    for summary in &summaries {
        let shape = registry
            .shape_of(&summary.name)
            .map(|kind| kind.to_string())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&summary.name),
            Cell::new(&summary.display_name),
            Cell::new(shape),
            Cell::new(summary.icon.as_deref().unwrap_or("")),
            Cell::new(&summary.description),
        ]);
    }

    println!("{table}");
    Ok(())
}
