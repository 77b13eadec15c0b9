pub mod grade;
pub mod lesson;
pub mod types;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use lectern_core::{ContentService, ContentTypeRegistry, MemoryContentStore};

/// Registry with the built-in types, shared by every command
pub fn registry() -> Arc<ContentTypeRegistry> {
    Arc::new(ContentTypeRegistry::new())
}

pub fn load_store(path: &Path) -> Result<Arc<MemoryContentStore>> {
    let store = MemoryContentStore::from_json_file(path)
        .with_context(|| format!("Failed to load records from {}", path.display()))?;
    Ok(Arc::new(store))
}

pub fn content_service(path: &Path) -> Result<Arc<ContentService>> {
    Ok(Arc::new(ContentService::new(load_store(path)?, registry())))
}

pub fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan))
            .collect::<Vec<_>>(),
    );
    table
}
