//! In-memory content record store

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ContentRecordStore, Result, StoreError};
use crate::convert::{ContentRecord, NewContentRecord};
use crate::types::{ContentId, LessonId};

/// Record store backed by a map, for tests and fixture-driven tools
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    records: Mutex<BTreeMap<ContentId, ContentRecord>>,
    unavailable: AtomicBool,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing records
    pub fn with_records(records: impl IntoIterator<Item = ContentRecord>) -> Self {
        let records = records.into_iter().map(|r| (r.id, r)).collect();
        Self {
            records: Mutex::new(records),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Load a JSON array of records from disk
    ///
    /// Entries whose header columns cannot be read are skipped with a warning.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let entries: Vec<Value> = serde_json::from_str(&contents)?;
        let total = entries.len();

        let records: Vec<ContentRecord> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(path = %path.display(), index, error = %e, "Skipping unreadable record");
                    None
                }
            })
            .collect();

        debug!(path = %path.display(), loaded = records.len(), total, "Loaded content records");
        Ok(Self::with_records(records))
    }

    /// Simulate an outage: every call fails with `Unavailable` while set
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Every stored record, ordered by id
    pub fn records(&self) -> Result<Vec<ContentRecord>> {
        self.check_available()?;
        Ok(self.records.lock()?.values().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("content store offline".to_string()));
        }
        Ok(())
    }
}

impl ContentRecordStore for MemoryContentStore {
    fn get_by_id(&self, id: ContentId) -> Result<Option<ContentRecord>> {
        self.check_available()?;
        Ok(self.records.lock()?.get(&id).cloned())
    }

    fn list_by_lesson(&self, lesson_id: LessonId) -> Result<Vec<ContentRecord>> {
        self.check_available()?;
        Ok(self
            .records
            .lock()?
            .values()
            .filter(|r| r.lesson_id == lesson_id)
            .cloned()
            .collect())
    }

    fn create(&self, record: NewContentRecord) -> Result<ContentRecord> {
        self.check_available()?;
        let record = record.into_record(Utc::now());
        self.records.lock()?.insert(record.id, record.clone());
        Ok(record)
    }

    fn update(&self, mut record: ContentRecord) -> Result<ContentRecord> {
        self.check_available()?;
        let mut records = self.records.lock()?;
        let Some(existing) = records.get(&record.id) else {
            return Err(StoreError::NotFound(record.id.to_string()));
        };
        record.created_at = existing.created_at;
        record.updated_at = Some(Utc::now());
        records.insert(record.id, record.clone());
        Ok(record)
    }

    fn delete(&self, id: ContentId) -> Result<bool> {
        self.check_available()?;
        Ok(self.records.lock()?.remove(&id).is_some())
    }
}
