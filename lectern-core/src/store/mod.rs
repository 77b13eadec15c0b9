//! Persistence boundary for content records

mod error;
mod memory;

pub use error::{Result, StoreError};
pub use memory::MemoryContentStore;

use crate::convert::{ContentRecord, NewContentRecord};
use crate::types::{ContentId, LessonId};

/// Storage for content records.
///
/// Implementations own the storage engine; lectern only sees records.
pub trait ContentRecordStore: Send + Sync {
    fn get_by_id(&self, id: ContentId) -> Result<Option<ContentRecord>>;

    /// All records of a lesson, in no particular order
    fn list_by_lesson(&self, lesson_id: LessonId) -> Result<Vec<ContentRecord>>;

    fn create(&self, record: NewContentRecord) -> Result<ContentRecord>;

    /// Replace an existing record; fails with `NotFound` if absent
    fn update(&self, record: ContentRecord) -> Result<ContentRecord>;

    /// Returns whether a record was removed
    fn delete(&self, id: ContentId) -> Result<bool>;
}
