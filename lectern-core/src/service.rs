//! Content service
//!
//! Ties the record store, the converter and the registry together. Reads
//! are resilient to corrupt rows; writes are validated before anything is
//! stored.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::content::ContentUnit;
use crate::convert::{ContentConverter, NewContentRecord};
use crate::error::ContentError;
use crate::registry::{ContentTypeRegistry, ContentTypeSummary};
use crate::store::{ContentRecordStore, StoreError};
use crate::types::{ContentId, LessonId};

pub struct ContentService {
    store: Arc<dyn ContentRecordStore>,
    converter: ContentConverter,
}

impl ContentService {
    pub fn new(store: Arc<dyn ContentRecordStore>, registry: Arc<ContentTypeRegistry>) -> Self {
        Self {
            store,
            converter: ContentConverter::new(registry),
        }
    }

    pub fn converter(&self) -> &ContentConverter {
        &self.converter
    }

    fn registry(&self) -> &ContentTypeRegistry {
        self.converter.registry()
    }

    /// Fetch one unit; a missing or unconvertible record yields `None`
    pub fn get_content(&self, id: ContentId) -> Result<Option<ContentUnit>, ContentError> {
        let record = self.store.get_by_id(id)?;
        Ok(record.and_then(|r| self.converter.to_model(&r)))
    }

    /// All convertible units of a lesson, ordered by position
    pub fn lesson_content(&self, lesson_id: LessonId) -> Result<Vec<ContentUnit>, ContentError> {
        let records = self.store.list_by_lesson(lesson_id)?;
        let total = records.len();
        let mut units: Vec<ContentUnit> = records
            .iter()
            .filter_map(|r| self.converter.to_model(r))
            .collect();
        if units.len() < total {
            warn!(%lesson_id, skipped = total - units.len(), "Omitted corrupt content from lesson");
        }
        units.sort_by_key(|u| (u.header().order, u.id()));
        Ok(units)
    }

    /// Validate against the registry, returning every problem found
    pub fn validate(&self, unit: &ContentUnit) -> Vec<String> {
        self.registry().validate(unit)
    }

    fn ensure_valid(&self, unit: &ContentUnit) -> Result<(), ContentError> {
        let errors = self.validate(unit);
        if errors.is_empty() {
            return Ok(());
        }
        warn!(content_id = %unit.id(), ?errors, "Rejecting invalid content");
        Err(ContentError::Validation(errors))
    }

    pub fn create_content(&self, unit: &ContentUnit) -> Result<ContentUnit, ContentError> {
        self.ensure_valid(unit)?;
        let record = NewContentRecord::from(self.converter.to_record(unit));
        let stored = self.store.create(record)?;
        info!(content_id = %stored.id, content_type = %stored.content_type, "Content created");
        Ok(self.converter.try_to_model(&stored)?)
    }

    pub fn update_content(&self, unit: &ContentUnit) -> Result<ContentUnit, ContentError> {
        self.ensure_valid(unit)?;
        let stored = match self.store.update(self.converter.to_record(unit)) {
            Ok(record) => record,
            Err(StoreError::NotFound(_)) => return Err(ContentError::NotFound(unit.id())),
            Err(e) => return Err(e.into()),
        };
        debug!(content_id = %stored.id, "Content updated");
        Ok(self.converter.try_to_model(&stored)?)
    }

    /// Returns whether anything was removed
    pub fn delete_content(&self, id: ContentId) -> Result<bool, ContentError> {
        let removed = self.store.delete(id)?;
        if removed {
            info!(content_id = %id, "Content deleted");
        }
        Ok(removed)
    }

    pub fn content_types(&self) -> Vec<ContentTypeSummary> {
        self.registry().content_types()
    }
}
