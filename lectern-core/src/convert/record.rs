//! Persisted shape of a content unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{ContentId, LessonId};

/// A stored content row: fixed header columns plus a loosely structured payload.
///
/// `metadata` and `content_data` are kept as raw JSON so a record with a
/// damaged payload can still be loaded and listed; the converter decides
/// whether it can be turned into a [`ContentUnit`](crate::content::ContentUnit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: ContentId,
    pub lesson_id: LessonId,
    /// Type discriminator, a registry tag
    pub content_type: String,
    pub title: String,
    #[serde(default)]
    pub order: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Type-specific payload
    #[serde(default)]
    pub content_data: Value,
}

/// Input for creating a record; the store assigns timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContentRecord {
    pub id: ContentId,
    pub lesson_id: LessonId,
    pub content_type: String,
    pub title: String,
    pub order: i32,
    pub description: Option<String>,
    pub metadata: Value,
    pub estimated_minutes: Option<u32>,
    pub content_data: Value,
}

impl NewContentRecord {
    /// Materialise the record with the given creation time.
    pub fn into_record(self, now: DateTime<Utc>) -> ContentRecord {
        ContentRecord {
            id: self.id,
            lesson_id: self.lesson_id,
            content_type: self.content_type,
            title: self.title,
            order: self.order,
            description: self.description,
            metadata: self.metadata,
            estimated_minutes: self.estimated_minutes,
            created_at: Some(now),
            updated_at: Some(now),
            content_data: self.content_data,
        }
    }
}

impl From<ContentRecord> for NewContentRecord {
    fn from(record: ContentRecord) -> Self {
        Self {
            id: record.id,
            lesson_id: record.lesson_id,
            content_type: record.content_type,
            title: record.title,
            order: record.order,
            description: record.description,
            metadata: record.metadata,
            estimated_minutes: record.estimated_minutes,
            content_data: record.content_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_tolerates_missing_optional_columns() {
        let id = ContentId::new();
        let lesson = LessonId::new();
        let record: ContentRecord = serde_json::from_value(json!({
            "id": id.to_string(),
            "lesson_id": lesson.to_string(),
            "content_type": "theory",
            "title": "Intro"
        }))
        .unwrap();
        assert_eq!(record.id, id);
        assert_eq!(record.order, 0);
        assert!(record.metadata.is_null());
        assert!(record.content_data.is_null());
        assert!(record.created_at.is_none());
    }

    #[test]
    fn into_record_stamps_both_timestamps() {
        let now = Utc::now();
        let record = NewContentRecord {
            id: ContentId::new(),
            lesson_id: LessonId::new(),
            content_type: "theory".to_string(),
            title: "Intro".to_string(),
            order: 2,
            description: None,
            metadata: Value::Null,
            estimated_minutes: Some(5),
            content_data: json!({"text_content": "hello"}),
        }
        .into_record(now);
        assert_eq!(record.created_at, Some(now));
        assert_eq!(record.updated_at, Some(now));
        assert_eq!(record.order, 2);
    }
}
