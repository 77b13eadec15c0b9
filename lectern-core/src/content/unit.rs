//! The content unit: shared header plus a typed payload.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::body::{Assessment, ContentBody};
use super::error::ValidationError;
use super::kind::ContentKind;
use crate::types::{ContentId, LessonId};

/// Default `strftime` pattern for presentational dates, e.g. "05 March 2024".
pub const DEFAULT_DATE_FORMAT: &str = "%d %B %Y";

/// Placeholder rendered when a timestamp is absent.
pub const MISSING_DATE: &str = "N/A";

/// How content timestamps are rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateDisplay {
    /// `strftime` pattern
    pub format: String,
    /// Text shown when the timestamp is absent
    pub missing: String,
}

impl Default for DateDisplay {
    fn default() -> Self {
        Self {
            format: DEFAULT_DATE_FORMAT.to_string(),
            missing: MISSING_DATE.to_string(),
        }
    }
}

impl DateDisplay {
    /// Render a timestamp, falling back to the default pattern if ours is invalid.
    #[must_use]
    pub fn render(&self, timestamp: Option<DateTime<Utc>>) -> String {
        let Some(ts) = timestamp else {
            return self.missing.clone();
        };
        let mut out = String::new();
        if write!(out, "{}", ts.format(&self.format)).is_err() {
            out.clear();
            let _ = write!(out, "{}", ts.format(DEFAULT_DATE_FORMAT));
        }
        out
    }
}

/// Fields shared by every content unit.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentHeader {
    pub id: ContentId,
    pub title: String,
    /// Position within the owning lesson
    pub order: i32,
    pub lesson_id: LessonId,
    pub description: Option<String>,
    /// Free-form structured metadata; empty when absent
    pub metadata: Map<String, Value>,
    pub estimated_minutes: Option<u32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ContentHeader {
    /// Create a header with a fresh id for a unit in `lesson_id`.
    pub fn new(lesson_id: LessonId, title: impl Into<String>) -> Self {
        Self {
            id: ContentId::new(),
            title: title.into(),
            order: 0,
            lesson_id,
            description: None,
            metadata: Map::new(),
            estimated_minutes: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_id(mut self, id: ContentId) -> Self {
        self.id = id;
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_estimated_minutes(mut self, minutes: u32) -> Self {
        self.estimated_minutes = Some(minutes);
        self
    }

    pub fn with_timestamps(
        mut self,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }
}

/// One learning item belonging to a lesson.
///
/// The type tag is either a built-in tag matching the payload or a custom
/// tag registered with the
/// [`ContentTypeRegistry`](crate::registry::ContentTypeRegistry), which
/// binds it to a payload shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentUnit {
    header: ContentHeader,
    content_type: String,
    body: ContentBody,
}

impl ContentUnit {
    /// Create a unit tagged with the payload's built-in type.
    pub fn new(header: ContentHeader, body: impl Into<ContentBody>) -> Self {
        let body = body.into();
        Self {
            content_type: body.kind().as_str().to_string(),
            header,
            body,
        }
    }

    /// Create a unit with an explicit type tag.
    ///
    /// A built-in tag must name the payload's own shape. Custom tags are
    /// accepted here and checked against their descriptor at validation time.
    pub fn with_type(
        content_type: impl Into<String>,
        header: ContentHeader,
        body: impl Into<ContentBody>,
    ) -> Result<Self, ValidationError> {
        let content_type = content_type.into();
        let body = body.into();
        if content_type.trim().is_empty() {
            return Err(ValidationError::EmptyTag);
        }
        if let Some(tagged) = ContentKind::parse(&content_type)
            && tagged != body.kind()
        {
            return Err(ValidationError::TagMismatch {
                tag: content_type,
                kind: body.kind(),
            });
        }
        Ok(Self {
            header,
            content_type,
            body,
        })
    }

    pub fn header(&self) -> &ContentHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut ContentHeader {
        &mut self.header
    }

    pub fn id(&self) -> ContentId {
        self.header.id
    }

    pub fn title(&self) -> &str {
        &self.header.title
    }

    pub fn lesson_id(&self) -> LessonId {
        self.header.lesson_id
    }

    /// The registry tag this unit was created under.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn body(&self) -> &ContentBody {
        &self.body
    }

    /// The payload shape.
    pub fn kind(&self) -> ContentKind {
        self.body.kind()
    }

    pub fn as_assessment(&self) -> Option<&Assessment> {
        match &self.body {
            ContentBody::Assessment(assessment) => Some(assessment),
            _ => None,
        }
    }

    pub fn into_parts(self) -> (ContentHeader, String, ContentBody) {
        (self.header, self.content_type, self.body)
    }

    /// Creation date as "05 March 2024", or "N/A".
    pub fn formatted_created_date(&self) -> String {
        DateDisplay::default().render(self.header.created_at)
    }

    /// Last modification date as "05 March 2024", or "N/A".
    pub fn formatted_updated_date(&self) -> String {
        DateDisplay::default().render(self.header.updated_at)
    }

    pub fn formatted_created_date_with(&self, display: &DateDisplay) -> String {
        display.render(self.header.created_at)
    }

    pub fn formatted_updated_date_with(&self, display: &DateDisplay) -> String {
        display.render(self.header.updated_at)
    }
}
