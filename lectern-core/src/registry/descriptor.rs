//! Content type descriptors

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::schema::MetadataSchema;
use crate::content::{ContentKind, ContentUnit};

/// Type-specific validation hook. Returns one message per problem found.
pub type ContentValidator = Arc<dyn Fn(&ContentUnit) -> Vec<String> + Send + Sync>;

/// Presentation metadata for a content type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayMeta {
    pub display_name: String,
    pub description: String,
    /// Icon name understood by the presentation layer
    pub icon: Option<String>,
}

impl DisplayMeta {
    pub fn new(display_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            description: description.into(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// Registration entry for one content type
#[derive(Clone)]
pub struct ContentTypeDescriptor {
    /// Unique key, also the tag stored on records
    pub name: String,
    pub display: DisplayMeta,
    /// Payload shape units of this type carry
    pub shape: ContentKind,
    pub metadata_schema: Option<MetadataSchema>,
    /// Types this one may be nested under; `None` means anywhere
    pub allowed_parents: Option<Vec<String>>,
    pub validator: Option<ContentValidator>,
}

impl ContentTypeDescriptor {
    pub fn new(name: impl Into<String>, shape: ContentKind, display: DisplayMeta) -> Self {
        Self {
            name: name.into(),
            display,
            shape,
            metadata_schema: None,
            allowed_parents: None,
            validator: None,
        }
    }

    pub fn with_metadata_schema(mut self, schema: MetadataSchema) -> Self {
        self.metadata_schema = Some(schema);
        self
    }

    pub fn with_allowed_parents(mut self, parents: Vec<String>) -> Self {
        self.allowed_parents = Some(parents);
        self
    }

    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&ContentUnit) -> Vec<String> + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }
}

impl fmt::Debug for ContentTypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentTypeDescriptor")
            .field("name", &self.name)
            .field("display", &self.display)
            .field("shape", &self.shape)
            .field("metadata_schema", &self.metadata_schema)
            .field("allowed_parents", &self.allowed_parents)
            .field("validator", &self.validator.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Row of the content type picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentTypeSummary {
    #[serde(rename = "type")]
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub icon: Option<String>,
}

impl From<&ContentTypeDescriptor> for ContentTypeSummary {
    fn from(descriptor: &ContentTypeDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            display_name: descriptor.display.display_name.clone(),
            description: descriptor.display.description.clone(),
            icon: descriptor.display.icon.clone(),
        }
    }
}
