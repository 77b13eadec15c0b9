//! Content type registry
//!
//! Maps a content-type tag to the payload shape it carries, its display
//! metadata, an optional metadata schema and optional extra validation.
//! The six built-in types are always present. Hosts register custom types
//! during startup and then share the registry behind an `Arc`.

mod descriptor;
mod error;
mod schema;
mod validators;

pub use descriptor::{ContentTypeDescriptor, ContentTypeSummary, ContentValidator, DisplayMeta};
pub use error::RegistryError;
pub use schema::{MetadataSchema, PropertyKind, PropertySchema};

use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::content::{ContentKind, ContentUnit};

/// Registry of content types known to the platform
pub struct ContentTypeRegistry {
    types: HashMap<String, ContentTypeDescriptor>,
}

impl ContentTypeRegistry {
    /// Create a registry holding the built-in types
    pub fn new() -> Self {
        let types = builtin_descriptors()
            .into_iter()
            .map(|d| (d.name.clone(), d))
            .collect();
        Self { types }
    }

    /// Whether `name` is one of the built-in types that cannot be removed
    pub fn is_protected(name: &str) -> bool {
        ContentKind::parse(name).is_some()
    }

    /// Register a custom content type
    pub fn register(&mut self, descriptor: ContentTypeDescriptor) -> Result<(), RegistryError> {
        let name = descriptor.name.clone();
        if let Err(e) = self.check_registration(&descriptor) {
            warn!(content_type = %name, error = %e, "Content type registration rejected");
            return Err(e);
        }
        debug!(content_type = %name, shape = %descriptor.shape, "Registering content type");
        self.types.insert(name.clone(), descriptor);
        info!(content_type = %name, "Content type registered");
        Ok(())
    }

    fn check_registration(&self, descriptor: &ContentTypeDescriptor) -> Result<(), RegistryError> {
        let name = &descriptor.name;
        if !is_valid_name(name) {
            return Err(RegistryError::InvalidName { name: name.clone() });
        }
        if self.types.contains_key(name) {
            return Err(RegistryError::AlreadyRegistered { name: name.clone() });
        }
        if let Some(parent) = descriptor
            .allowed_parents
            .iter()
            .flatten()
            .find(|p| !self.types.contains_key(p.as_str()))
        {
            return Err(RegistryError::UnknownParent {
                name: name.clone(),
                parent: parent.clone(),
            });
        }
        Ok(())
    }

    /// Remove a custom content type, returning its descriptor
    pub fn unregister(&mut self, name: &str) -> Result<ContentTypeDescriptor, RegistryError> {
        if Self::is_protected(name) {
            warn!(content_type = %name, "Cannot unregister default content type");
            return Err(RegistryError::Protected {
                name: name.to_string(),
            });
        }
        match self.types.remove(name) {
            Some(descriptor) => {
                info!(content_type = %name, "Content type unregistered");
                Ok(descriptor)
            }
            None => {
                warn!(content_type = %name, "Content type is not registered");
                Err(RegistryError::NotFound {
                    name: name.to_string(),
                })
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&ContentTypeDescriptor> {
        self.types.get(name)
    }

    /// All registered descriptors, in no particular order
    pub fn list_all(&self) -> Vec<&ContentTypeDescriptor> {
        self.types.values().collect()
    }

    /// Resolve a tag to the payload shape it carries
    pub fn shape_of(&self, tag: &str) -> Option<ContentKind> {
        self.types.get(tag).map(|d| d.shape)
    }

    /// Whether a unit of type `child` may be placed under `parent`
    pub fn can_contain(&self, parent: &str, child: &str) -> bool {
        let Some(descriptor) = self.types.get(child) else {
            return false;
        };
        match &descriptor.allowed_parents {
            Some(parents) => parents.iter().any(|p| p == parent),
            None => true,
        }
    }

    /// Summaries for a type picker, sorted by type name
    pub fn content_types(&self) -> Vec<ContentTypeSummary> {
        let mut summaries: Vec<_> = self.types.values().map(ContentTypeSummary::from).collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        summaries
    }

    /// Validate a unit against its type, returning every problem found
    ///
    /// An unknown tag yields a single error and no further checks.
    pub fn validate(&self, unit: &ContentUnit) -> Vec<String> {
        let tag = unit.content_type();
        let Some(descriptor) = self.types.get(tag) else {
            return vec![format!("Unknown content type: {tag}")];
        };

        let mut errors = Vec::new();
        if unit.title().trim().is_empty() {
            errors.push("Title is required".to_string());
        }
        if descriptor.shape != unit.kind() {
            errors.push(format!(
                "Content type '{tag}' expects {} content, got {}",
                descriptor.shape,
                unit.kind()
            ));
        }
        errors.extend(validators::check_body(unit.body()));
        if let Some(validator) = &descriptor.validator {
            errors.extend(validator(unit));
        }
        if let Some(schema) = &descriptor.metadata_schema {
            errors.extend(schema.check(&unit.header().metadata));
        }

        if !errors.is_empty() {
            debug!(content_id = %unit.id(), content_type = %tag, count = errors.len(), "Content failed validation");
        }
        errors
    }
}

impl Default for ContentTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_lowercase()
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}

fn builtin_descriptors() -> Vec<ContentTypeDescriptor> {
    vec![
        ContentTypeDescriptor::new(
            "theory",
            ContentKind::Theory,
            DisplayMeta::new("Theory", "Theoretical material explaining concepts").with_icon("book"),
        )
        .with_metadata_schema(
            MetadataSchema::new()
                .string_array("keywords")
                .string("complexity", &["beginner", "intermediate", "advanced"]),
        ),
        ContentTypeDescriptor::new(
            "exercise",
            ContentKind::Exercise,
            DisplayMeta::new("Exercise", "Practice exercises for applying concepts")
                .with_icon("pencil"),
        )
        .with_metadata_schema(MetadataSchema::new().string("difficulty", &["easy", "medium", "hard"])),
        ContentTypeDescriptor::new(
            "quiz",
            ContentKind::Quiz,
            DisplayMeta::new("Quiz", "Multiple-choice or short-answer questions")
                .with_icon("question-circle"),
        )
        .with_metadata_schema(MetadataSchema::new().string(
            "quiz_type",
            &["multiple_choice", "short_answer", "mixed"],
        )),
        ContentTypeDescriptor::new(
            "assessment",
            ContentKind::Assessment,
            DisplayMeta::new("Assessment", "Formal assessment with scoring")
                .with_icon("clipboard-check"),
        )
        .with_metadata_schema(
            MetadataSchema::new()
                .string("grading_scale", &[])
                .boolean("is_timed"),
        ),
        ContentTypeDescriptor::new(
            "interactive",
            ContentKind::Interactive,
            DisplayMeta::new(
                "Interactive Activity",
                "Interactive elements like simulations or tools",
            )
            .with_icon("laptop-code"),
        )
        .with_metadata_schema(MetadataSchema::new().string(
            "interaction_type",
            &["simulation", "tool", "game", "visualization"],
        )),
        ContentTypeDescriptor::new(
            "resource",
            ContentKind::Resource,
            DisplayMeta::new("Resource", "External resources like links or files")
                .with_icon("link"),
        )
        .with_metadata_schema(MetadataSchema::new().string(
            "resource_type",
            &["link", "pdf", "video", "audio", "other"],
        )),
    ]
}
