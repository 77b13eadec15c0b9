//! lectern-core - Content model for the lectern learning platform
//!
//! This crate defines the learning units a lesson is made of, the registry
//! of content types that validates them, and the conversion between units
//! and the generic records a storage backend persists.

pub mod content;
pub mod convert;
pub mod error;
pub mod registry;
pub mod service;
pub mod store;
pub mod types;

pub use content::{
    AnswerModality, Assessment, ContentBody, ContentHeader, ContentKind, ContentUnit, DateDisplay,
    Exercise, Feedback, Interactive, Question, Quiz, Resource, Theory, ValidationError,
};
pub use convert::{ContentConverter, ContentRecord, ConversionError, NewContentRecord};
pub use error::ContentError;
pub use registry::{
    ContentTypeDescriptor, ContentTypeRegistry, ContentTypeSummary, DisplayMeta, MetadataSchema,
    RegistryError,
};
pub use service::ContentService;
pub use store::{ContentRecordStore, MemoryContentStore, StoreError};
pub use types::*;
