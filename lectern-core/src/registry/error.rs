//! Registry error types

use thiserror::Error;

/// Errors that can occur while registering or removing content types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A type with this name already exists
    #[error("Content type '{name}' is already registered")]
    AlreadyRegistered { name: String },

    /// Names must be lowercase identifiers
    #[error("Invalid content type name '{name}'")]
    InvalidName { name: String },

    /// An allowed parent type is not registered
    #[error("Content type '{name}' names unknown parent type '{parent}'")]
    UnknownParent { name: String, parent: String },

    /// No type with this name exists
    #[error("Content type '{name}' is not registered")]
    NotFound { name: String },

    /// Built-in types cannot be removed
    #[error("Cannot unregister default content type '{name}'")]
    Protected { name: String },
}
