//! Service-level error types

use thiserror::Error;

use crate::convert::ConversionError;
use crate::store::StoreError;
use crate::types::ContentId;

/// Errors returned by [`ContentService`](crate::service::ContentService)
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Content failed validation: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("Content not found: {0}")]
    NotFound(ContentId),

    #[error("Stored content could not be read back: {0}")]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
