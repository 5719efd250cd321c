use serde::Serialize;
use thiserror::Error;

use crate::kernel::StoreError;

/// One field that failed validation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by listing operations.
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("listing not found")]
    NotFound,

    #[error("unknown listing type: {0}")]
    UnknownType(String),

    #[error("update patch is missing or empty")]
    InvalidPatch,

    #[error("validation failed on {} field(s)", .0.len())]
    ValidationFailed(Vec<FieldError>),

    #[error("identifier allocation retries exhausted for prefix '{0}'")]
    AllocationExhausted(String),

    #[error("actor is not permitted to modify this listing")]
    Forbidden,

    #[error(transparent)]
    Store(#[from] StoreError),
}
