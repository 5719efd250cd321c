//! Abstract document store consumed by every listing store adapter.
//!
//! The persistence technology is deliberately hidden behind this trait: the
//! rest of the crate only ever needs exact-match and regex queries,
//! sort-by-field, and by-id insert/replace/delete over schemaless JSON
//! documents. `MongoStore` backs it in production, `MemoryStore` in tests
//! and local development.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors surfaced by a document store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("duplicate value for unique field '{0}'")]
    Duplicate(String),

    /// The backend failed or is unreachable.
    #[error("document store unavailable: {0}")]
    Backend(String),

    /// A stored document could not be (de)serialized.
    #[error("malformed document: {0}")]
    Malformed(String),
}

/// Match condition for a single field.
#[derive(Debug, Clone)]
pub enum FieldMatch {
    /// Exact equality on the field value.
    Eq(Value),
    /// Regular-expression match on a string field.
    Regex(String),
}

/// Conjunction of per-field match conditions.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<(String, FieldMatch)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value` exactly.
    pub fn eq(mut self, field: impl Into<String>, value: Value) -> Self {
        self.clauses.push((field.into(), FieldMatch::Eq(value)));
        self
    }

    /// Require the string `field` to match `pattern`.
    pub fn regex(mut self, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.clauses
            .push((field.into(), FieldMatch::Regex(pattern.into())));
        self
    }

    pub fn clauses(&self) -> &[(String, FieldMatch)] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Sort order for a page query.
#[derive(Debug, Clone)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: false,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            descending: true,
        }
    }
}

/// Uniform contract over the persistence backend.
///
/// Documents are JSON objects carrying their identity in an `id` field;
/// listing documents additionally carry a `property_id` field on which each
/// collection enforces uniqueness.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Cheap connectivity check for health reporting.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Fetch a single document by its `id` field.
    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Fetch the first document matching `filter`.
    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>, StoreError>;

    /// Fetch a page of documents matching `filter`, optionally sorted.
    async fn find_page(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&SortSpec>,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Value>, StoreError>;

    /// Insert a document. Fails with [`StoreError::Duplicate`] when the
    /// collection's unique `property_id` constraint rejects it.
    async fn insert(&self, collection: &str, document: Value) -> Result<(), StoreError>;

    /// Replace the document with the given `id`, returning the updated
    /// document, or `None` when no such document exists.
    async fn replace_by_id(
        &self,
        collection: &str,
        id: &str,
        document: Value,
    ) -> Result<Option<Value>, StoreError>;

    /// Delete the document with the given `id`. Returns `false` when no
    /// such document exists.
    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<bool, StoreError>;
}
