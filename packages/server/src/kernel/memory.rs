//! In-process document store.
//!
//! Backs tests and `MONGODB_URI`-less local development with the same
//! contract the MongoDB store provides, including the unique `property_id`
//! constraint per collection.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tokio::sync::RwLock;

use super::docstore::{DocumentStore, FieldMatch, Filter, SortSpec, StoreError};

/// Field every listing collection keeps unique, mirroring the index the
/// MongoDB store creates at startup.
const UNIQUE_FIELD: &str = "property_id";

/// Mutex-guarded map of collection name to stored documents, in insertion
/// order.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(document: &Value, filter: &Filter) -> Result<bool, StoreError> {
    for (field, condition) in filter.clauses() {
        let value = document.get(field);
        let matched = match condition {
            FieldMatch::Eq(expected) => value == Some(expected),
            FieldMatch::Regex(pattern) => {
                let regex = Regex::new(pattern)
                    .map_err(|e| StoreError::Backend(format!("invalid regex filter: {e}")))?;
                value
                    .and_then(Value::as_str)
                    .is_some_and(|s| regex.is_match(s))
            }
        };
        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Field-level ordering: strings lexicographically, numbers numerically,
/// missing/other values last.
fn compare_fields(a: &Value, b: &Value, field: &str) -> Ordering {
    match (a.get(field), b.get(field)) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        self.find_one(collection, &Filter::new().eq("id", Value::String(id.to_string())))
            .await
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(None);
        };
        for document in documents {
            if matches(document, filter)? {
                return Ok(Some(document.clone()));
            }
        }
        Ok(None)
    }

    async fn find_page(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&SortSpec>,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut selected = Vec::new();
        for document in documents {
            if matches(document, filter)? {
                selected.push(document.clone());
            }
        }

        if let Some(spec) = sort {
            selected.sort_by(|a, b| {
                let ordering = compare_fields(a, b, &spec.field);
                if spec.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        Ok(selected
            .into_iter()
            .skip(skip as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn insert(&self, collection: &str, document: Value) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        if let Some(unique_value) = document.get(UNIQUE_FIELD) {
            let taken = documents
                .iter()
                .any(|existing| existing.get(UNIQUE_FIELD) == Some(unique_value));
            if taken {
                return Err(StoreError::Duplicate(UNIQUE_FIELD.to_string()));
            }
        }

        documents.push(document);
        Ok(())
    }

    async fn replace_by_id(
        &self,
        collection: &str,
        id: &str,
        document: Value,
    ) -> Result<Option<Value>, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(None);
        };
        let id_value = Value::String(id.to_string());
        for existing in documents.iter_mut() {
            if existing.get("id") == Some(&id_value) {
                *existing = document.clone();
                return Ok(Some(document));
            }
        }
        Ok(None)
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let id_value = Value::String(id.to_string());
        let before = documents.len();
        documents.retain(|existing| existing.get("id") != Some(&id_value));
        Ok(documents.len() < before)
    }
}
