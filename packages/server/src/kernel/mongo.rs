//! MongoDB-backed document store.

use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Database, IndexModel};
use serde_json::Value;
use tracing::{info, warn};

use async_trait::async_trait;

use super::docstore::{DocumentStore, FieldMatch, Filter, SortSpec, StoreError};

/// MongoDB client wrapper implementing [`DocumentStore`].
#[derive(Clone)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Connect and verify the connection with a ping.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, StoreError> {
        info!("Connecting to MongoDB");

        // Bound server selection so an unreachable MongoDB fails fast
        let timeout_uri = if uri.contains('?') {
            format!("{uri}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000")
        } else {
            format!("{uri}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000")
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| StoreError::Backend(format!("failed to connect to MongoDB: {e}")))?;

        let database = client.database(db_name);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Backend(format!("MongoDB ping failed: {e}")))?;

        info!(database = db_name, "Connected to MongoDB");

        Ok(Self { database })
    }

    /// Create the unique `property_id` index on every listing collection.
    /// Identifier allocation relies on this constraint to reject the rare
    /// race the double-check misses.
    pub async fn ensure_indexes(&self, collections: &[String]) -> Result<(), StoreError> {
        for name in collections {
            let options = IndexOptions::builder().unique(true).build();
            let model = IndexModel::builder()
                .keys(doc! { "property_id": 1 })
                .options(options)
                .build();

            self.database
                .collection::<Document>(name)
                .create_index(model)
                .await
                .map_err(|e| {
                    StoreError::Backend(format!("failed to create index on '{name}': {e}"))
                })?;
        }
        Ok(())
    }

    fn collection(&self, name: &str) -> mongodb::Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

fn to_document(value: &Value) -> Result<Document, StoreError> {
    bson::to_document(value).map_err(|e| StoreError::Malformed(e.to_string()))
}

fn from_document(mut document: Document) -> Result<Value, StoreError> {
    // `_id` is MongoDB's own identity; documents carry ours in `id`.
    document.remove("_id");
    bson::from_document(document).map_err(|e| StoreError::Malformed(e.to_string()))
}

fn filter_to_document(filter: &Filter) -> Result<Document, StoreError> {
    let mut document = Document::new();
    for (field, condition) in filter.clauses() {
        match condition {
            FieldMatch::Eq(value) => {
                let value =
                    bson::to_bson(value).map_err(|e| StoreError::Malformed(e.to_string()))?;
                document.insert(field, value);
            }
            FieldMatch::Regex(pattern) => {
                document.insert(field, doc! { "$regex": pattern });
            }
        }
    }
    Ok(document)
}

fn sort_to_document(sort: &SortSpec) -> Document {
    let mut document = Document::new();
    document.insert(&sort.field, if sort.descending { -1 } else { 1 });
    document
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};
    matches!(
        &*error.kind,
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Backend(format!("ping failed: {e}")))
    }

    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        self.collection(collection)
            .find_one(doc! { "id": id })
            .await
            .map_err(|e| StoreError::Backend(format!("find failed: {e}")))?
            .map(from_document)
            .transpose()
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> Result<Option<Value>, StoreError> {
        self.collection(collection)
            .find_one(filter_to_document(filter)?)
            .await
            .map_err(|e| StoreError::Backend(format!("find failed: {e}")))?
            .map(from_document)
            .transpose()
    }

    async fn find_page(
        &self,
        collection: &str,
        filter: &Filter,
        sort: Option<&SortSpec>,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Value>, StoreError> {
        let coll = self.collection(collection);
        let mut find = coll
            .find(filter_to_document(filter)?)
            .skip(skip)
            .limit(limit);
        if let Some(spec) = sort {
            find = find.sort(sort_to_document(spec));
        }

        let documents: Vec<Document> = find
            .await
            .map_err(|e| StoreError::Backend(format!("find failed: {e}")))?
            .try_collect()
            .await
            .map_err(|e| StoreError::Backend(format!("cursor failed: {e}")))?;

        let mut values = Vec::with_capacity(documents.len());
        for document in documents {
            match from_document(document) {
                Ok(value) => values.push(value),
                // A single unreadable document must not poison the page
                Err(e) => warn!(collection, error = %e, "skipping malformed document"),
            }
        }
        Ok(values)
    }

    async fn insert(&self, collection: &str, document: Value) -> Result<(), StoreError> {
        self.collection(collection)
            .insert_one(to_document(&document)?)
            .await
            .map(|_| ())
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    StoreError::Duplicate("property_id".to_string())
                } else {
                    StoreError::Backend(format!("insert failed: {e}"))
                }
            })
    }

    async fn replace_by_id(
        &self,
        collection: &str,
        id: &str,
        document: Value,
    ) -> Result<Option<Value>, StoreError> {
        self.collection(collection)
            .find_one_and_replace(doc! { "id": id }, to_document(&document)?)
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| StoreError::Backend(format!("replace failed: {e}")))?
            .map(from_document)
            .transpose()
    }

    async fn delete_by_id(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let result = self
            .collection(collection)
            .delete_one(doc! { "id": id })
            .await
            .map_err(|e| StoreError::Backend(format!("delete failed: {e}")))?;
        Ok(result.deleted_count > 0)
    }
}
