//! The store adapter contract and its one generic implementation.
//!
//! Every listing type is served by `DocListingStore` parameterized with its
//! profile; no per-type adapter code exists. The adapter owns the write
//! path: identifier allocation on create, patch merging on update,
//! validation before any persist, and the profile's creator-match policy.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{error, warn};

use crate::common::{trim_results, ValidatedPageArgs};
use crate::kernel::{DocumentStore, Filter, SortSpec, StoreError};

use super::allocator::allocate;
use super::error::ListingError;
use super::merge::{merge_patch, strip_reserved};
use super::model::{ListingId, ListingRecord};
use super::profile::ListingProfile;
use super::validate::{ListingValidator, RequiredFieldsValidator};

/// Attempts before giving up when the unique `property_id` index keeps
/// rejecting freshly allocated identifiers under concurrent creates.
const INSERT_RETRY_LIMIT: usize = 8;

/// Uniform contract over one listing-type store.
///
/// The federator depends only on this trait plus the shared identity and
/// creation-timestamp conventions; no adapter may assume another adapter's
/// schema.
#[async_trait]
pub trait ListingStore: Send + Sync {
    fn profile(&self) -> &ListingProfile;

    /// Stable identifier used for per-source error reporting and
    /// normalization dispatch.
    fn source_name(&self) -> &str {
        &self.profile().source_name
    }

    async fn find_by_id(&self, id: ListingId) -> Result<Option<ListingRecord>, ListingError>;

    /// Fetch one page of records plus a has-more flag, in the store's
    /// native order (newest first).
    async fn find_page(
        &self,
        filter: Filter,
        page: &ValidatedPageArgs,
    ) -> Result<(Vec<ListingRecord>, bool), ListingError>;

    /// Validate and insert a new record, allocating its `property_id`.
    async fn create(
        &self,
        fields: Map<String, Value>,
        actor: Option<&str>,
    ) -> Result<ListingRecord, ListingError>;

    /// Merge a patch onto the stored record, validate, and persist.
    async fn update(
        &self,
        id: ListingId,
        patch: &Value,
        actor: Option<&str>,
    ) -> Result<ListingRecord, ListingError>;

    async fn delete(&self, id: ListingId) -> Result<(), ListingError>;
}

/// Generic adapter over the abstract document store.
pub struct DocListingStore {
    profile: ListingProfile,
    store: Arc<dyn DocumentStore>,
    validator: Arc<dyn ListingValidator>,
}

impl DocListingStore {
    pub fn new(profile: ListingProfile, store: Arc<dyn DocumentStore>) -> Self {
        Self::with_validator(profile, store, Arc::new(RequiredFieldsValidator))
    }

    pub fn with_validator(
        profile: ListingProfile,
        store: Arc<dyn DocumentStore>,
        validator: Arc<dyn ListingValidator>,
    ) -> Self {
        Self {
            profile,
            store,
            validator,
        }
    }

    fn validate(&self, fields: &Map<String, Value>) -> Result<(), ListingError> {
        self.validator
            .validate(&self.profile, fields)
            .map_err(ListingError::ValidationFailed)
    }

    /// Apply the profile's creator-match policy. Records without a creator
    /// reference stay mutable by anyone.
    fn authorize_mutation(
        &self,
        record: &ListingRecord,
        actor: Option<&str>,
    ) -> Result<(), ListingError> {
        if !self.profile.enforce_creator_match {
            return Ok(());
        }
        match record.created_by.as_deref() {
            None => Ok(()),
            Some(owner) if actor == Some(owner) => Ok(()),
            Some(_) => Err(ListingError::Forbidden),
        }
    }
}

#[async_trait]
impl ListingStore for DocListingStore {
    fn profile(&self) -> &ListingProfile {
        &self.profile
    }

    async fn find_by_id(&self, id: ListingId) -> Result<Option<ListingRecord>, ListingError> {
        let document = self
            .store
            .find_by_id(&self.profile.collection, &id.to_string())
            .await?;
        Ok(document.map(ListingRecord::from_value).transpose()?)
    }

    async fn find_page(
        &self,
        filter: Filter,
        page: &ValidatedPageArgs,
    ) -> Result<(Vec<ListingRecord>, bool), ListingError> {
        let documents = self
            .store
            .find_page(
                &self.profile.collection,
                &filter,
                Some(&SortSpec::desc("created_at")),
                page.skip(),
                page.fetch_limit(),
            )
            .await?;

        let records: Vec<ListingRecord> = documents
            .into_iter()
            .filter_map(|document| match ListingRecord::from_value(document) {
                Ok(record) => Some(record),
                // One unreadable record must not take the page down
                Err(e) => {
                    warn!(source = %self.profile.source_name, error = %e, "skipping malformed record");
                    None
                }
            })
            .collect();

        Ok(trim_results(records, page.limit))
    }

    async fn create(
        &self,
        mut fields: Map<String, Value>,
        actor: Option<&str>,
    ) -> Result<ListingRecord, ListingError> {
        strip_reserved(&mut fields);
        self.validate(&fields)?;

        for _ in 0..INSERT_RETRY_LIMIT {
            let identifier =
                allocate(self.store.as_ref(), &self.profile.collection, &self.profile.id_prefix)
                    .await?;
            let record = ListingRecord::new(
                identifier.rendered,
                actor.map(str::to_string),
                fields.clone(),
            );

            match self
                .store
                .insert(&self.profile.collection, record.to_value()?)
                .await
            {
                Ok(()) => return Ok(record),
                // Lost the allocation race; scan again for a fresh identifier
                Err(StoreError::Duplicate(_)) => continue,
                Err(e) => return Err(e.into()),
            }
        }

        error!(
            source = %self.profile.source_name,
            "insert retries exhausted under identifier contention"
        );
        Err(ListingError::AllocationExhausted(
            self.profile.id_prefix.clone(),
        ))
    }

    async fn update(
        &self,
        id: ListingId,
        patch: &Value,
        actor: Option<&str>,
    ) -> Result<ListingRecord, ListingError> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or(ListingError::NotFound)?;

        self.authorize_mutation(&existing, actor)?;

        let merged = merge_patch(&existing, patch)?;
        self.validate(&merged.fields)?;

        let updated = self
            .store
            .replace_by_id(&self.profile.collection, &id.to_string(), merged.to_value()?)
            .await?
            // Deleted between read and write
            .ok_or(ListingError::NotFound)?;
        Ok(ListingRecord::from_value(updated)?)
    }

    async fn delete(&self, id: ListingId) -> Result<(), ListingError> {
        let deleted = self
            .store
            .delete_by_id(&self.profile.collection, &id.to_string())
            .await?;
        if deleted {
            Ok(())
        } else {
            Err(ListingError::NotFound)
        }
    }
}
