//! Human-readable identifier allocation.
//!
//! Identifiers are `prefix + zero-padded sequence` (`RA-COMSEOS0042`). The
//! allocator scans the store for the highest existing identifier under the
//! prefix and claims the next sequence, double-checking the rendered
//! candidate for a concurrent or out-of-band claim before handing it out.
//! There is no counter table; gaps from retried collisions are acceptable,
//! external-facing duplicates are not. The store's unique `property_id`
//! index backstops the remaining race window at insert time.

use chrono::Utc;
use serde_json::Value;
use tracing::warn;

use crate::kernel::{DocumentStore, Filter, SortSpec, StoreError};

use super::error::ListingError;

/// Sequences are zero-padded to this width; wider sequences keep their
/// natural width (9999 is followed by 10000).
pub const ID_PAD_WIDTH: usize = 4;

/// Full scan restarts after the per-scan double-check fails twice.
const SCAN_RESTARTS: usize = 2;

/// Candidate checks per scan: the rendered candidate, then one increment.
const CHECKS_PER_SCAN: usize = 2;

/// An allocated listing identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyIdentifier {
    pub prefix: String,
    pub sequence: u64,
    pub rendered: String,
}

impl PropertyIdentifier {
    fn sequential(prefix: &str, sequence: u64) -> Self {
        Self {
            prefix: prefix.to_string(),
            sequence,
            rendered: format!("{prefix}{sequence:0width$}", width = ID_PAD_WIDTH),
        }
    }
}

/// Allocate the next identifier under `prefix` in `collection`.
///
/// Store failures never block a create: the allocator degrades to a
/// timestamp-derived identifier (`prefix` + last 8 digits of epoch
/// millis). [`ListingError::AllocationExhausted`] is returned only when
/// every bounded collision retry lost the race, which the timestamp
/// fallback makes effectively unreachable in practice.
pub async fn allocate(
    store: &dyn DocumentStore,
    collection: &str,
    prefix: &str,
) -> Result<PropertyIdentifier, ListingError> {
    match scan_allocate(store, collection, prefix).await {
        Ok(Some(identifier)) => Ok(identifier),
        Ok(None) => Err(ListingError::AllocationExhausted(prefix.to_string())),
        Err(error) => {
            warn!(
                prefix,
                error = %error,
                "identifier scan failed, falling back to timestamp identifier"
            );
            Ok(timestamp_fallback(prefix))
        }
    }
}

async fn scan_allocate(
    store: &dyn DocumentStore,
    collection: &str,
    prefix: &str,
) -> Result<Option<PropertyIdentifier>, StoreError> {
    for _ in 0..=SCAN_RESTARTS {
        let mut sequence = next_sequence(store, collection, prefix).await?;

        for _ in 0..CHECKS_PER_SCAN {
            let candidate = PropertyIdentifier::sequential(prefix, sequence);
            let taken = store
                .find_one(
                    collection,
                    &Filter::new().eq("property_id", Value::String(candidate.rendered.clone())),
                )
                .await?
                .is_some();
            if !taken {
                return Ok(Some(candidate));
            }
            // Claimed concurrently or seeded out of band; try the next one
            sequence += 1;
        }
    }
    Ok(None)
}

/// Scan for the lexicographically highest `^prefix\d+$` identifier and
/// return its successor, or 1 for a store with no identifiers under the
/// prefix yet.
async fn next_sequence(
    store: &dyn DocumentStore,
    collection: &str,
    prefix: &str,
) -> Result<u64, StoreError> {
    let pattern = format!("^{}\\d+$", regex::escape(prefix));
    let page = store
        .find_page(
            collection,
            &Filter::new().regex("property_id", pattern),
            Some(&SortSpec::desc("property_id")),
            0,
            1,
        )
        .await?;

    Ok(page
        .first()
        .and_then(|document| document.get("property_id"))
        .and_then(Value::as_str)
        .and_then(|rendered| rendered.strip_prefix(prefix))
        .and_then(|suffix| suffix.parse::<u64>().ok())
        .map(|highest| highest + 1)
        .unwrap_or(1))
}

fn timestamp_fallback(prefix: &str) -> PropertyIdentifier {
    let sequence = Utc::now().timestamp_millis().unsigned_abs() % 100_000_000;
    PropertyIdentifier {
        prefix: prefix.to_string(),
        sequence,
        rendered: format!("{prefix}{sequence:08}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::MemoryStore;
    use async_trait::async_trait;
    use serde_json::json;

    const COLLECTION: &str = "sell_commercial_office_space";
    const PREFIX: &str = "RA-COMSEOS";

    async fn seed(store: &MemoryStore, property_id: &str) {
        store
            .insert(
                COLLECTION,
                json!({"id": property_id.to_lowercase(), "property_id": property_id}),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_allocation_sequence_with_out_of_band_seed() {
        let store = MemoryStore::new();

        let first = allocate(&store, COLLECTION, PREFIX).await.unwrap();
        assert_eq!(first.rendered, "RA-COMSEOS0001");
        seed(&store, &first.rendered).await;

        let second = allocate(&store, COLLECTION, PREFIX).await.unwrap();
        assert_eq!(second.rendered, "RA-COMSEOS0002");

        // Someone claims 0002 out of band before it is inserted
        seed(&store, "RA-COMSEOS0002").await;

        let third = allocate(&store, COLLECTION, PREFIX).await.unwrap();
        assert_eq!(third.rendered, "RA-COMSEOS0003");
    }

    #[tokio::test]
    async fn test_width_grows_past_9999_without_repadding() {
        let store = MemoryStore::new();
        seed(&store, "RA-COMSEOS9999").await;

        let next = allocate(&store, COLLECTION, PREFIX).await.unwrap();
        assert_eq!(next.sequence, 10000);
        assert_eq!(next.rendered, "RA-COMSEOS10000");
    }

    #[tokio::test]
    async fn test_foreign_prefixes_are_ignored() {
        let store = MemoryStore::new();
        seed(&store, "RA-COMSESH0042").await;
        store
            .insert(COLLECTION, json!({"id": "junk", "property_id": "RA-COMSEOSX"}))
            .await
            .unwrap();

        let next = allocate(&store, COLLECTION, PREFIX).await.unwrap();
        assert_eq!(next.rendered, "RA-COMSEOS0001");
    }

    /// Store whose highest-identifier scan lags behind reality, forcing the
    /// exact-match double-check to do the work.
    struct StaleScanStore {
        inner: MemoryStore,
        scan_result: Vec<Value>,
    }

    #[async_trait]
    impl DocumentStore for StaleScanStore {
        async fn ping(&self) -> Result<(), StoreError> {
            self.inner.ping().await
        }

        async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
            self.inner.find_by_id(collection, id).await
        }

        async fn find_one(
            &self,
            collection: &str,
            filter: &Filter,
        ) -> Result<Option<Value>, StoreError> {
            self.inner.find_one(collection, filter).await
        }

        async fn find_page(
            &self,
            _collection: &str,
            _filter: &Filter,
            _sort: Option<&SortSpec>,
            _skip: u64,
            _limit: i64,
        ) -> Result<Vec<Value>, StoreError> {
            Ok(self.scan_result.clone())
        }

        async fn insert(&self, collection: &str, document: Value) -> Result<(), StoreError> {
            self.inner.insert(collection, document).await
        }

        async fn replace_by_id(
            &self,
            collection: &str,
            id: &str,
            document: Value,
        ) -> Result<Option<Value>, StoreError> {
            self.inner.replace_by_id(collection, id, document).await
        }

        async fn delete_by_id(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
            self.inner.delete_by_id(collection, id).await
        }
    }

    #[tokio::test]
    async fn test_double_check_skips_past_stale_scan() {
        let inner = MemoryStore::new();
        for pid in ["RA-COMSEOS0001", "RA-COMSEOS0002"] {
            seed(&inner, pid).await;
        }
        // Scan still reports 0001 as the highest
        let store = StaleScanStore {
            scan_result: vec![json!({"id": "a", "property_id": "RA-COMSEOS0001"})],
            inner,
        };

        let next = allocate(&store, COLLECTION, PREFIX).await.unwrap();
        assert_eq!(next.rendered, "RA-COMSEOS0003");
    }

    #[tokio::test]
    async fn test_retries_are_bounded_when_every_candidate_collides() {
        let inner = MemoryStore::new();
        for pid in ["RA-COMSEOS0001", "RA-COMSEOS0002"] {
            seed(&inner, pid).await;
        }
        // Scan insists the store is empty, so every candidate collides
        let store = StaleScanStore {
            scan_result: Vec::new(),
            inner,
        };

        let result = allocate(&store, COLLECTION, PREFIX).await;
        assert!(matches!(result, Err(ListingError::AllocationExhausted(_))));
    }

    /// Store that is entirely unreachable.
    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn ping(&self) -> Result<(), StoreError> {
            Err(StoreError::Backend("down".to_string()))
        }

        async fn find_by_id(&self, _: &str, _: &str) -> Result<Option<Value>, StoreError> {
            Err(StoreError::Backend("down".to_string()))
        }

        async fn find_one(&self, _: &str, _: &Filter) -> Result<Option<Value>, StoreError> {
            Err(StoreError::Backend("down".to_string()))
        }

        async fn find_page(
            &self,
            _: &str,
            _: &Filter,
            _: Option<&SortSpec>,
            _: u64,
            _: i64,
        ) -> Result<Vec<Value>, StoreError> {
            Err(StoreError::Backend("down".to_string()))
        }

        async fn insert(&self, _: &str, _: Value) -> Result<(), StoreError> {
            Err(StoreError::Backend("down".to_string()))
        }

        async fn replace_by_id(&self, _: &str, _: &str, _: Value) -> Result<Option<Value>, StoreError> {
            Err(StoreError::Backend("down".to_string()))
        }

        async fn delete_by_id(&self, _: &str, _: &str) -> Result<bool, StoreError> {
            Err(StoreError::Backend("down".to_string()))
        }
    }

    #[tokio::test]
    async fn test_unreachable_store_falls_back_to_timestamp_identifier() {
        let identifier = allocate(&FailingStore, COLLECTION, PREFIX).await.unwrap();

        let suffix = identifier.rendered.strip_prefix(PREFIX).unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }
}
