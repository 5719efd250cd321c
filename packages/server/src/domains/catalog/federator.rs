//! The catalog federator: one browse request fanned out to every
//! registered store concurrently.
//!
//! Branch isolation is the point. A failing or slow store contributes an
//! entry in `per_source_errors` instead of items; the page composes from
//! whatever completed in time. The whole join is bounded by a single
//! timeout, and dropping the browse future drops every in-flight branch
//! with it (branches are joined unspawned).

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use tracing::warn;

use crate::common::ValidatedPageArgs;
use crate::domains::listings::{Category, Intent, ListingError, ListingRecord, ListingStore};
use crate::kernel::Filter;

use super::normalizer::{normalize, NormalizedSummary};
use super::registry::StoreRegistry;

/// Optional narrowing of a browse request. `None` means every store.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogFilter {
    pub intent: Option<Intent>,
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceErrorKind {
    /// The branch did not complete within the federation timeout.
    Timeout,
    /// The store reported a failure.
    Store,
}

/// Why one source contributed nothing to this page.
#[derive(Debug, Clone, Serialize)]
pub struct SourceError {
    pub kind: SourceErrorKind,
    pub message: String,
}

/// One composed browse page. `total_approx` is the sum of per-source
/// counts returned for this page, deliberately not an exact global count.
#[derive(Debug, Serialize)]
pub struct FederatedPage {
    pub items: Vec<NormalizedSummary>,
    pub page: i64,
    pub page_size: i64,
    pub total_approx: usize,
    pub per_source_errors: BTreeMap<String, SourceError>,
}

pub struct CatalogFederator {
    registry: Arc<StoreRegistry>,
    timeout: Duration,
}

impl CatalogFederator {
    pub fn new(registry: Arc<StoreRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    /// Compose one page across all selected stores.
    ///
    /// Always returns a page; degraded results carry the failing sources
    /// in `per_source_errors`.
    pub async fn browse(&self, page: &ValidatedPageArgs, filter: &CatalogFilter) -> FederatedPage {
        let stores = self.registry.select(filter);

        let branches = stores.into_iter().map(|store| {
            let page = *page;
            async move {
                let outcome =
                    tokio::time::timeout(self.timeout, store.find_page(Filter::new(), &page)).await;
                (store, outcome)
            }
        });

        let settled: Vec<(
            Arc<dyn ListingStore>,
            Result<Result<(Vec<ListingRecord>, bool), ListingError>, tokio::time::error::Elapsed>,
        )> = join_all(branches).await;

        let mut items = Vec::new();
        let mut total_approx = 0;
        let mut per_source_errors = BTreeMap::new();

        // Registration order, then each source's native order
        for (store, outcome) in settled {
            let source = store.source_name();
            match outcome {
                Ok(Ok((records, _has_more))) => {
                    total_approx += records.len();
                    items.extend(
                        records
                            .iter()
                            .map(|record| normalize(store.profile(), record)),
                    );
                }
                Ok(Err(error)) => {
                    warn!(source, error = %error, "catalog source failed");
                    per_source_errors.insert(
                        source.to_string(),
                        SourceError {
                            kind: SourceErrorKind::Store,
                            message: error.to_string(),
                        },
                    );
                }
                Err(_elapsed) => {
                    warn!(source, timeout_ms = self.timeout.as_millis() as u64, "catalog source timed out");
                    per_source_errors.insert(
                        source.to_string(),
                        SourceError {
                            kind: SourceErrorKind::Timeout,
                            message: format!(
                                "source did not respond within {}ms",
                                self.timeout.as_millis()
                            ),
                        },
                    );
                }
            }
        }

        items.truncate(page.limit as usize);

        FederatedPage {
            items,
            page: page.page,
            page_size: page.limit,
            total_approx,
            per_source_errors,
        }
    }
}
