//! Read-only registry of listing store adapters, assembled once at
//! startup. The federator and the HTTP layer depend only on this and the
//! [`ListingStore`] contract.

use std::sync::Arc;

use crate::domains::listings::{DocListingStore, ListingProfile, ListingStore};
use crate::kernel::DocumentStore;

use super::federator::CatalogFilter;

pub struct StoreRegistry {
    stores: Vec<Arc<dyn ListingStore>>,
}

impl StoreRegistry {
    pub fn new(stores: Vec<Arc<dyn ListingStore>>) -> Self {
        Self { stores }
    }

    /// Build one generic adapter per profile over the shared document
    /// store.
    pub fn from_profiles(
        profiles: Vec<ListingProfile>,
        store: Arc<dyn DocumentStore>,
    ) -> Self {
        let stores = profiles
            .into_iter()
            .map(|profile| {
                Arc::new(DocListingStore::new(profile, store.clone())) as Arc<dyn ListingStore>
            })
            .collect();
        Self::new(stores)
    }

    /// Look up one adapter by its stable source name.
    pub fn get(&self, source_name: &str) -> Option<Arc<dyn ListingStore>> {
        self.stores
            .iter()
            .find(|store| store.source_name() == source_name)
            .cloned()
    }

    /// All adapters, in registration order.
    pub fn all(&self) -> &[Arc<dyn ListingStore>] {
        &self.stores
    }

    /// Adapters matching the browse filter, in registration order.
    pub fn select(&self, filter: &CatalogFilter) -> Vec<Arc<dyn ListingStore>> {
        self.stores
            .iter()
            .filter(|store| {
                let profile = store.profile();
                filter.intent.map_or(true, |intent| profile.intent == intent)
                    && filter
                        .category
                        .map_or(true, |category| profile.category == category)
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }
}
