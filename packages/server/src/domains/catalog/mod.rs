// Catalog domain: the cross-type browse surface. A read-only registry of
// store adapters, a total normalizer, and the federator that fans one
// browse request out to every store.

pub mod federator;
pub mod normalizer;
pub mod registry;

pub use federator::{CatalogFederator, CatalogFilter, FederatedPage, SourceError, SourceErrorKind};
pub use normalizer::{normalize, NormalizedSummary, RoomCounts};
pub use registry::StoreRegistry;
