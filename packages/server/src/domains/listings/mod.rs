// Listings domain: the store adapter contract shared by every listing type,
// identifier allocation, partial updates, and the per-type profile table.

pub mod allocator;
pub mod error;
pub mod merge;
pub mod model;
pub mod profile;
pub mod store;
pub mod validate;

pub use allocator::{allocate, PropertyIdentifier};
pub use error::{FieldError, ListingError};
pub use merge::merge_patch;
pub use model::{ListingId, ListingRecord};
pub use profile::{builtin_profiles, Category, Intent, ListingProfile, SubType};
pub use store::{DocListingStore, ListingStore};
pub use validate::{ListingValidator, RequiredFieldsValidator};
