// Infrastructure: the document-store abstraction and its backends.

pub mod docstore;
pub mod memory;
pub mod mongo;

pub use docstore::{DocumentStore, FieldMatch, Filter, SortSpec, StoreError};
pub use memory::MemoryStore;
pub use mongo::MongoStore;
