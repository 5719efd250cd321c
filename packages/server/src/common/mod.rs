// Common types and utilities shared across the application

pub mod actor;
pub mod id;
pub mod pagination;

pub use actor::Actor;
pub use id::Id;
pub use pagination::{trim_results, PageArgs, ValidatedPageArgs};
