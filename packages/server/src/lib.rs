// Realty Exchange - API Core
//
// This crate provides the backend API for the property-listing marketplace.
// Every listing type shares one generic store adapter over an abstract
// document store; the catalog federator composes all stores into one
// normalized browse feed.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
