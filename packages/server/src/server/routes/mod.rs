pub mod catalog;
pub mod health;
pub mod listings;

pub use catalog::catalog_handler;
pub use health::health_handler;
pub use listings::{
    create_listing, delete_listing, get_listing, list_listings, update_listing,
};
