//! Application setup and router wiring.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, HeaderName, Method},
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domains::catalog::{CatalogFederator, StoreRegistry};
use crate::domains::listings::builtin_profiles;
use crate::kernel::DocumentStore;
use crate::server::middleware::actor_middleware;
use crate::server::routes::{
    catalog_handler, create_listing, delete_listing, get_listing, health_handler, list_listings,
    update_listing,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub registry: Arc<StoreRegistry>,
    pub federator: Arc<CatalogFederator>,
}

/// Build the Axum application router.
///
/// The store registry is assembled once from the builtin profile table and
/// stays read-only for the life of the process.
pub fn build_app(store: Arc<dyn DocumentStore>, federation_timeout: Duration) -> Router {
    let registry = Arc::new(StoreRegistry::from_profiles(
        builtin_profiles(),
        store.clone(),
    ));
    let federator = Arc::new(CatalogFederator::new(registry.clone(), federation_timeout));

    let state = AppState {
        store,
        registry,
        federator,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-actor-id")]);

    // Static routes are matched before the dynamic listing-type segment
    Router::new()
        .route("/health", get(health_handler))
        .route("/catalog", get(catalog_handler))
        .route("/:listing_type", get(list_listings).post(create_listing))
        .route(
            "/:listing_type/:id",
            get(get_listing).put(update_listing).delete(delete_listing),
        )
        .layer(axum::middleware::from_fn(actor_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(state))
}
