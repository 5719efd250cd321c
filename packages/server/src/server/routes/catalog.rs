//! The cross-type browse endpoint backed by the catalog federator.

use axum::extract::{Extension, Query};
use axum::Json;
use serde::Deserialize;

use crate::common::PageArgs;
use crate::domains::catalog::{CatalogFilter, FederatedPage};
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub intent: Option<String>,
    pub category: Option<String>,
}

/// `GET /catalog?page=&limit=&intent=&category=` - one normalized page
/// across every listing store. Degraded sources are reported in
/// `per_source_errors` rather than failing the request.
pub async fn catalog_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<FederatedPage>, ApiError> {
    let filter = CatalogFilter {
        intent: query
            .intent
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(|_| ApiError::BadRequest("invalid intent filter".to_string()))?,
        category: query
            .category
            .as_deref()
            .map(str::parse)
            .transpose()
            .map_err(|_| ApiError::BadRequest("invalid category filter".to_string()))?,
    };

    let page = PageArgs {
        page: query.page,
        limit: query.limit,
    }
    .validate();

    Ok(Json(state.federator.browse(&page, &filter).await))
}
