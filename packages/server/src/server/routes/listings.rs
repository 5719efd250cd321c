//! Single-store CRUD endpoints. Every handler resolves the store adapter
//! from the URL's listing-type segment; no endpoint is written per type.

use std::sync::Arc;

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{Actor, PageArgs};
use crate::domains::listings::{ListingError, ListingId, ListingRecord, ListingStore};
use crate::kernel::Filter;
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// One page of records from a single listing-type store.
#[derive(Serialize)]
pub struct ListingPage {
    pub items: Vec<ListingRecord>,
    pub page: i64,
    pub limit: i64,
    pub has_more: bool,
}

/// Update request body: `{ "data": <patch> }`.
#[derive(Deserialize)]
pub struct UpdateBody {
    pub data: Option<Value>,
}

fn resolve(state: &AppState, listing_type: &str) -> Result<Arc<dyn ListingStore>, ApiError> {
    state
        .registry
        .get(listing_type)
        .ok_or_else(|| ListingError::UnknownType(listing_type.to_string()).into())
}

fn actor_id(actor: &Option<Extension<Actor>>) -> Option<&str> {
    actor.as_ref().map(|Extension(actor)| actor.id.as_str())
}

/// `POST /{listing_type}` - create a listing from type-specific fields.
pub async fn create_listing(
    Extension(state): Extension<AppState>,
    Path(listing_type): Path<String>,
    actor: Option<Extension<Actor>>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<ListingRecord>), ApiError> {
    let store = resolve(&state, &listing_type)?;
    let fields = body
        .as_object()
        .cloned()
        .ok_or_else(|| ApiError::BadRequest("request body must be a JSON object".to_string()))?;

    let record = store.create(fields, actor_id(&actor)).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /{listing_type}?page=&limit=` - list within one type.
pub async fn list_listings(
    Extension(state): Extension<AppState>,
    Path(listing_type): Path<String>,
    Query(page_args): Query<PageArgs>,
) -> Result<Json<ListingPage>, ApiError> {
    let store = resolve(&state, &listing_type)?;
    let page = page_args.validate();

    let (items, has_more) = store.find_page(Filter::new(), &page).await?;
    Ok(Json(ListingPage {
        items,
        page: page.page,
        limit: page.limit,
        has_more,
    }))
}

/// `GET /{listing_type}/{property_id}` - fetch one by its human-readable
/// identifier.
pub async fn get_listing(
    Extension(state): Extension<AppState>,
    Path((listing_type, property_id)): Path<(String, String)>,
) -> Result<Json<ListingRecord>, ApiError> {
    let store = resolve(&state, &listing_type)?;

    let lookup = Filter::new().eq("property_id", Value::String(property_id));
    let one = PageArgs {
        page: Some(1),
        limit: Some(1),
    }
    .validate();

    let (records, _) = store.find_page(lookup, &one).await?;
    let record = records
        .into_iter()
        .next()
        .ok_or(ListingError::NotFound)
        .map_err(ApiError::from)?;
    Ok(Json(record))
}

/// `PUT /{listing_type}/{id}` - apply a partial update.
pub async fn update_listing(
    Extension(state): Extension<AppState>,
    Path((listing_type, id)): Path<(String, String)>,
    actor: Option<Extension<Actor>>,
    Json(body): Json<UpdateBody>,
) -> Result<Json<ListingRecord>, ApiError> {
    let store = resolve(&state, &listing_type)?;
    let id = parse_id(&id)?;
    let patch = body
        .data
        .ok_or_else(|| ApiError::from(ListingError::InvalidPatch))?;

    let record = store.update(id, &patch, actor_id(&actor)).await?;
    Ok(Json(record))
}

/// `DELETE /{listing_type}/{id}` - delete one listing.
pub async fn delete_listing(
    Extension(state): Extension<AppState>,
    Path((listing_type, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let store = resolve(&state, &listing_type)?;
    let id = parse_id(&id)?;

    store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> Result<ListingId, ApiError> {
    ListingId::parse(raw).map_err(|_| ApiError::BadRequest(format!("invalid listing id: {raw}")))
}
