//! Actor identity middleware.
//!
//! The authentication collaborator in front of this service verifies the
//! caller and forwards the resulting opaque actor id in the `x-actor-id`
//! header. Requests without the header continue as public access; the
//! store adapters decide per listing type whether a mutation requires a
//! matching creator.

use axum::{middleware::Next, response::Response};
use tracing::debug;

use crate::common::Actor;

pub const ACTOR_HEADER: &str = "x-actor-id";

/// Extract the actor id header, if any, and add [`Actor`] to request
/// extensions.
pub async fn actor_middleware(
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if let Some(actor) = extract_actor(&request) {
        debug!(actor = %actor.id, "request carries actor identity");
        request.extensions_mut().insert(actor);
    }
    next.run(request).await
}

fn extract_actor(request: &axum::http::Request<axum::body::Body>) -> Option<Actor> {
    let header = request.headers().get(ACTOR_HEADER)?;
    let id = header.to_str().ok()?.trim();
    if id.is_empty() {
        return None;
    }
    Some(Actor::new(id))
}
