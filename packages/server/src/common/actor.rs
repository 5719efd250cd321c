//! Caller identity as supplied by the authentication collaborator.
//!
//! Authentication itself lives outside this service; callers arrive with an
//! already-verified opaque actor id (or none at all, for public access).
//! Store adapters accept the optional id and decide per listing type
//! whether creator-match is enforced on mutation.

/// Identity of the caller performing a mutating operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id: String,
}

impl Actor {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
