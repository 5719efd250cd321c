//! Light schema checks applied after merge and before persist.
//!
//! Full per-type field schemas live with an external collaborator; the
//! adapter only enforces the profile's required fields so that a sparse
//! patch cannot blank out what every listing must carry.

use serde_json::{Map, Value};

use super::error::FieldError;
use super::profile::ListingProfile;

pub trait ListingValidator: Send + Sync {
    /// Check `fields` against the profile's schema requirements.
    fn validate(&self, profile: &ListingProfile, fields: &Map<String, Value>)
        -> Result<(), Vec<FieldError>>;
}

/// Default validator: required fields must be present, non-null, and (for
/// strings) non-empty.
#[derive(Debug, Default)]
pub struct RequiredFieldsValidator;

impl ListingValidator for RequiredFieldsValidator {
    fn validate(
        &self,
        profile: &ListingProfile,
        fields: &Map<String, Value>,
    ) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        for field in &profile.required_fields {
            let valid = match fields.get(field) {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.trim().is_empty(),
                Some(_) => true,
            };
            if !valid {
                errors.push(FieldError::new(field, "is required"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
