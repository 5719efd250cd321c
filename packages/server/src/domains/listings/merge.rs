//! Partial-update merging.
//!
//! A patch is a sparse JSON object of the same shape as the listing's
//! type-specific fields. Merging is recursive for nested objects, while
//! **arrays replace wholesale** - a patch array is never element-wise
//! merged with the stored one. Scalars (including explicit `null`)
//! overwrite. Fields absent from the patch are left untouched.

use chrono::Utc;
use serde_json::{Map, Value};

use super::error::ListingError;
use super::model::ListingRecord;

/// Keys a client-supplied patch may never set: the record's internal
/// identity and revision marker, plus the envelope fields the adapter
/// owns. They are stripped before the merge begins.
pub const RESERVED_PATCH_KEYS: &[&str] = &[
    "id",
    "revision",
    "property_id",
    "created_at",
    "created_by",
    "updated_at",
];

/// Remove reserved keys from an incoming fields object.
pub(crate) fn strip_reserved(fields: &mut Map<String, Value>) {
    for key in RESERVED_PATCH_KEYS {
        fields.remove(*key);
    }
}

/// Apply `patch` onto a copy of `existing`.
///
/// Fails with [`ListingError::InvalidPatch`] when the patch is absent,
/// not an object, or empty. The merged record is not persisted here;
/// callers validate it against the store's schema first.
pub fn merge_patch(existing: &ListingRecord, patch: &Value) -> Result<ListingRecord, ListingError> {
    let patch = patch.as_object().ok_or(ListingError::InvalidPatch)?;
    if patch.is_empty() {
        return Err(ListingError::InvalidPatch);
    }

    let mut sanitized = patch.clone();
    strip_reserved(&mut sanitized);

    let mut merged = existing.clone();
    merge_object(&mut merged.fields, &sanitized);
    merged.updated_at = Utc::now();
    Ok(merged)
}

fn merge_object(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, patch_value) in patch {
        match (target.remove(key), patch_value) {
            // Nested objects merge recursively
            (Some(Value::Object(mut existing)), Value::Object(incoming)) => {
                merge_object(&mut existing, incoming);
                target.insert(key.clone(), Value::Object(existing));
            }
            // Everything else (scalars, arrays, type changes) overwrites
            (_, value) => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_with(fields: Value) -> ListingRecord {
        let Value::Object(fields) = fields else {
            panic!("fields must be an object");
        };
        ListingRecord::new("RA-COMSEOS0001".to_string(), Some("agent-1".to_string()), fields)
    }

    #[test]
    fn test_nested_merge() {
        let record = record_with(json!({"a": 1, "b": {"c": 2, "d": 3}}));
        let merged = merge_patch(&record, &json!({"b": {"c": 99}})).unwrap();
        assert_eq!(
            Value::Object(merged.fields),
            json!({"a": 1, "b": {"c": 99, "d": 3}})
        );
    }

    #[test]
    fn test_fields_absent_from_patch_are_untouched() {
        let record = record_with(json!({"title": "Office", "floor": 3, "address": {"city": "Pune"}}));
        let merged = merge_patch(&record, &json!({"floor": 4})).unwrap();
        assert_eq!(merged.fields["title"], "Office");
        assert_eq!(merged.fields["floor"], 4);
        assert_eq!(merged.fields["address"], json!({"city": "Pune"}));
    }

    #[test]
    fn test_arrays_replace_wholesale() {
        let record = record_with(json!({"photos": ["a.jpg", "b.jpg", "c.jpg"]}));
        let merged = merge_patch(&record, &json!({"photos": ["d.jpg"]})).unwrap();
        assert_eq!(merged.fields["photos"], json!(["d.jpg"]));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let record = record_with(json!({"a": 1, "b": {"c": 2, "d": [1, 2]}, "e": "x"}));
        let patch = json!({"b": {"c": 9, "d": [7]}, "e": null});

        let once = merge_patch(&record, &patch).unwrap();
        let twice = merge_patch(&once, &patch).unwrap();
        assert_eq!(once.fields, twice.fields);
    }

    #[test]
    fn test_null_overwrites() {
        let record = record_with(json!({"tldr": "short"}));
        let merged = merge_patch(&record, &json!({"tldr": null})).unwrap();
        assert_eq!(merged.fields["tldr"], Value::Null);
    }

    #[test]
    fn test_reserved_keys_are_stripped() {
        let record = record_with(json!({"title": "Office"}));
        let original_id = record.id;
        let merged = merge_patch(
            &record,
            &json!({
                "id": "11111111-1111-1111-1111-111111111111",
                "revision": 42,
                "property_id": "RA-HACKED0001",
                "title": "Renamed"
            }),
        )
        .unwrap();

        assert_eq!(merged.id, original_id);
        assert_eq!(merged.property_id, "RA-COMSEOS0001");
        assert_eq!(merged.fields["title"], "Renamed");
        assert!(!merged.fields.contains_key("revision"));
        assert!(!merged.fields.contains_key("property_id"));
    }

    #[test]
    fn test_empty_or_non_object_patch_rejected() {
        let record = record_with(json!({"title": "Office"}));
        assert!(matches!(
            merge_patch(&record, &json!({})),
            Err(ListingError::InvalidPatch)
        ));
        assert!(matches!(
            merge_patch(&record, &Value::Null),
            Err(ListingError::InvalidPatch)
        ));
        assert!(matches!(
            merge_patch(&record, &json!([1, 2])),
            Err(ListingError::InvalidPatch)
        ));
    }

    #[test]
    fn test_patch_of_only_reserved_keys_is_a_noop() {
        let record = record_with(json!({"title": "Office"}));
        let merged = merge_patch(&record, &json!({"revision": 7})).unwrap();
        assert_eq!(merged.fields, record.fields);
    }
}
