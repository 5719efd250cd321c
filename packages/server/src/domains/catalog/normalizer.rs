//! Projection of arbitrary listing records into the fixed browse shape.
//!
//! Normalization is total by design: per-type data is sparse and
//! inconsistent, and the catalog's value is resilience against that. Every
//! missing or malformed field maps to a documented default instead of an
//! error. Summaries are rebuilt on every read and never persisted.

use serde::Serialize;
use serde_json::Value;

use crate::domains::listings::{Category, ListingId, ListingProfile, ListingRecord, SubType};

/// Title used when a record carries none: the summary still has to render.
pub const UNNAMED_TITLE: &str = "Unnamed Property";

/// Field names tried, in order, for the summary title.
const TITLE_FIELDS: &[&str] = &["title", "property_name", "name"];

/// Field names tried, in order, for the headline size figure.
const SIZE_FIELDS: &[&str] = &["super_area", "carpet_area", "plot_area", "area", "size"];

/// Room counts surfaced on the browse card. All optional; commercial
/// sub-types typically carry none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoomCounts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balconies: Option<u64>,
}

/// Fixed-shape summary of one listing, independent of its store's schema.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedSummary {
    pub id: ListingId,
    pub property_id: String,
    pub title: String,
    pub category: Category,
    pub subtype: SubType,
    /// Headline size in the record's own unit; `None` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_metric: Option<f64>,
    pub room_counts: RoomCounts,
    /// First photo, when any; `None` otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    /// Source store the record came from.
    pub source: String,
}

/// Project `record` into the browse shape. Total: never fails, whatever
/// the record carries.
pub fn normalize(profile: &ListingProfile, record: &ListingRecord) -> NormalizedSummary {
    NormalizedSummary {
        id: record.id,
        property_id: record.property_id.clone(),
        title: title_of(record),
        category: profile.category,
        subtype: profile.subtype,
        size_metric: first_number(record, SIZE_FIELDS),
        room_counts: RoomCounts {
            bedrooms: first_count(record, &["bedrooms", "bhk"]),
            bathrooms: first_count(record, &["bathrooms"]),
            balconies: first_count(record, &["balconies"]),
        },
        cover_image_url: cover_photo(record),
        source: profile.source_name.clone(),
    }
}

fn title_of(record: &ListingRecord) -> String {
    TITLE_FIELDS
        .iter()
        .filter_map(|field| record.fields.get(*field))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|title| !title.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNNAMED_TITLE.to_string())
}

/// First usable numeric value among `fields`, accepting numbers encoded as
/// strings ("1200" or "1200.5").
fn first_number(record: &ListingRecord, fields: &[&str]) -> Option<f64> {
    fields
        .iter()
        .filter_map(|field| record.fields.get(*field))
        .find_map(as_number)
}

fn first_count(record: &ListingRecord, fields: &[&str]) -> Option<u64> {
    first_number(record, fields)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n as u64)
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// First photo out of `photos`/`images`, whether entries are bare URL
/// strings or `{ "url": ... }` objects.
fn cover_photo(record: &ListingRecord) -> Option<String> {
    ["photos", "images"]
        .iter()
        .filter_map(|field| record.fields.get(*field))
        .filter_map(Value::as_array)
        .flat_map(|photos| photos.first())
        .find_map(|photo| match photo {
            Value::String(url) if !url.is_empty() => Some(url.clone()),
            Value::Object(object) => object
                .get("url")
                .and_then(Value::as_str)
                .filter(|url| !url.is_empty())
                .map(str::to_string),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::listings::{Intent, SubType};
    use serde_json::{json, Map};

    fn profile() -> ListingProfile {
        ListingProfile::new(Intent::Sell, Category::Residential, SubType::Apartment)
    }

    fn record_with(fields: Value) -> ListingRecord {
        let fields: Map<String, Value> = fields.as_object().cloned().unwrap();
        ListingRecord::new("RA-RESSEAP0001".to_string(), None, fields)
    }

    #[test]
    fn test_full_record_normalizes() {
        let record = record_with(json!({
            "title": "Sunlit 2BHK",
            "super_area": 1180,
            "bedrooms": 2,
            "bathrooms": "2",
            "photos": [{"url": "https://cdn.example/p1.jpg"}, {"url": "https://cdn.example/p2.jpg"}]
        }));

        let summary = normalize(&profile(), &record);
        assert_eq!(summary.title, "Sunlit 2BHK");
        assert_eq!(summary.size_metric, Some(1180.0));
        assert_eq!(summary.room_counts.bedrooms, Some(2));
        assert_eq!(summary.room_counts.bathrooms, Some(2));
        assert_eq!(
            summary.cover_image_url.as_deref(),
            Some("https://cdn.example/p1.jpg")
        );
        assert_eq!(summary.source, "sell-residential-apartment");
    }

    #[test]
    fn test_sparse_record_gets_defaults() {
        let summary = normalize(&profile(), &record_with(json!({})));
        assert_eq!(summary.title, UNNAMED_TITLE);
        assert_eq!(summary.size_metric, None);
        assert_eq!(summary.room_counts, RoomCounts::default());
        assert_eq!(summary.cover_image_url, None);
    }

    #[test]
    fn test_malformed_fields_never_panic() {
        let summary = normalize(
            &profile(),
            &record_with(json!({
                "title": "   ",
                "super_area": {"value": 1200},
                "bedrooms": "a few",
                "photos": "not-an-array",
                "images": [null, "fallback.jpg"]
            })),
        );

        assert_eq!(summary.title, UNNAMED_TITLE);
        assert_eq!(summary.size_metric, None);
        assert_eq!(summary.room_counts.bedrooms, None);
        // First entry of `images` is unusable and photos is malformed
        assert_eq!(summary.cover_image_url, None);
    }

    #[test]
    fn test_bare_string_photos() {
        let summary = normalize(
            &profile(),
            &record_with(json!({"photos": ["https://cdn.example/a.jpg"]})),
        );
        assert_eq!(
            summary.cover_image_url.as_deref(),
            Some("https://cdn.example/a.jpg")
        );
    }
}
