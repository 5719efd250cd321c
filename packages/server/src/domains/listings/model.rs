use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::Id;
use crate::kernel::StoreError;

/// Marker for the typed listing id.
pub struct ListingEntity;

pub type ListingId = Id<ListingEntity>;

/// One property record, of any listing type.
///
/// The envelope fields below are the only schema shared across all ~30
/// listing types; everything type-specific travels opaquely in `fields`
/// and is flattened into the same JSON object on the wire and in the
/// store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingRecord {
    pub id: ListingId,

    /// Human-readable identifier, unique within the owning store and
    /// immutable after creation.
    pub property_id: String,

    /// Opaque id of the creating actor, when one was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Type-specific fields, carried without interpretation.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ListingRecord {
    pub fn new(property_id: String, created_by: Option<String>, fields: Map<String, Value>) -> Self {
        let now = Utc::now();
        Self {
            id: ListingId::new(),
            property_id,
            created_by,
            created_at: now,
            updated_at: now,
            fields,
        }
    }

    /// Serialize into the flat document shape the store persists.
    pub fn to_value(&self) -> Result<Value, StoreError> {
        serde_json::to_value(self).map_err(|e| StoreError::Malformed(e.to_string()))
    }

    /// Rebuild a record from a stored document.
    pub fn from_value(value: Value) -> Result<Self, StoreError> {
        serde_json::from_value(value).map_err(|e| StoreError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_fields() -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("title".to_string(), json!("Corner Office"));
        fields.insert("floor".to_string(), json!(3));
        fields
    }

    #[test]
    fn test_roundtrip_keeps_envelope_and_fields() {
        let record = ListingRecord::new(
            "RA-COMSEOS0001".to_string(),
            Some("agent-7".to_string()),
            sample_fields(),
        );

        let value = record.to_value().unwrap();
        assert_eq!(value["property_id"], "RA-COMSEOS0001");
        assert_eq!(value["title"], "Corner Office");
        assert_eq!(value["floor"], 3);

        let parsed = ListingRecord::from_value(value).unwrap();
        assert_eq!(parsed.id, record.id);
        assert_eq!(parsed.property_id, record.property_id);
        assert_eq!(parsed.fields, record.fields);
    }

    #[test]
    fn test_missing_created_by_is_allowed() {
        let value = json!({
            "id": "018f7b9e-5f2a-7cc3-a4e1-111111111111",
            "property_id": "RA-RESREAP0001",
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-01T00:00:00Z",
            "title": "Two BHK"
        });

        let record = ListingRecord::from_value(value).unwrap();
        assert!(record.created_by.is_none());
        assert_eq!(record.fields["title"], "Two BHK");
    }
}
