pub mod content;
pub mod error;
pub mod labware;
pub mod mapping;
pub mod options;
pub mod row;
pub mod schema;

pub use content::{AddressContent, ContentIssue, FieldValue, LabwareContent, StructuredContent};
pub use error::{ModelError, Result};
pub use labware::Labware;
pub use mapping::{MappingResult, MatchedPair};
pub use options::{ManifestSchemaConfig, ServiceEndpoints};
pub use row::ObservedRow;
pub use schema::{FieldDescriptor, FieldPattern, ManifestSchema};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matched_pair_lookup_both_directions() {
        let mapping = MappingResult {
            matched: vec![
                MatchedPair::new("supplier_plate_name", "plate_id"),
                MatchedPair::new("position", "well"),
            ],
            ..MappingResult::default()
        };
        assert_eq!(mapping.expected_for_observed("well"), Some("position"));
        assert_eq!(
            mapping.observed_for_expected("supplier_plate_name"),
            Some("plate_id")
        );
        assert_eq!(mapping.expected_for_observed("gender"), None);
    }

    #[test]
    fn structured_content_serializes() {
        let mut content = StructuredContent::default();
        let labware = content.allocate("Labware 1");
        labware
            .addresses
            .insert("A:1".to_string(), AddressContent::default());
        let json = serde_json::to_string(&content).expect("serialize content");
        let round: StructuredContent = serde_json::from_str(&json).expect("deserialize content");
        assert_eq!(round, content);
    }
}
