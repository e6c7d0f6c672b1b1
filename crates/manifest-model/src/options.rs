//! Reconciliation configuration.

use serde::{Deserialize, Serialize};

/// Field roles and fallback values used when structuring manifest content.
///
/// Usually read from a TOML file; every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestSchemaConfig {
    /// Schema field holding the labware identity.
    pub field_labware_name: String,
    /// Schema field holding the address within a labware.
    pub field_position: String,
    /// Labware identity used when a row carries none.
    pub default_labware_name_value: String,
    /// Address used when a row carries none.
    pub default_position_value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxonomy_service_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materials_schema_url: Option<String>,
}

impl Default for ManifestSchemaConfig {
    fn default() -> Self {
        Self {
            field_labware_name: "supplier_plate_name".to_string(),
            field_position: "position".to_string(),
            default_labware_name_value: "default".to_string(),
            default_position_value: "1".to_string(),
            taxonomy_service_url: None,
            materials_schema_url: None,
        }
    }
}

impl ManifestSchemaConfig {
    pub fn with_labware_field(mut self, field: impl Into<String>) -> Self {
        self.field_labware_name = field.into();
        self
    }

    pub fn with_position_field(mut self, field: impl Into<String>) -> Self {
        self.field_position = field.into();
        self
    }

    pub fn with_defaults(
        mut self,
        labware_name: impl Into<String>,
        position: impl Into<String>,
    ) -> Self {
        self.default_labware_name_value = labware_name.into();
        self.default_position_value = position.into();
        self
    }

    #[must_use]
    pub fn services(&self) -> ServiceEndpoints {
        ServiceEndpoints {
            taxonomy_service_url: self.taxonomy_service_url.clone(),
            materials_schema_url: self.materials_schema_url.clone(),
        }
    }
}

/// External service locations handed to the review UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxonomy_service_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials_schema_url: Option<String>,
}
