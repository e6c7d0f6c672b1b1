use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Persisted contents of a labware: address -> field -> value.
pub type LabwareContents = IndexMap<String, IndexMap<String, String>>;

/// A target labware already registered for the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labware {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_plate_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<LabwareContents>,
}

impl Labware {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_supplier_plate_name(mut self, name: impl Into<String>) -> Self {
        self.supplier_plate_name = Some(name.into());
        self
    }

    pub fn with_barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcode = Some(barcode.into());
        self
    }

    pub fn with_contents(mut self, contents: LabwareContents) -> Self {
        self.contents = Some(contents);
        self
    }

    /// Name shown to users: the supplier plate name, else the barcode.
    pub fn display_name(&self) -> Option<&str> {
        self.supplier_plate_name
            .as_deref()
            .or(self.barcode.as_deref())
    }
}
