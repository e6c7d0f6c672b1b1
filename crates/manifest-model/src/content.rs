//! Structured manifest content grouped by labware and address.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub value: String,
}

impl FieldValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Field values recorded for one address of a labware.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressContent {
    #[serde(default)]
    pub fields: IndexMap<String, FieldValue>,
}

impl AddressContent {
    pub fn value(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(|field| field.value.as_str())
    }
}

/// One labware discovered in the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabwareContent {
    /// Zero-based index in first-seen order.
    pub position: usize,
    /// Value of the labware id field shared by this labware's rows.
    pub labware_id: String,
    #[serde(default)]
    pub addresses: IndexMap<String, AddressContent>,
}

impl LabwareContent {
    pub fn new(position: usize, labware_id: impl Into<String>) -> Self {
        Self {
            position,
            labware_id: labware_id.into(),
            addresses: IndexMap::new(),
        }
    }

    pub fn address(&self, address: &str) -> Option<&AddressContent> {
        self.addresses.get(address)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredContent {
    #[serde(default)]
    pub labwares: Vec<LabwareContent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ContentIssue>,
}

impl StructuredContent {
    pub fn labware_count(&self) -> usize {
        self.labwares.len()
    }

    pub fn address_count(&self) -> usize {
        self.labwares.iter().map(|l| l.addresses.len()).sum()
    }

    pub fn labware(&self, position: usize) -> Option<&LabwareContent> {
        self.labwares.get(position)
    }

    pub fn position_of(&self, labware_id: &str) -> Option<usize> {
        self.labwares
            .iter()
            .position(|labware| labware.labware_id == labware_id)
    }

    /// Append a labware at the next sequential position.
    pub fn allocate(&mut self, labware_id: impl Into<String>) -> &mut LabwareContent {
        let position = self.labwares.len();
        self.labwares.push(LabwareContent::new(position, labware_id));
        &mut self.labwares[position]
    }

    pub fn has_issues(&self, position: usize) -> bool {
        self.issues.iter().any(|issue| issue.labware() == position)
    }

    pub fn issues_for(&self, position: usize) -> impl Iterator<Item = &ContentIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.labware() == position)
    }
}

/// Non-fatal problem with a stored field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentIssue {
    /// A required field is present but blank.
    RequiredEmpty {
        labware: usize,
        address: String,
        field: String,
    },
    /// A field value is outside the schema's allowed list.
    ValueNotAllowed {
        labware: usize,
        address: String,
        field: String,
        value: String,
        allowed: Vec<String>,
    },
}

impl ContentIssue {
    pub fn labware(&self) -> usize {
        match self {
            Self::RequiredEmpty { labware, .. } | Self::ValueNotAllowed { labware, .. } => {
                *labware
            }
        }
    }

    pub fn address(&self) -> &str {
        match self {
            Self::RequiredEmpty { address, .. } | Self::ValueNotAllowed { address, .. } => {
                address
            }
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Self::RequiredEmpty { field, .. } | Self::ValueNotAllowed { field, .. } => field,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::RequiredEmpty { field, .. } => {
                format!("The field {field} is required.")
            }
            Self::ValueNotAllowed { field, allowed, .. } => {
                format!(
                    "The field {field} needs to be one of the following: {}.",
                    allowed.join(", ")
                )
            }
        }
    }
}
