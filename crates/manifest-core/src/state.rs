//! Request-scoped working state of a reconciliation pass.

use manifest_model::{
    ManifestSchema, MappingResult, ObservedRow, ServiceEndpoints, StructuredContent,
};
use serde::{Deserialize, Serialize};

/// Slots filled by the accessors, in dependency order.
///
/// A caller may hand back a partially filled state (for example with an
/// edited mapping) and only the stale slots are rebuilt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedState {
    #[serde(default)]
    pub manifest_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<ManifestSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub services: Option<ServiceEndpoints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapping: Option<MappingResult>,
    #[serde(default)]
    pub content: ContentSlot,
}

/// Raw upload and its structured form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSlot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Vec<ObservedRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured: Option<StructuredContent>,
}

impl SharedState {
    pub fn new(manifest_id: impl Into<String>) -> Self {
        Self {
            manifest_id: manifest_id.into(),
            ..Self::default()
        }
    }

    /// Start a pass from freshly uploaded rows.
    pub fn with_raw(mut self, rows: Vec<ObservedRow>) -> Self {
        self.content.raw = Some(rows);
        self
    }

    /// Replace the upload; derived mapping and content are discarded.
    pub fn replace_raw(&mut self, rows: Vec<ObservedRow>) {
        self.mapping = None;
        self.content = ContentSlot {
            raw: Some(rows),
            structured: None,
        };
    }

    pub fn raw(&self) -> Option<&[ObservedRow]> {
        self.content.raw.as_deref()
    }

    pub fn structured(&self) -> Option<&StructuredContent> {
        self.content.structured.as_ref()
    }

    pub fn has_raw(&self) -> bool {
        self.content.raw.is_some()
    }

    /// Mapping was edited since content was last structured.
    pub fn mapping_changed(&self) -> bool {
        self.mapping.as_ref().is_some_and(|mapping| mapping.rebuild)
    }
}
