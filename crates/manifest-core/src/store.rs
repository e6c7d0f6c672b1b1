//! Collaborators that supply the schema and persist validated content.

use std::collections::BTreeMap;

use manifest_model::{Labware, ManifestSchema, StructuredContent};

/// Supplies the manifest schema for a pass.
pub trait SchemaSource {
    fn manifest_schema(&self) -> anyhow::Result<ManifestSchema>;
}

/// Target labwares and storage for validated content.
pub trait ManifestStore {
    /// Labwares registered for the manifest, in a stable order.
    fn labwares(&self) -> anyhow::Result<Vec<Labware>>;

    fn save_content(
        &mut self,
        manifest_id: &str,
        content: &StructuredContent,
    ) -> anyhow::Result<()>;
}

/// Schema known up front.
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    schema: ManifestSchema,
}

impl StaticSchema {
    pub fn new(schema: ManifestSchema) -> Self {
        Self { schema }
    }
}

impl SchemaSource for StaticSchema {
    fn manifest_schema(&self) -> anyhow::Result<ManifestSchema> {
        Ok(self.schema.clone())
    }
}

/// Store kept in memory, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    labwares: Vec<Labware>,
    saved: BTreeMap<String, Vec<StructuredContent>>,
}

impl InMemoryStore {
    pub fn new(labwares: Vec<Labware>) -> Self {
        Self {
            labwares,
            saved: BTreeMap::new(),
        }
    }

    /// Content saved for a manifest, oldest first.
    pub fn saved(&self, manifest_id: &str) -> &[StructuredContent] {
        self.saved
            .get(manifest_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn save_count(&self) -> usize {
        self.saved.values().map(Vec::len).sum()
    }
}

impl ManifestStore for InMemoryStore {
    fn labwares(&self) -> anyhow::Result<Vec<Labware>> {
        Ok(self.labwares.clone())
    }

    fn save_content(
        &mut self,
        manifest_id: &str,
        content: &StructuredContent,
    ) -> anyhow::Result<()> {
        self.saved
            .entry(manifest_id.to_string())
            .or_default()
            .push(content.clone());
        Ok(())
    }
}
