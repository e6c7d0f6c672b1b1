//! File-backed collaborators for the command-line front-end.
//!
//! A store directory holds `labwares.json` (the target labwares) and one
//! `<manifest_id>_content.json` per saved manifest.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use chrono::{DateTime, Utc};
use manifest_core::{ManifestStore, SchemaSource};
use manifest_model::{Labware, ManifestSchema, ManifestSchemaConfig, ObservedRow, StructuredContent};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

const LABWARES_FILE: &str = "labwares.json";

/// Schema read from a registry JSON file on every request.
#[derive(Debug, Clone)]
pub struct SchemaFile {
    path: PathBuf,
}

impl SchemaFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SchemaSource for SchemaFile {
    fn manifest_schema(&self) -> Result<ManifestSchema> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("read schema {}", self.path.display()))?;
        ManifestSchema::from_json(&json)
            .with_context(|| format!("parse schema {}", self.path.display()))
    }
}

/// Saved content with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedContent {
    pub manifest_id: String,
    pub saved_at: DateTime<Utc>,
    pub content: StructuredContent,
}

/// JSON file repository rooted at a directory.
#[derive(Debug, Clone)]
pub struct JsonManifestStore {
    root: PathBuf,
}

impl JsonManifestStore {
    /// Open an existing store directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure!(
            root.is_dir(),
            "store directory {} does not exist",
            root.display()
        );
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn content_path(&self, manifest_id: &str) -> Result<PathBuf> {
        ensure!(
            !manifest_id.is_empty()
                && manifest_id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
                && !manifest_id.starts_with('.'),
            "manifest id {manifest_id:?} cannot be used as a file name"
        );
        Ok(self.root.join(format!("{manifest_id}_content.json")))
    }

    /// Load previously saved content, if any.
    pub fn load_content(&self, manifest_id: &str) -> Result<Option<SavedContent>> {
        let path = self.content_path(manifest_id)?;
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("read content {}", path.display()))?;
        let saved = serde_json::from_str(&json)
            .with_context(|| format!("parse content {}", path.display()))?;
        Ok(Some(saved))
    }
}

impl ManifestStore for JsonManifestStore {
    fn labwares(&self) -> Result<Vec<Labware>> {
        let path = self.root.join(LABWARES_FILE);
        if !path.exists() {
            debug!(path = %path.display(), "no labwares file, manifest has no targets");
            return Ok(Vec::new());
        }
        let json = fs::read_to_string(&path)
            .with_context(|| format!("read labwares {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("parse labwares {}", path.display()))
    }

    fn save_content(&mut self, manifest_id: &str, content: &StructuredContent) -> Result<()> {
        let path = self.content_path(manifest_id)?;
        let saved = SavedContent {
            manifest_id: manifest_id.to_string(),
            saved_at: Utc::now(),
            content: content.clone(),
        };
        let json = serde_json::to_string_pretty(&saved).context("serialize content")?;
        fs::write(&path, json).with_context(|| format!("write content {}", path.display()))?;
        info!(path = %path.display(), "saved manifest content");
        Ok(())
    }
}

/// Read uploaded rows: a JSON array of header to value objects.
pub fn read_rows(path: &Path) -> Result<Vec<ObservedRow>> {
    let json =
        fs::read_to_string(path).with_context(|| format!("read rows {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parse rows {}", path.display()))
}

/// Read reconciliation settings from TOML; missing keys take defaults.
pub fn read_config(path: &Path) -> Result<ManifestSchemaConfig> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parse config {}", path.display()))
}
