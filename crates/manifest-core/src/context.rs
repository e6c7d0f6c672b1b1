//! Inputs shared by every accessor during one pass.

use manifest_model::{Labware, ManifestSchemaConfig};

use crate::store::SchemaSource;

/// Caller controlled settings for a reconciliation pass.
#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    pub config: ManifestSchemaConfig,
    /// Whether cell values may appear in trace logs.
    pub log_data: bool,
    /// Run every step but never call the persistence collaborator.
    pub dry_run: bool,
}

impl ReconcileOptions {
    pub fn new(config: ManifestSchemaConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_log_data(mut self, enabled: bool) -> Self {
        self.log_data = enabled;
        self
    }

    pub fn with_dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }
}

/// Read-only view handed to accessors.
pub struct ReconcileContext<'a> {
    pub options: &'a ReconcileOptions,
    /// Target labwares registered for the manifest, in store order.
    pub labwares: &'a [Labware],
    pub schema_source: &'a dyn SchemaSource,
}

impl<'a> ReconcileContext<'a> {
    pub fn new(
        options: &'a ReconcileOptions,
        labwares: &'a [Labware],
        schema_source: &'a dyn SchemaSource,
    ) -> Self {
        Self {
            options,
            labwares,
            schema_source,
        }
    }

    pub fn config(&self) -> &ManifestSchemaConfig {
        &self.options.config
    }

    /// Schema field that identifies a labware.
    pub fn labware_id_field(&self) -> &str {
        &self.options.config.field_labware_name
    }

    /// Schema field that holds the address within a labware.
    pub fn position_field(&self) -> &str {
        &self.options.config.field_position
    }

    /// Row values go to logs only when explicitly allowed.
    pub fn loggable<'v>(&self, value: &'v str) -> &'v str {
        if self.options.log_data {
            value
        } else {
            REDACTED_VALUE
        }
    }
}

/// Placeholder logged instead of a cell value.
pub const REDACTED_VALUE: &str = "[REDACTED]";
