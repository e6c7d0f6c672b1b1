use anyhow::Context;
use manifest_model::ManifestSchema;
use tracing::debug;

use crate::accessor::Accessor;
use crate::context::ReconcileContext;
use crate::error::Result;
use crate::state::SharedState;

/// Expected fields, fetched once per pass from the schema source.
pub struct SchemaAccessor;

impl Accessor for SchemaAccessor {
    type Slot = ManifestSchema;

    fn name(&self) -> &'static str {
        "schema"
    }

    fn slot<'s>(&self, state: &'s SharedState) -> Option<&'s ManifestSchema> {
        state.schema.as_ref()
    }

    fn slot_mut<'s>(&self, state: &'s mut SharedState) -> &'s mut Option<ManifestSchema> {
        &mut state.schema
    }

    fn build(&self, ctx: &ReconcileContext<'_>, _state: &SharedState) -> Result<ManifestSchema> {
        let schema = ctx
            .schema_source
            .manifest_schema()
            .context("loading manifest schema")?;
        debug!(fields = schema.len(), "loaded manifest schema");
        Ok(schema)
    }
}
