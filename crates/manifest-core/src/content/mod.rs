//! Structured manifest content.
//!
//! Content is built from the uploaded rows when both rows and a mapping are
//! present, and otherwise read back from the target labwares' stored
//! contents. Validation then checks the labware count and records non-fatal
//! value issues.

pub mod build;
pub mod values;

use manifest_model::StructuredContent;
use tracing::{debug, warn};

use crate::accessor::Accessor;
use crate::context::ReconcileContext;
use crate::error::{ContentError, ProvenanceError, Result};
use crate::state::SharedState;

pub use values::check_values;

/// Builds [`StructuredContent`] and guards its consistency.
pub struct ContentAccessor;

impl ContentAccessor {
    /// Whether a build would use the uploaded rows.
    pub fn builds_from_raw(state: &SharedState) -> bool {
        state.has_raw() && state.mapping.is_some()
    }
}

impl Accessor for ContentAccessor {
    type Slot = StructuredContent;

    fn name(&self) -> &'static str {
        "content"
    }

    fn slot<'s>(&self, state: &'s SharedState) -> Option<&'s StructuredContent> {
        state.content.structured.as_ref()
    }

    fn slot_mut<'s>(&self, state: &'s mut SharedState) -> &'s mut Option<StructuredContent> {
        &mut state.content.structured
    }

    /// Editing the mapping invalidates content built from the same rows.
    fn is_stale(&self, state: &SharedState) -> bool {
        self.slot(state).is_none() || (state.has_raw() && state.mapping_changed())
    }

    fn build(&self, ctx: &ReconcileContext<'_>, state: &SharedState) -> Result<StructuredContent> {
        match (state.raw(), state.mapping.as_ref()) {
            (Some(rows), Some(mapping)) => {
                let schema = state.schema.as_ref().ok_or(ProvenanceError::MissingSlot {
                    step: "content",
                    slot: "schema",
                })?;
                let content = build::from_raw(ctx, schema, mapping, rows)?;
                debug!(
                    rows = rows.len(),
                    labwares = content.labware_count(),
                    "structured uploaded rows"
                );
                Ok(content)
            }
            _ => {
                let content = build::from_labwares(ctx, ctx.labwares);
                debug!(
                    labwares = content.labware_count(),
                    "read content from stored labwares"
                );
                Ok(content)
            }
        }
    }

    fn validate(
        &self,
        ctx: &ReconcileContext<'_>,
        state: &SharedState,
        slot: &mut StructuredContent,
    ) -> Result<()> {
        let found = slot.labware_count();
        let expected = ctx.labwares.len();
        // an upload with no rows discovers no labware and is not counted
        if found > 0 && found != expected {
            return Err(ContentError::WrongNumberLabwares { expected, found }.into());
        }

        slot.issues = match &state.schema {
            Some(schema) => check_values(schema, slot),
            None => Vec::new(),
        };
        for issue in &slot.issues {
            warn!(
                labware = issue.labware(),
                address = issue.address(),
                field = issue.field(),
                "{}",
                issue.message()
            );
        }
        Ok(())
    }
}
