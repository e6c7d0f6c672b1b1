//! Header to schema field correspondence.

use manifest_map::{MappingEngine, derive_flags};
use manifest_model::{ManifestSchema, MappingResult};

use crate::accessor::Accessor;
use crate::context::ReconcileContext;
use crate::error::{ProvenanceError, Result};
use crate::state::SharedState;

/// Maps the upload's headers onto the schema.
///
/// Never fails on unmatched names; gaps are reported in the result lists.
pub struct MappingAccessor;

impl MappingAccessor {
    fn schema<'s>(&self, state: &'s SharedState) -> Result<&'s ManifestSchema> {
        state.schema.as_ref().ok_or(ProvenanceError::MissingSlot {
            step: "mapping",
            slot: "schema",
        })
    }
}

impl Accessor for MappingAccessor {
    type Slot = MappingResult;

    fn name(&self) -> &'static str {
        "mapping"
    }

    fn slot<'s>(&self, state: &'s SharedState) -> Option<&'s MappingResult> {
        state.mapping.as_ref()
    }

    fn slot_mut<'s>(&self, state: &'s mut SharedState) -> &'s mut Option<MappingResult> {
        &mut state.mapping
    }

    /// Only a fresh upload that has not been structured yet is mapped.
    fn is_stale(&self, state: &SharedState) -> bool {
        self.slot(state).is_none() && state.has_raw() && state.structured().is_none()
    }

    fn build(&self, _ctx: &ReconcileContext<'_>, state: &SharedState) -> Result<MappingResult> {
        let schema = self.schema(state)?;
        let rows = state.raw().unwrap_or_default();
        Ok(MappingEngine::new(schema).map_rows(rows))
    }

    /// Flags are re-derived so a hand edited mapping is judged afresh.
    fn validate(
        &self,
        _ctx: &ReconcileContext<'_>,
        state: &SharedState,
        slot: &mut MappingResult,
    ) -> Result<()> {
        derive_flags(self.schema(state)?, slot);
        Ok(())
    }
}
