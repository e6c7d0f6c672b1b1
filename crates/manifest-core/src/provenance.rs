//! Reconciliation orchestrator.
//!
//! Runs the accessor pipeline over a [`SharedState`] and persists the
//! structured content when the pass is valid.

use anyhow::Context;
use manifest_model::StructuredContent;
use tracing::{info, info_span};

use crate::accessor::{Applied, Pipeline, StepRecord};
use crate::content::ContentAccessor;
use crate::context::{ReconcileContext, ReconcileOptions};
use crate::error::Result;
use crate::state::SharedState;
use crate::store::{ManifestStore, SchemaSource};

/// Outcome of a successful pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub steps: Vec<StepRecord>,
    /// Every required field is mapped, or no mapping was consulted.
    pub valid: bool,
    /// Content was handed to the store.
    pub persisted: bool,
}

impl ReconcileReport {
    pub fn applied(&self, step: &str) -> Option<Applied> {
        self.steps
            .iter()
            .find(|record| record.step == step)
            .map(|record| record.applied)
    }
}

/// Drives one manifest through schema, mapping and content.
pub struct ProvenanceState<'a> {
    schema_source: &'a dyn SchemaSource,
    store: &'a mut dyn ManifestStore,
    options: ReconcileOptions,
    pipeline: Pipeline,
}

impl<'a> ProvenanceState<'a> {
    pub fn new(
        schema_source: &'a dyn SchemaSource,
        store: &'a mut dyn ManifestStore,
        options: ReconcileOptions,
    ) -> Self {
        Self {
            schema_source,
            store,
            options,
            pipeline: Pipeline::default(),
        }
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Run one pass over `state`.
    ///
    /// Errors propagate unchanged and the store is not called. Slots built
    /// before the failing step stay in `state` so the caller can present the
    /// mapping again.
    pub fn apply(&mut self, state: &mut SharedState) -> Result<ReconcileReport> {
        let span = info_span!("reconcile", manifest_id = %state.manifest_id);
        let _guard = span.enter();

        let labwares = self
            .store
            .labwares()
            .context("loading target labwares")?;
        let ctx = ReconcileContext::new(&self.options, &labwares, self.schema_source);
        let steps = self.pipeline.execute(&ctx, state)?;
        let from_raw = ContentAccessor::builds_from_raw(state);

        let valid = state.mapping.as_ref().is_none_or(|mapping| mapping.valid);
        let rebuilt = steps
            .iter()
            .any(|record| record.step == "content" && record.applied == Applied::Built);
        let mut persisted = false;

        if valid
            && rebuilt
            && from_raw
            && let Some(content) = state.structured()
        {
            if self.options.dry_run {
                info!("dry run, content not saved");
            } else {
                self.store
                    .save_content(&state.manifest_id, content)
                    .context("saving structured content")?;
                persisted = true;
            }
        }
        if rebuilt && let Some(mapping) = state.mapping.as_mut() {
            mapping.rebuild = false;
        }

        info!(
            valid,
            persisted,
            labwares = state
                .structured()
                .map_or(0, StructuredContent::labware_count),
            "reconciliation complete"
        );
        Ok(ReconcileReport {
            steps,
            valid,
            persisted,
        })
    }
}
