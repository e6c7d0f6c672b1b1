//! Lazy, memoized derivation of shared state slots.
//!
//! Each [`Accessor`] owns one slot of [`SharedState`]. Applying it decides
//! whether the slot is stale, rebuilds it if so, and then validates the slot
//! whether it was rebuilt or reused. Accessors are run in order by a
//! [`Pipeline`].
//!
//! # Standard Pipeline Order
//!
//! 1. **SchemaAccessor** - expected fields from the schema source
//! 2. **ServicesAccessor** - external service endpoints from configuration
//! 3. **MappingAccessor** - header to field correspondence
//! 4. **ContentAccessor** - rows structured by labware and address

use tracing::debug;

use crate::content::ContentAccessor;
use crate::context::ReconcileContext;
use crate::error::Result;
use crate::mapping_accessor::MappingAccessor;
use crate::schema_accessor::SchemaAccessor;
use crate::services_accessor::ServicesAccessor;
use crate::state::SharedState;

/// Outcome of applying one accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The slot was stale and has been rebuilt.
    Built,
    /// The cached slot was kept.
    Cached,
    /// Nothing to build from and nothing cached.
    Absent,
}

/// Builds and validates one slot of the shared state.
pub trait Accessor {
    type Slot;

    /// Human-readable name for this accessor (for logging/debugging).
    fn name(&self) -> &'static str;

    fn slot<'s>(&self, state: &'s SharedState) -> Option<&'s Self::Slot>;

    fn slot_mut<'s>(&self, state: &'s mut SharedState) -> &'s mut Option<Self::Slot>;

    /// Whether the slot must be rebuilt.
    ///
    /// Default implementation rebuilds only when nothing is cached.
    fn is_stale(&self, state: &SharedState) -> bool {
        self.slot(state).is_none()
    }

    fn build(&self, ctx: &ReconcileContext<'_>, state: &SharedState) -> Result<Self::Slot>;

    /// Enrich or check a built or cached slot. A failure drops the slot.
    fn validate(
        &self,
        _ctx: &ReconcileContext<'_>,
        _state: &SharedState,
        _slot: &mut Self::Slot,
    ) -> Result<()> {
        Ok(())
    }

    fn apply(&self, ctx: &ReconcileContext<'_>, state: &mut SharedState) -> Result<Applied> {
        let (slot, applied) = if self.is_stale(state) {
            debug!(accessor = self.name(), "rebuilding slot");
            // a failed rebuild leaves the slot empty, never the previous value
            self.slot_mut(state).take();
            (Some(self.build(ctx, state)?), Applied::Built)
        } else {
            (self.slot_mut(state).take(), Applied::Cached)
        };
        let Some(mut slot) = slot else {
            debug!(accessor = self.name(), "nothing to build");
            return Ok(Applied::Absent);
        };
        self.validate(ctx, state, &mut slot)?;
        *self.slot_mut(state) = Some(slot);
        Ok(applied)
    }
}

/// Object safe handle over an [`Accessor`] so differently typed slots can
/// share one pipeline.
pub trait Step {
    fn step_name(&self) -> &'static str;

    fn run(&self, ctx: &ReconcileContext<'_>, state: &mut SharedState) -> Result<Applied>;
}

impl<A: Accessor> Step for A {
    fn step_name(&self) -> &'static str {
        self.name()
    }

    fn run(&self, ctx: &ReconcileContext<'_>, state: &mut SharedState) -> Result<Applied> {
        self.apply(ctx, state)
    }
}

/// Record of one executed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRecord {
    pub step: &'static str,
    pub applied: Applied,
}

/// An ordered sequence of accessors.
pub struct Pipeline {
    steps: Vec<Box<dyn Step>>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
            .add_step(Box::new(SchemaAccessor))
            .add_step(Box::new(ServicesAccessor))
            .add_step(Box::new(MappingAccessor))
            .add_step(Box::new(ContentAccessor))
    }
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Add a step to the end of the pipeline.
    pub fn add_step(mut self, step: Box<dyn Step>) -> Self {
        self.steps.push(step);
        self
    }

    /// Execute all steps in order, stopping at the first failure.
    pub fn execute(
        &self,
        ctx: &ReconcileContext<'_>,
        state: &mut SharedState,
    ) -> Result<Vec<StepRecord>> {
        let mut records = Vec::with_capacity(self.steps.len());
        for step in &self.steps {
            let applied = step.run(ctx, state)?;
            records.push(StepRecord {
                step: step.step_name(),
                applied,
            });
        }
        Ok(records)
    }

    /// List step names in execution order.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.step_name()).collect()
    }
}
