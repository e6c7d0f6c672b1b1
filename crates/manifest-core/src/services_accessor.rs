use manifest_model::ServiceEndpoints;

use crate::accessor::Accessor;
use crate::context::ReconcileContext;
use crate::error::Result;
use crate::state::SharedState;

/// Service locations the review screen needs, taken from configuration.
pub struct ServicesAccessor;

impl Accessor for ServicesAccessor {
    type Slot = ServiceEndpoints;

    fn name(&self) -> &'static str {
        "services"
    }

    fn slot<'s>(&self, state: &'s SharedState) -> Option<&'s ServiceEndpoints> {
        state.services.as_ref()
    }

    fn slot_mut<'s>(&self, state: &'s mut SharedState) -> &'s mut Option<ServiceEndpoints> {
        &mut state.services
    }

    fn build(&self, ctx: &ReconcileContext<'_>, _state: &SharedState) -> Result<ServiceEndpoints> {
        Ok(ctx.config().services())
    }
}
