//! Incremental reconciliation of uploaded labware manifests.
//!
//! A pass derives the schema, the header mapping and the structured content
//! of a manifest, rebuilding only the slots whose inputs changed.

pub mod accessor;
pub mod content;
pub mod context;
pub mod error;
pub mod mapping_accessor;
pub mod provenance;
pub mod schema_accessor;
pub mod services_accessor;
pub mod state;
pub mod store;

pub use accessor::{Accessor, Applied, Pipeline, Step, StepRecord};
pub use content::ContentAccessor;
pub use context::{REDACTED_VALUE, ReconcileContext, ReconcileOptions};
pub use error::{ContentError, ProvenanceError, Result};
pub use mapping_accessor::MappingAccessor;
pub use provenance::{ProvenanceState, ReconcileReport};
pub use schema_accessor::SchemaAccessor;
pub use services_accessor::ServicesAccessor;
pub use state::{ContentSlot, SharedState};
pub use store::{InMemoryStore, ManifestStore, SchemaSource, StaticSchema};
