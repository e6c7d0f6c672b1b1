//! Regex based matching of uploaded manifest headers to schema fields.

pub mod engine;
pub mod error;
pub mod state;

pub use engine::{MappingEngine, derive_flags, observed_headers};
pub use error::{MappingError, Result};
pub use state::{MappingState, MappingSummary};
