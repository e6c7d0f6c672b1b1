//! Error types for mapping operations.

use thiserror::Error;

/// Errors from interactive mapping edits.
///
/// The automatic matcher never fails; these only arise when a user pairs or
/// unpairs fields by hand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Field is not declared by the schema.
    #[error("Field not found in schema: {0}")]
    FieldNotFound(String),
    /// Header is not present in the uploaded rows.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
    /// Header is already paired with another field.
    #[error("Column '{column}' already mapped to '{field}'")]
    ColumnAlreadyUsed { column: String, field: String },
}

pub type Result<T> = std::result::Result<T, MappingError>;
