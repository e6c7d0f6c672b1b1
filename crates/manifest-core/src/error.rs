//! Error types for reconciliation passes.

use thiserror::Error;

/// Fatal problems found while structuring manifest content.
///
/// Any of these aborts the pass; no partial content is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ContentError {
    /// A required labware id field is missing from a mapped row.
    #[error("This manifest does not have a valid labware id field for the labware at row: {row}")]
    LabwareNotFound { row: usize },

    /// A required position field is missing from a mapped row.
    #[error("This manifest does not have a valid position field for the wells of row: {row}")]
    PositionNotFound { row: usize },

    /// Two rows target the same address of one labware.
    #[error("Duplicate entry found for {labware}: Position {address}")]
    PositionDuplicated { labware: String, address: String },

    /// Discovered labware count differs from the registered targets.
    #[error(
        "Expected {expected} labwares in Manifest but {} {found}.",
        if .found < .expected { "could only find" } else { "found" }
    )]
    WrongNumberLabwares { expected: usize, found: usize },
}

impl ContentError {
    /// Zero-based input row the error refers to, if any.
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::LabwareNotFound { row } | Self::PositionNotFound { row } => Some(*row),
            _ => None,
        }
    }

    /// Whether re-confirming the mapping could fix the problem without a new
    /// upload.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::LabwareNotFound { .. } | Self::PositionNotFound { .. }
        )
    }

    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::LabwareNotFound { .. } => {
                "Map a column to the labware id field or fill it in for every row"
            }
            Self::PositionNotFound { .. } => {
                "Map a column to the position field or fill it in for every row"
            }
            Self::PositionDuplicated { .. } => {
                "Each position may appear only once per labware; remove the repeated row"
            }
            Self::WrongNumberLabwares { .. } => {
                "Make sure the file lists every registered labware and no others"
            }
        }
    }
}

/// Errors surfaced by a reconciliation pass.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProvenanceError {
    #[error(transparent)]
    Content(#[from] ContentError),

    /// A step ran before the slot it depends on was filled.
    #[error("{step} requires the {slot} slot to be built first")]
    MissingSlot {
        step: &'static str,
        slot: &'static str,
    },

    /// Schema source or manifest store failure.
    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

impl ProvenanceError {
    pub fn as_content(&self) -> Option<&ContentError> {
        match self {
            Self::Content(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvenanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_counts_and_rows() {
        let err = ContentError::WrongNumberLabwares {
            expected: 2,
            found: 1,
        };
        assert_eq!(
            err.to_string(),
            "Expected 2 labwares in Manifest but could only find 1."
        );
        assert_eq!(err.row(), None);
        assert!(!err.is_recoverable());

        let err = ContentError::LabwareNotFound { row: 3 };
        assert_eq!(err.row(), Some(3));
        assert!(err.is_recoverable());
    }

    #[test]
    fn collaborator_errors_keep_context() {
        let err: ProvenanceError = anyhow::anyhow!("disk full").context("saving content").into();
        assert_eq!(err.to_string(), "saving content");
        assert!(err.as_content().is_none());
    }
}
