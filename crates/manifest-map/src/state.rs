//! Interactive edits to an existing mapping.
//!
//! Used when a user re-confirms the mapping in the review screen. Every edit
//! flags the mapping for a content rebuild and re-derives the validity flags.

use manifest_model::{FieldDescriptor, ManifestSchema, MappingResult, MatchedPair};
use tracing::debug;

use crate::engine::derive_flags;
use crate::error::{MappingError, Result};

/// Mutable view over a [`MappingResult`] bound to its schema.
#[derive(Debug)]
pub struct MappingState<'a> {
    schema: &'a ManifestSchema,
    result: &'a mut MappingResult,
}

impl<'a> MappingState<'a> {
    pub fn new(schema: &'a ManifestSchema, result: &'a mut MappingResult) -> Self {
        Self { schema, result }
    }

    pub fn result(&self) -> &MappingResult {
        &*self.result
    }

    /// Check if a header is already paired with some field.
    pub fn is_column_used(&self, column: &str) -> bool {
        self.result.expected_for_observed(column).is_some()
    }

    /// Headers still free to be paired.
    pub fn available_columns(&self) -> &[String] {
        &self.result.observed
    }

    /// Pair `field` with `column` by hand.
    ///
    /// A field that was already paired releases its previous header first.
    pub fn accept_manual(&mut self, field: &str, column: &str) -> Result<()> {
        if !self.schema.contains(field) {
            return Err(MappingError::FieldNotFound(field.to_string()));
        }
        if let Some(owner) = self.result.expected_for_observed(column) {
            if owner == field {
                return Ok(());
            }
            return Err(MappingError::ColumnAlreadyUsed {
                column: column.to_string(),
                field: owner.to_string(),
            });
        }
        if !self.result.observed.iter().any(|c| c == column) {
            return Err(MappingError::ColumnNotFound(column.to_string()));
        }

        self.release(field);
        self.result.expected.retain(|f| f != field);
        self.result.observed.retain(|c| c != column);
        self.result.matched.push(MatchedPair::new(field, column));
        debug!(field, column, "accepted manual mapping");
        self.touch();
        Ok(())
    }

    /// Unpair a matched field. Returns `false` when it was not matched.
    pub fn clear_mapping(&mut self, field: &str) -> bool {
        if !self.release(field) {
            return false;
        }
        debug!(field, "cleared mapping");
        self.touch();
        true
    }

    pub fn summary(&self) -> MappingSummary {
        let required_total = self.schema.required_fields().count();
        let required_mapped = self
            .schema
            .required_fields()
            .filter(|field| self.result.is_matched(field))
            .count();
        MappingSummary {
            matched: self.result.matched.len(),
            unmatched_fields: self.result.expected.len(),
            unmatched_columns: self.result.observed.len(),
            required_total,
            required_mapped,
        }
    }

    /// Drop the pair for `field`, returning both names to the residual lists.
    fn release(&mut self, field: &str) -> bool {
        let Some(index) = self.result.matched.iter().position(|p| p.expected == field) else {
            return false;
        };
        let pair = self.result.matched.remove(index);
        let requires_mapping = self
            .schema
            .get(field)
            .is_some_and(FieldDescriptor::requires_mapping);
        if requires_mapping {
            self.result.expected.push(pair.expected);
        }
        self.result.observed.push(pair.observed);
        true
    }

    fn touch(&mut self) {
        self.result.rebuild = true;
        derive_flags(self.schema, self.result);
    }
}

/// Summary of mapping counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingSummary {
    /// Matched field/header pairs.
    pub matched: usize,
    /// Fields still waiting for a header.
    pub unmatched_fields: usize,
    /// Headers nobody claimed.
    pub unmatched_columns: usize,
    /// Total required fields.
    pub required_total: usize,
    /// Required fields that are matched.
    pub required_mapped: usize,
}
