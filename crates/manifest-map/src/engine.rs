//! Mapping engine implementation.

use manifest_model::{ManifestSchema, MappingResult, MatchedPair, ObservedRow};
use tracing::{debug, trace};

/// Greedy, order sensitive matcher of observed headers against a schema.
///
/// Fields that require mapping are visited in schema declaration order. Each
/// one claims the first still-unclaimed header (in header order) whose trimmed
/// text matches its pattern. A header is claimed at most once and a field
/// never takes back a header an earlier field already consumed.
///
/// # Example
///
/// ```ignore
/// use manifest_map::MappingEngine;
///
/// let engine = MappingEngine::new(&schema);
/// let result = engine.map_headers(&["plate_id".to_string(), "well".to_string()]);
/// ```
pub struct MappingEngine<'a> {
    schema: &'a ManifestSchema,
}

impl<'a> MappingEngine<'a> {
    pub fn new(schema: &'a ManifestSchema) -> Self {
        Self { schema }
    }

    /// Map the headers of the first row; an empty upload maps nothing.
    pub fn map_rows(&self, rows: &[ObservedRow]) -> MappingResult {
        self.map_headers(&observed_headers(rows))
    }

    /// Match headers to fields and derive the validity flags.
    pub fn map_headers(&self, headers: &[String]) -> MappingResult {
        let mut result = MappingResult {
            observed: headers.to_vec(),
            ..MappingResult::default()
        };

        for (field, descriptor) in self.schema.fields_requiring_mapping() {
            let found = descriptor.pattern.as_ref().and_then(|pattern| {
                result
                    .observed
                    .iter()
                    .position(|header| pattern.is_match(header.trim()))
            });
            match found {
                Some(index) => {
                    let header = result.observed.remove(index);
                    trace!(field, header = %header, "matched header");
                    result.matched.push(MatchedPair::new(field, header));
                }
                None => result.expected.push(field.to_string()),
            }
        }

        derive_flags(self.schema, &mut result);
        debug!(
            matched = result.matched.len(),
            unmatched_fields = result.expected.len(),
            unmatched_headers = result.observed.len(),
            valid = result.valid,
            shown = result.shown,
            "mapped manifest headers"
        );
        result
    }
}

/// Headers of the first row in their original order.
pub fn observed_headers(rows: &[ObservedRow]) -> Vec<String> {
    rows.first()
        .map(|row| row.headers().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Recompute `valid`, `has_unmatched` and `shown` from the pairing lists.
///
/// `shown` is raised only when a shown field and a header are both left over,
/// so a mapping whose only gaps are hidden fields never asks for review.
pub fn derive_flags(schema: &ManifestSchema, result: &mut MappingResult) {
    result.valid = schema
        .required_fields()
        .all(|field| result.is_matched(field));
    let shown_unmatched = result.expected.iter().any(|field| schema.is_shown(field));
    result.has_unmatched = shown_unmatched && !result.observed.is_empty();
    result.shown = result.has_unmatched;
}
