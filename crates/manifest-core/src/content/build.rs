//! Structuring rows by labware and address.

use indexmap::IndexMap;
use indexmap::map::Entry;
use manifest_model::{
    AddressContent, FieldValue, Labware, ManifestSchema, MappingResult, ObservedRow,
    StructuredContent,
};
use tracing::trace;

use crate::context::ReconcileContext;
use crate::error::ContentError;

/// Row translated to schema field names.
type MappedRow = IndexMap<String, FieldValue>;

/// Keep only headers that are matched, renamed to their schema field.
fn mapped_row(row: &ObservedRow, mapping: &MappingResult) -> MappedRow {
    row.iter()
        .filter_map(|(header, value)| {
            mapping
                .expected_for_observed(header)
                .map(|field| (field.to_string(), FieldValue::new(value)))
        })
        .collect()
}

/// Single pass over the rows in input order.
///
/// The labware id and position come from their configured fields, or from
/// the configured defaults when a row has neither. The first offending row
/// decides the error.
pub fn from_raw(
    ctx: &ReconcileContext<'_>,
    schema: &ManifestSchema,
    mapping: &MappingResult,
    rows: &[ObservedRow],
) -> Result<StructuredContent, ContentError> {
    let config = ctx.config();
    let labware_field = ctx.labware_id_field();
    let position_field = ctx.position_field();
    let mut content = StructuredContent::default();

    for (index, row) in rows.iter().enumerate() {
        let mapped = mapped_row(row, mapping);

        let labware_id = match mapped.get(labware_field) {
            Some(field) => field.value.clone(),
            None if schema.is_required(labware_field) => {
                return Err(ContentError::LabwareNotFound { row: index });
            }
            None => config.default_labware_name_value.clone(),
        };
        let address = match mapped.get(position_field) {
            Some(field) => field.value.clone(),
            None if schema.is_required(position_field) => {
                return Err(ContentError::PositionNotFound { row: index });
            }
            None => config.default_position_value.clone(),
        };

        let position = match content.position_of(&labware_id) {
            Some(position) => position,
            None => content.allocate(labware_id.as_str()).position,
        };
        let labware = &mut content.labwares[position];

        match labware.addresses.entry(address) {
            Entry::Occupied(entry) => {
                return Err(ContentError::PositionDuplicated {
                    labware: labware_id,
                    address: entry.key().clone(),
                });
            }
            Entry::Vacant(entry) => {
                trace!(
                    row = index,
                    labware = ctx.loggable(&labware_id),
                    address = ctx.loggable(entry.key()),
                    fields = mapped.len(),
                    "structured row"
                );
                entry.insert(AddressContent { fields: mapped });
            }
        }
    }

    Ok(content)
}

/// Rebuild structure from labwares that already carry contents.
///
/// Used when no new rows were uploaded. Labwares keep their store order and
/// a labware without contents yields an empty address map.
pub fn from_labwares(ctx: &ReconcileContext<'_>, labwares: &[Labware]) -> StructuredContent {
    let mut content = StructuredContent::default();
    for labware in labwares {
        let name = labware
            .display_name()
            .unwrap_or(ctx.config().default_labware_name_value.as_str());
        let entry = content.allocate(name);
        let Some(contents) = &labware.contents else {
            continue;
        };
        entry.addresses = contents
            .iter()
            .map(|(address, fields)| {
                let fields = fields
                    .iter()
                    .map(|(field, value)| (field.clone(), FieldValue::new(value.as_str())))
                    .collect();
                (address.clone(), AddressContent { fields })
            })
            .collect();
    }
    content
}
