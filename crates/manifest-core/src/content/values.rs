//! Per-value checks against the schema.

use manifest_model::{ContentIssue, FieldDescriptor, ManifestSchema, StructuredContent};

/// Check every stored value, returning the problems found.
///
/// A value that matches an allowed entry only when case is ignored is
/// rewritten to the allowed spelling.
pub fn check_values(schema: &ManifestSchema, content: &mut StructuredContent) -> Vec<ContentIssue> {
    let mut issues = Vec::new();
    for labware in &mut content.labwares {
        for (address, fields) in &mut labware.addresses {
            for (name, field) in &mut fields.fields {
                let Some(descriptor) = schema.get(name) else {
                    continue;
                };
                if descriptor.required && field.value.trim().is_empty() {
                    issues.push(ContentIssue::RequiredEmpty {
                        labware: labware.position,
                        address: address.clone(),
                        field: name.clone(),
                    });
                    continue;
                }
                if field.value.is_empty() {
                    continue;
                }
                if let Some(allowed) = &descriptor.allowed {
                    match canonical_value(descriptor, &field.value) {
                        Some(canonical) => field.value = canonical.to_string(),
                        None => issues.push(ContentIssue::ValueNotAllowed {
                            labware: labware.position,
                            address: address.clone(),
                            field: name.clone(),
                            value: field.value.clone(),
                            allowed: allowed.clone(),
                        }),
                    }
                }
            }
        }
    }
    issues
}

/// Allowed spelling of `value`, compared ignoring case.
fn canonical_value<'d>(descriptor: &'d FieldDescriptor, value: &str) -> Option<&'d str> {
    let value = value.to_lowercase();
    descriptor
        .allowed
        .as_deref()?
        .iter()
        .find(|candidate| candidate.to_lowercase() == value)
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use manifest_model::{AddressContent, FieldValue};

    use super::*;

    fn content_with(field: &str, value: &str) -> StructuredContent {
        let mut content = StructuredContent::default();
        let mut address = AddressContent::default();
        address
            .fields
            .insert(field.to_string(), FieldValue::new(value));
        content
            .allocate("Labware 1")
            .addresses
            .insert("A:1".to_string(), address);
        content
    }

    fn gender_schema() -> ManifestSchema {
        ManifestSchema::new()
            .with_field(
                "gender",
                FieldDescriptor::new()
                    .required(true)
                    .with_allowed(["male", "female", "unknown"]),
            )
            .expect("schema")
    }

    #[test]
    fn allowed_value_is_canonicalised() {
        let mut content = content_with("gender", "FEMALE");
        let issues = check_values(&gender_schema(), &mut content);
        assert!(issues.is_empty());
        assert_eq!(
            content.labwares[0].addresses["A:1"].value("gender"),
            Some("female")
        );
    }

    #[test]
    fn unknown_value_is_reported() {
        let mut content = content_with("gender", "other");
        let issues = check_values(&gender_schema(), &mut content);
        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].message(),
            "The field gender needs to be one of the following: male, female, unknown."
        );
        assert_eq!(
            content.labwares[0].addresses["A:1"].value("gender"),
            Some("other")
        );
    }

    #[test]
    fn blank_required_value_is_reported_once() {
        let mut content = content_with("gender", "  ");
        let issues = check_values(&gender_schema(), &mut content);
        assert_eq!(
            issues,
            vec![ContentIssue::RequiredEmpty {
                labware: 0,
                address: "A:1".to_string(),
                field: "gender".to_string(),
            }]
        );
    }
}
