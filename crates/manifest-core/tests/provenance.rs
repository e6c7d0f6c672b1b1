use indexmap::IndexMap;
use manifest_core::{
    Applied, ContentError, InMemoryStore, ProvenanceError, ProvenanceState, ReconcileOptions,
    SharedState, StaticSchema,
};
use manifest_map::MappingState;
use manifest_model::{
    ContentIssue, FieldDescriptor, FieldPattern, Labware, ManifestSchema, ManifestSchemaConfig,
    ObservedRow,
};

fn pattern(text: &str) -> FieldPattern {
    FieldPattern::new(text).expect("pattern")
}

fn schema() -> ManifestSchema {
    ManifestSchema::new()
        .with_field(
            "supplier_plate_name",
            FieldDescriptor::new()
                .required(true)
                .with_pattern(pattern("(?i)^plate")),
        )
        .expect("schema")
        .with_field(
            "position",
            FieldDescriptor::new()
                .required(true)
                .with_pattern(pattern("(?i)^(well|position)$")),
        )
        .expect("schema")
        .with_field(
            "gender",
            FieldDescriptor::new()
                .show_on_form(true)
                .with_pattern(pattern("(?i)^(gender|sex)$"))
                .with_allowed(["male", "female", "unknown"]),
        )
        .expect("schema")
}

fn row(plate: &str, well: &str, gender: &str) -> ObservedRow {
    ObservedRow::new()
        .with("Plate ID", plate)
        .with("Well", well)
        .with("Sex", gender)
}

fn targets(count: usize) -> Vec<Labware> {
    (1..=count)
        .map(|n| Labware::new(format!("lw-{n}")))
        .collect()
}

#[test]
fn fresh_upload_is_structured_and_saved() {
    let source = StaticSchema::new(schema());
    let mut store = InMemoryStore::new(targets(2));
    let mut state = SharedState::new("manifest-1").with_raw(vec![
        row("Labware 1", "A:1", "male"),
        row("Labware 1", "B:1", "female"),
        row("Labware 2", "A:1", "male"),
    ]);

    let report = ProvenanceState::new(&source, &mut store, ReconcileOptions::default())
        .apply(&mut state)
        .expect("reconcile");

    assert!(report.valid);
    assert!(report.persisted);
    assert_eq!(report.applied("mapping"), Some(Applied::Built));
    assert_eq!(report.applied("content"), Some(Applied::Built));

    let content = state.structured().expect("content");
    assert_eq!(content.labware_count(), 2);
    assert_eq!(content.labwares[0].labware_id, "Labware 1");
    assert_eq!(content.labwares[1].position, 1);
    assert_eq!(
        content.labwares[0].addresses["B:1"].value("gender"),
        Some("female")
    );
    assert_eq!(store.saved("manifest-1"), std::slice::from_ref(content));
}

#[test]
fn repeated_position_is_fatal() {
    let source = StaticSchema::new(schema());
    let mut store = InMemoryStore::new(targets(1));
    let mut state = SharedState::new("manifest-1").with_raw(vec![
        row("Labware 1", "A:1", "male"),
        row("Labware 1", "A:1", "female"),
    ]);

    let err = ProvenanceState::new(&source, &mut store, ReconcileOptions::default())
        .apply(&mut state)
        .expect_err("duplicate");

    assert_eq!(
        err.as_content(),
        Some(&ContentError::PositionDuplicated {
            labware: "Labware 1".to_string(),
            address: "A:1".to_string(),
        })
    );
    assert!(state.structured().is_none());
    assert!(state.mapping.is_some());
    assert_eq!(store.save_count(), 0);
}

#[test]
fn missing_labware_id_reports_first_row() {
    let source = StaticSchema::new(schema());
    let mut store = InMemoryStore::new(targets(1));
    let mut state = SharedState::new("manifest-1").with_raw(vec![
        ObservedRow::new().with("Well", "A:1").with("Sex", "male"),
    ]);

    let err = ProvenanceState::new(&source, &mut store, ReconcileOptions::default())
        .apply(&mut state)
        .expect_err("no labware id");

    let content = err.as_content().expect("content error");
    assert_eq!(content, &ContentError::LabwareNotFound { row: 0 });
    assert_eq!(content.row(), Some(0));
    assert!(!state.mapping.as_ref().expect("mapping").valid);
}

#[test]
fn missing_position_reports_its_row() {
    let source = StaticSchema::new(schema());
    let mut store = InMemoryStore::new(targets(1));
    let mut state = SharedState::new("manifest-1").with_raw(vec![
        ObservedRow::new().with("Plate ID", "Labware 1"),
    ]);

    let err = ProvenanceState::new(&source, &mut store, ReconcileOptions::default())
        .apply(&mut state)
        .expect_err("no position");
    assert_eq!(
        err.as_content(),
        Some(&ContentError::PositionNotFound { row: 0 })
    );
}

#[test]
fn labware_count_must_match_targets() {
    let source = StaticSchema::new(schema());
    let mut store = InMemoryStore::new(targets(2));
    let mut state =
        SharedState::new("manifest-1").with_raw(vec![row("Labware 1", "A:1", "male")]);

    let err = ProvenanceState::new(&source, &mut store, ReconcileOptions::default())
        .apply(&mut state)
        .expect_err("count");
    assert!(matches!(
        err,
        ProvenanceError::Content(ContentError::WrongNumberLabwares {
            expected: 2,
            found: 1
        })
    ));

    let mut store = InMemoryStore::new(targets(1));
    let mut state = SharedState::new("manifest-1").with_raw(vec![
        row("Labware 1", "A:1", "male"),
        row("Labware 2", "A:1", "male"),
    ]);
    let err = ProvenanceState::new(&source, &mut store, ReconcileOptions::default())
        .apply(&mut state)
        .expect_err("count");
    assert_eq!(
        err.to_string(),
        "Expected 1 labwares in Manifest but found 2."
    );
}

#[test]
fn empty_upload_skips_the_labware_count() {
    let source = StaticSchema::new(schema());
    let mut store = InMemoryStore::new(targets(2));
    let mut state = SharedState::new("manifest-1").with_raw(Vec::new());

    let report = ProvenanceState::new(&source, &mut store, ReconcileOptions::default())
        .apply(&mut state)
        .expect("no labwares found is not a count mismatch");

    assert_eq!(state.structured().expect("content").labware_count(), 0);
    assert!(!report.valid);
    assert!(!report.persisted);
    assert_eq!(store.save_count(), 0);
}

#[test]
fn labwares_without_targets_are_counted() {
    let source = StaticSchema::new(schema());
    let mut store = InMemoryStore::new(Vec::new());
    let mut state =
        SharedState::new("manifest-1").with_raw(vec![row("Labware 1", "A:1", "male")]);

    let err = ProvenanceState::new(&source, &mut store, ReconcileOptions::default())
        .apply(&mut state)
        .expect_err("count");
    assert_eq!(
        err.as_content(),
        Some(&ContentError::WrongNumberLabwares {
            expected: 0,
            found: 1
        })
    );
    assert!(state.structured().is_none());
}

#[test]
fn second_pass_reuses_every_slot() {
    let source = StaticSchema::new(schema());
    let mut store = InMemoryStore::new(targets(1));
    let mut state =
        SharedState::new("manifest-1").with_raw(vec![row("Labware 1", "A:1", "male")]);

    let mut provenance = ProvenanceState::new(&source, &mut store, ReconcileOptions::default());
    provenance.apply(&mut state).expect("first pass");
    let after_first = state.clone();
    let report = provenance.apply(&mut state).expect("second pass");

    for step in ["schema", "services", "mapping", "content"] {
        assert_eq!(report.applied(step), Some(Applied::Cached), "{step}");
    }
    assert!(!report.persisted);
    assert_eq!(state, after_first);
    drop(provenance);
    assert_eq!(store.save_count(), 1);
}

#[test]
fn edited_mapping_rebuilds_content() {
    let source = StaticSchema::new(schema());
    let mut store = InMemoryStore::new(targets(1));
    let mut state = SharedState::new("manifest-1").with_raw(vec![
        ObservedRow::new()
            .with("Plate ID", "Labware 1")
            .with("Well", "A:1")
            .with("Donor sex", "FEMALE"),
    ]);

    let mut provenance = ProvenanceState::new(&source, &mut store, ReconcileOptions::default());
    provenance.apply(&mut state).expect("first pass");
    {
        let mapping = state.mapping.as_ref().expect("mapping");
        assert!(mapping.shown);
        assert_eq!(mapping.expected, vec!["gender".to_string()]);
    }
    assert_eq!(
        state.structured().expect("content").labwares[0].addresses["A:1"].value("gender"),
        None
    );

    let schema = state.schema.clone().expect("schema");
    let mapping = state.mapping.as_mut().expect("mapping");
    MappingState::new(&schema, mapping)
        .accept_manual("gender", "Donor sex")
        .expect("manual pairing");
    assert!(state.mapping_changed());

    let report = provenance.apply(&mut state).expect("second pass");
    assert_eq!(report.applied("mapping"), Some(Applied::Cached));
    assert_eq!(report.applied("content"), Some(Applied::Built));
    assert!(report.persisted);
    assert!(!state.mapping_changed());
    assert!(!state.mapping.as_ref().expect("mapping").shown);
    assert_eq!(
        state.structured().expect("content").labwares[0].addresses["A:1"].value("gender"),
        Some("female")
    );
    drop(provenance);
    assert_eq!(store.save_count(), 2);
}

#[test]
fn failed_rebuild_discards_previous_content() {
    let schema = ManifestSchema::new()
        .with_field(
            "supplier_plate_name",
            FieldDescriptor::new()
                .required(true)
                .with_pattern(pattern("(?i)^plate")),
        )
        .expect("schema")
        .with_field(
            "position",
            FieldDescriptor::new().with_pattern(pattern("(?i)^well$")),
        )
        .expect("schema");
    let source = StaticSchema::new(schema);
    let mut store = InMemoryStore::new(targets(1));
    let mut state = SharedState::new("manifest-1").with_raw(vec![
        ObservedRow::new().with("Plate", "Labware 1").with("Well", "A:1"),
        ObservedRow::new().with("Plate", "Labware 1").with("Well", "A:2"),
    ]);

    let mut provenance = ProvenanceState::new(&source, &mut store, ReconcileOptions::default());
    provenance.apply(&mut state).expect("first pass");
    assert_eq!(state.structured().expect("content").address_count(), 2);

    let schema = state.schema.clone().expect("schema");
    let mapping = state.mapping.as_mut().expect("mapping");
    assert!(MappingState::new(&schema, mapping).clear_mapping("position"));

    let err = provenance.apply(&mut state).expect_err("both rows fall back to one position");
    assert_eq!(
        err.as_content(),
        Some(&ContentError::PositionDuplicated {
            labware: "Labware 1".to_string(),
            address: "1".to_string(),
        })
    );
    assert!(state.structured().is_none());
    assert!(state.mapping.is_some());
    drop(provenance);
    assert_eq!(store.save_count(), 1);
}

#[test]
fn unmapped_optional_identity_fields_use_defaults() {
    let schema = ManifestSchema::new()
        .with_field(
            "supplier_plate_name",
            FieldDescriptor::new().with_pattern(pattern("plate")),
        )
        .expect("schema")
        .with_field(
            "taxon_id",
            FieldDescriptor::new()
                .required(true)
                .with_pattern(pattern("(?i)taxon")),
        )
        .expect("schema");
    let source = StaticSchema::new(schema);
    let mut store = InMemoryStore::new(targets(1));
    let config = ManifestSchemaConfig::default().with_defaults("Unnamed", "A:1");
    let mut state =
        SharedState::new("manifest-1").with_raw(vec![ObservedRow::new().with("Taxon", "9606")]);

    ProvenanceState::new(&source, &mut store, ReconcileOptions::new(config))
        .apply(&mut state)
        .expect("reconcile");

    let content = state.structured().expect("content");
    assert_eq!(content.labwares[0].labware_id, "Unnamed");
    assert_eq!(content.labwares[0].addresses["A:1"].value("taxon_id"), Some("9606"));
}

#[test]
fn invalid_mapping_is_structured_but_not_saved() {
    let schema = schema()
        .with_field(
            "supplier_name",
            FieldDescriptor::new()
                .required(true)
                .show_on_form(true)
                .with_pattern(pattern("^supplier")),
        )
        .expect("schema");
    let source = StaticSchema::new(schema);
    let mut store = InMemoryStore::new(targets(1));
    let mut state =
        SharedState::new("manifest-1").with_raw(vec![row("Labware 1", "A:1", "male")]);

    let report = ProvenanceState::new(&source, &mut store, ReconcileOptions::default())
        .apply(&mut state)
        .expect("reconcile");

    assert!(!report.valid);
    assert!(!report.persisted);
    assert!(state.structured().is_some());
    assert_eq!(store.save_count(), 0);
}

#[test]
fn dry_run_skips_the_store() {
    let source = StaticSchema::new(schema());
    let mut store = InMemoryStore::new(targets(1));
    let mut state =
        SharedState::new("manifest-1").with_raw(vec![row("Labware 1", "A:1", "male")]);

    let options = ReconcileOptions::default().with_dry_run(true);
    let report = ProvenanceState::new(&source, &mut store, options)
        .apply(&mut state)
        .expect("reconcile");

    assert!(report.valid);
    assert!(!report.persisted);
    assert_eq!(store.save_count(), 0);
}

#[test]
fn stored_contents_are_read_back_without_upload() {
    let mut contents = IndexMap::new();
    contents.insert(
        "A:1".to_string(),
        IndexMap::from([("gender".to_string(), "Male".to_string())]),
    );
    let labwares = vec![
        Labware::new("lw-1")
            .with_supplier_plate_name("Plate A")
            .with_contents(contents),
        Labware::new("lw-2").with_barcode("BC-2"),
        Labware::new("lw-3"),
    ];
    let source = StaticSchema::new(schema());
    let mut store = InMemoryStore::new(labwares);
    let mut state = SharedState::new("manifest-1");

    let report = ProvenanceState::new(&source, &mut store, ReconcileOptions::default())
        .apply(&mut state)
        .expect("reconcile");

    assert_eq!(report.applied("mapping"), Some(Applied::Absent));
    assert_eq!(report.applied("content"), Some(Applied::Built));
    assert!(report.valid);
    assert!(!report.persisted);

    let content = state.structured().expect("content");
    let ids: Vec<&str> = content
        .labwares
        .iter()
        .map(|l| l.labware_id.as_str())
        .collect();
    assert_eq!(ids, vec!["Plate A", "BC-2", "default"]);
    assert_eq!(content.labwares[0].addresses["A:1"].value("gender"), Some("male"));
    assert!(content.labwares[2].addresses.is_empty());
}

#[test]
fn value_issues_do_not_fail_the_pass() {
    let source = StaticSchema::new(schema());
    let mut store = InMemoryStore::new(targets(2));
    let mut state = SharedState::new("manifest-1").with_raw(vec![
        row("Labware 1", "A:1", "MALE"),
        row("Labware 2", "A:1", "robot"),
    ]);

    let report = ProvenanceState::new(&source, &mut store, ReconcileOptions::default())
        .apply(&mut state)
        .expect("reconcile");
    assert!(report.persisted);

    let content = state.structured().expect("content");
    assert!(!content.has_issues(0));
    assert!(content.has_issues(1));
    assert_eq!(
        content.issues,
        vec![ContentIssue::ValueNotAllowed {
            labware: 1,
            address: "A:1".to_string(),
            field: "gender".to_string(),
            value: "robot".to_string(),
            allowed: vec![
                "male".to_string(),
                "female".to_string(),
                "unknown".to_string()
            ],
        }]
    );
    assert_eq!(content.labwares[0].addresses["A:1"].value("gender"), Some("male"));
}

#[test]
fn structured_content_snapshot() {
    let source = StaticSchema::new(schema());
    let mut store = InMemoryStore::new(targets(1));
    let mut state = SharedState::new("manifest-1").with_raw(vec![
        row("Labware 1", "A:1", "female"),
        ObservedRow::new()
            .with("Plate ID", "Labware 1")
            .with("Well", "B:1")
            .with("Sex", "male")
            .with("Comment", "ignored"),
    ]);

    ProvenanceState::new(&source, &mut store, ReconcileOptions::default())
        .apply(&mut state)
        .expect("reconcile");

    insta::assert_json_snapshot!(state.structured().expect("content"), @r#"
    {
      "labwares": [
        {
          "position": 0,
          "labware_id": "Labware 1",
          "addresses": {
            "A:1": {
              "fields": {
                "supplier_plate_name": {
                  "value": "Labware 1"
                },
                "position": {
                  "value": "A:1"
                },
                "gender": {
                  "value": "female"
                }
              }
            },
            "B:1": {
              "fields": {
                "supplier_plate_name": {
                  "value": "Labware 1"
                },
                "position": {
                  "value": "B:1"
                },
                "gender": {
                  "value": "male"
                }
              }
            }
          }
        }
      ]
    }
    "#);
}
