use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use manifest_cli::store::{JsonManifestStore, SchemaFile, read_config, read_rows};
use manifest_core::{
    ProvenanceError, ProvenanceState, ReconcileOptions, ReconcileReport, SchemaSource,
    SharedState,
};
use manifest_map::MappingEngine;
use manifest_model::{ManifestSchema, ManifestSchemaConfig, MappingResult};

use crate::cli::{MapArgs, ReconcileArgs};

const DEFAULT_MANIFEST_ID: &str = "manifest";

pub struct MapOutcome {
    pub schema: ManifestSchema,
    pub mapping: MappingResult,
}

pub fn run_map(args: &MapArgs) -> Result<MapOutcome> {
    let schema = SchemaFile::new(&args.schema).manifest_schema()?;
    let rows = read_rows(&args.rows)?;
    let mapping = MappingEngine::new(&schema).map_rows(&rows);
    Ok(MapOutcome { schema, mapping })
}

/// State after a pass together with the pass result; the state is kept even
/// when the pass failed so it can be reviewed.
pub struct ReconcileOutcome {
    pub state: SharedState,
    pub result: std::result::Result<ReconcileReport, ProvenanceError>,
}

pub fn run_reconcile(args: &ReconcileArgs, log_data: bool) -> Result<ReconcileOutcome> {
    let mut state = load_state(args)?;
    let span = info_span!("manifest", manifest_id = %state.manifest_id);
    let _guard = span.enter();

    let config = match &args.config {
        Some(path) => read_config(path)?,
        None => ManifestSchemaConfig::default(),
    };
    let options = ReconcileOptions::new(config)
        .with_log_data(log_data)
        .with_dry_run(args.dry_run);

    let source = SchemaFile::new(&args.schema);
    let mut store = JsonManifestStore::open(&args.store)?;
    let result = ProvenanceState::new(&source, &mut store, options).apply(&mut state);

    if let Some(path) = &args.output {
        write_state(path, &state)?;
        info!(path = %path.display(), "wrote state");
    }
    Ok(ReconcileOutcome { state, result })
}

fn load_state(args: &ReconcileArgs) -> Result<SharedState> {
    let mut state = match &args.state {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("read state {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("parse state {}", path.display()))?
        }
        None => SharedState::default(),
    };
    if let Some(id) = &args.manifest_id {
        state.manifest_id.clone_from(id);
    }
    if state.manifest_id.is_empty() {
        state.manifest_id = DEFAULT_MANIFEST_ID.to_string();
    }
    if let Some(path) = &args.rows {
        state.replace_raw(read_rows(path)?);
    }
    Ok(state)
}

fn write_state(path: &Path, state: &SharedState) -> Result<()> {
    let json = serde_json::to_string_pretty(state).context("serialize state")?;
    fs::write(path, json).with_context(|| format!("write state {}", path.display()))
}
