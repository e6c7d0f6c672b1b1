//! CLI argument definitions for the manifest reconciler.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "manifest",
    version,
    about = "Reconcile uploaded labware manifests against a schema",
    long_about = "Match spreadsheet headers to the fields a manifest schema expects,\n\
                  then structure the rows by labware and position."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow cell values in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Match the headers of an upload to the schema fields.
    Map(MapArgs),

    /// Run a full reconciliation pass and save valid content.
    Reconcile(ReconcileArgs),
}

#[derive(Parser)]
pub struct MapArgs {
    /// Schema JSON file.
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: PathBuf,

    /// Uploaded rows as a JSON array of objects.
    #[arg(long = "rows", value_name = "FILE")]
    pub rows: PathBuf,

    /// How to print the mapping.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Parser)]
pub struct ReconcileArgs {
    /// Schema JSON file.
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: PathBuf,

    /// Uploaded rows as a JSON array of objects. Without rows, content is
    /// read back from the stored labwares.
    #[arg(long = "rows", value_name = "FILE")]
    pub rows: Option<PathBuf>,

    /// Store directory holding `labwares.json`.
    #[arg(long = "store", value_name = "DIR")]
    pub store: PathBuf,

    /// State from an earlier pass, for example with an edited mapping.
    #[arg(long = "state", value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Manifest identifier (default: the one in --state, else "manifest").
    #[arg(long = "manifest-id", value_name = "ID")]
    pub manifest_id: Option<String>,

    /// Reconciliation settings in TOML.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run the pass without saving content.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Write the resulting state as JSON.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
