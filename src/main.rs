//! Registrar CLI
//!
//! Illustrative driver for the registrar library: assemble one training-run
//! record from a template, a configuration file, and a metrics file, then
//! append it to a delimited log.
//!
//! # Usage
//!
//! ```bash
//! # Append a run to the log
//! registrar record template.csv --config run.yaml --metrics metrics.json --out results.csv
//!
//! # Preview the assembled record without writing
//! registrar preview template.csv --config run.yaml
//!
//! # Show the field names a template defines
//! registrar fields template.csv
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::Value;

use registrar::{Error, MergePolicy, Result, RunRecorder, TemplateSchema};

/// Registrar: training-run record keeping
#[derive(Parser, Debug)]
#[command(name = "registrar")]
#[command(version)]
#[command(about = "Template-driven hyperparameter and metric logging for training runs")]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble a record and append it to a log file
    Record(RecordArgs),

    /// Print the assembled record as indented JSON
    Preview(PreviewArgs),

    /// Print the field names a template defines
    Fields(FieldsArgs),
}

/// Arguments for the record command
#[derive(Parser, Debug)]
struct RecordArgs {
    /// Template file naming the record's columns (csv, tsv, or xlsx)
    #[arg(value_name = "TEMPLATE")]
    template: PathBuf,

    /// Configuration file supplying hyperparameter values (yaml or json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON object file with performance metrics to merge
    #[arg(short, long)]
    metrics: Option<PathBuf>,

    /// Log file to create or append to
    #[arg(short, long)]
    out: PathBuf,

    /// Use this run identifier instead of the timestamp
    #[arg(long)]
    id: Option<String>,

    /// Rewrite the log instead of appending to an existing one
    #[arg(long)]
    no_append: bool,

    /// Keep metric keys the template does not name (warns per key)
    #[arg(long)]
    extend_metrics: bool,

    /// POST the record to this webhook URL after saving
    #[arg(long)]
    webhook: Option<String>,

    /// Also write the full configuration snapshot to this JSON file
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

/// Arguments for the preview command
#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Template file naming the record's columns (csv, tsv, or xlsx)
    #[arg(value_name = "TEMPLATE")]
    template: PathBuf,

    /// Configuration file supplying hyperparameter values (yaml or json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON object file with performance metrics to merge
    #[arg(short, long)]
    metrics: Option<PathBuf>,

    /// Keep metric keys the template does not name (warns per key)
    #[arg(long)]
    extend_metrics: bool,
}

/// Arguments for the fields command
#[derive(Parser, Debug)]
struct FieldsArgs {
    /// Template file to inspect (csv, tsv, or xlsx)
    #[arg(value_name = "TEMPLATE")]
    template: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Record(args) => run_record(args),
        Command::Preview(args) => run_preview(args),
        Command::Fields(args) => run_fields(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_record(args: RecordArgs) -> Result<()> {
    let mut recorder = RunRecorder::from_template(&args.template)?;
    if let Some(url) = args.webhook {
        recorder = recorder.with_webhook(url)?;
    }
    if let Some(id) = args.id {
        recorder.set_id(id);
    }
    if let Some(path) = &args.config {
        recorder.populate_from_value(load_config(path)?);
    }
    if let Some(path) = &args.metrics {
        recorder.merge_metrics(load_metrics(path)?, policy(args.extend_metrics));
    }

    recorder.save_with(&args.out, !args.no_append)?;
    println!("Recorded run {} to {}", recorder.id(), args.out.display());

    if let Some(path) = &args.snapshot {
        recorder.export_config(path)?;
        println!("Wrote configuration snapshot to {}", path.display());
    }
    if recorder.webhook().is_some() {
        recorder.notify()?;
        println!("Delivered record to webhook");
    }
    Ok(())
}

fn run_preview(args: PreviewArgs) -> Result<()> {
    let mut recorder = RunRecorder::from_template(&args.template)?;
    if let Some(path) = &args.config {
        recorder.populate_from_value(load_config(path)?);
    }
    if let Some(path) = &args.metrics {
        recorder.merge_metrics(load_metrics(path)?, policy(args.extend_metrics));
    }
    println!("{}", recorder.preview()?);
    Ok(())
}

fn run_fields(args: FieldsArgs) -> Result<()> {
    let schema = TemplateSchema::from_path(&args.template)?;
    for field in schema.fields() {
        println!("{field}");
    }
    Ok(())
}

fn policy(extend: bool) -> MergePolicy {
    if extend {
        MergePolicy::Extend
    } else {
        MergePolicy::MatchTemplate
    }
}

/// Load a configuration file as a JSON value, dispatching on extension
fn load_config(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);
    match ext.as_deref() {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&text)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display()))),
        Some("json") => Ok(serde_json::from_str(&text)?),
        _ => Err(Error::Config(format!(
            "unsupported configuration format for {} (expected yaml or json)",
            path.display()
        ))),
    }
}

/// Load a metrics file as key/value pairs; the file must hold a JSON object
fn load_metrics(path: &Path) -> Result<Vec<(String, Value)>> {
    let text = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&text)?;
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(Error::Config(format!(
            "metrics file {} must contain a JSON object",
            path.display()
        ))),
    }
}
