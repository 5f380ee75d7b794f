use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;

use trialscope_lib::config;
use trialscope_lib::review::{records_for_reviewer, review_rows, ReviewCorrection, RowSuggestion};
use trialscope_lib::{ClinicalTrialsClient, RecordInput, ReferenceTables, ReviewEngine, TrialRegistry};

#[derive(Parser, Debug)]
#[command(name = "trialscope", version, about = "Suggest review labels for clinical-trial records")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a JSON array of records and print suggestions as JSON.
    Classify(ClassifyArgs),
    /// Apply reviewer corrections to saved suggestions and print decisions.
    Apply(ApplyArgs),
}

#[derive(Args, Debug)]
struct ClassifyArgs {
    /// JSON file holding an array of records.
    #[arg(long)]
    records: PathBuf,

    /// Directory with the reference tables (defaults to the app data dir).
    #[arg(long)]
    reference_dir: Option<PathBuf>,

    /// Only classify records assigned to this reviewer.
    #[arg(long)]
    reviewer: Option<String>,

    /// Query ClinicalTrials.gov for active trials.
    #[arg(long)]
    registry: bool,

    #[arg(long)]
    pretty: bool,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    /// Suggestions previously printed by `classify`.
    #[arg(long)]
    suggestions: PathBuf,

    /// JSON array of `{record_id, inclusion?, relevance?, comment?}`.
    /// Labels may use sheet spellings ("Likely Relevant").
    #[arg(long)]
    corrections: PathBuf,

    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    trialscope_lib::init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Classify(args) => classify(args),
        Commands::Apply(args) => apply(args),
    }
}

fn classify(args: ClassifyArgs) -> anyhow::Result<()> {
    let reference_dir = args.reference_dir.unwrap_or_else(config::reference_dir);
    let tables = ReferenceTables::load(&reference_dir)
        .with_context(|| format!("loading reference tables from {}", reference_dir.display()))?;

    let records: Vec<RecordInput> = read_json(&args.records)?;
    let selected: Vec<RecordInput> = match args.reviewer.as_deref() {
        Some(name) => records_for_reviewer(&records, name).into_iter().cloned().collect(),
        None => records,
    };

    let client = if args.registry {
        Some(ClinicalTrialsClient::from_env().context("building registry client")?)
    } else {
        None
    };

    let mut engine = ReviewEngine::new(&tables);
    if let Some(client) = client.as_ref() {
        engine = engine.with_registry(client as &dyn TrialRegistry);
    }

    let suggestions = engine.suggest_all(&selected);
    tracing::info!(count = suggestions.len(), "Classification finished");

    print_json(&suggestions, args.pretty)
}

fn apply(args: ApplyArgs) -> anyhow::Result<()> {
    let suggestions: Vec<RowSuggestion> = read_json(&args.suggestions)?;
    let corrections: Vec<ReviewCorrection> = read_json(&args.corrections)?;

    let decisions = review_rows(&suggestions, &corrections);
    print_json(&decisions, args.pretty)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("serializing output")?;
    println!("{out}");
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}
