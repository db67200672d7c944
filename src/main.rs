//! @ai:module:intent CLI for the fuzzy matcher quality harness
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use fuzzy_quality::{
    config::QualityConfig,
    corpus::{CorpusLoader, Instrument, Query},
    metrics::{QualityAggregator, QualityAggregatorTrait},
    report::{ConsoleReport, ReportGenerator},
    results::MatcherResults,
    runner::QualityExecutor,
    selection::{retain_recognized, MatcherFlags, Selection},
    snapshot::SnapshotStore,
    toolchain::HarnessBuilder,
};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

const DEFAULT_CONFIG: &str = "fuzzy-quality.toml";

#[derive(Parser, Debug)]
#[command(name = "fuzzy-quality")]
#[command(about = "Compare result quality of external fuzzy matchers on a shared query set")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build and run the selected matchers, then report (default)
    Run(RunArgs),

    /// Re-render reports from existing snapshots without running matchers
    Report(RunArgs),

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        output: PathBuf,
    },
}

/// Matcher selection; none given selects everything except Ifrit.
#[derive(Args, Debug, Clone, Default)]
struct SelectionArgs {
    /// FuzzyMatcher in both edit-distance and Smith-Waterman modes
    #[arg(long)]
    fm: bool,

    /// FuzzyMatcher, edit-distance mode
    #[arg(long)]
    fm_ed: bool,

    /// FuzzyMatcher, Smith-Waterman mode
    #[arg(long)]
    fm_sw: bool,

    #[arg(long)]
    nucleo: bool,

    /// RapidFuzz with both scorers
    #[arg(long)]
    rf: bool,

    #[arg(long)]
    rf_wratio: bool,

    #[arg(long)]
    rf_partial: bool,

    #[arg(long)]
    fzf: bool,

    /// Ifrit (slow, excluded by default)
    #[arg(long)]
    ifrit: bool,
}

#[derive(Args, Debug, Clone, Default)]
struct RunArgs {
    #[command(flatten)]
    matchers: SelectionArgs,

    /// Reuse existing matcher binaries
    #[arg(long)]
    skip_build: bool,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Corpus TSV (overrides config)
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Queries TSV (overrides config)
    #[arg(long)]
    queries: Option<PathBuf>,

    /// Snapshot directory (overrides config)
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// Also write summary.json and summary.md here
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl From<&SelectionArgs> for MatcherFlags {
    fn from(args: &SelectionArgs) -> Self {
        Self {
            fm: args.fm,
            fm_ed: args.fm_ed,
            fm_sw: args.fm_sw,
            nucleo: args.nucleo,
            rf: args.rf,
            rf_wratio: args.rf_wratio,
            rf_partial: args.rf_partial,
            fzf: args.fzf,
            ifrit: args.ifrit,
        }
    }
}

impl RunArgs {
    /// @ai:effects pure
    fn selection(&self) -> Selection {
        Selection::from_flags(&MatcherFlags::from(&self.matchers), self.skip_build)
    }

    /// @ai:intent Load config and apply path overrides from the command line
    /// @ai:effects fs:read
    fn resolve_config(&self) -> Result<QualityConfig> {
        let mut config = load_or_default_config(self.config.as_deref())?;

        if let Some(corpus) = &self.corpus {
            config.paths.corpus_file = corpus.clone();
        }
        if let Some(queries) = &self.queries {
            config.paths.queries_file = queries.clone();
        }
        if let Some(scratch) = &self.scratch_dir {
            config.paths.scratch_dir = scratch.clone();
        }
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fuzzy_quality=info".parse()?),
        )
        .init();

    let known = recognized_flags(&Cli::command());
    let cli = Cli::parse_from(retain_recognized(std::env::args(), &known));

    match cli.command {
        None => run_quality(cli.run).await,
        Some(Commands::Run(args)) => run_quality(args).await,
        Some(Commands::Report(args)) => report_from_snapshots(args),
        Some(Commands::Init { output }) => init_config(output),
    }
}

/// @ai:intent Every long and short flag name clap accepts, across subcommands
/// @ai:effects pure
fn recognized_flags(cmd: &clap::Command) -> HashSet<String> {
    let mut known: HashSet<String> = ["--help", "-h", "--version", "-V"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    collect_flags(cmd, &mut known);
    known
}

fn collect_flags(cmd: &clap::Command, known: &mut HashSet<String>) {
    for arg in cmd.get_arguments() {
        if let Some(long) = arg.get_long() {
            known.insert(format!("--{long}"));
        }
        if let Some(short) = arg.get_short() {
            known.insert(format!("-{short}"));
        }
    }
    for sub in cmd.get_subcommands() {
        collect_flags(sub, known);
    }
}

/// @ai:intent Build, run, snapshot and report the selected matchers
/// @ai:effects fs:read, fs:write, process
async fn run_quality(args: RunArgs) -> Result<ExitCode> {
    let config = args.resolve_config()?;
    let selection = args.selection();

    let Some((queries, instruments)) = load_inputs(&config, true)? else {
        return Ok(ExitCode::from(1));
    };
    tracing::info!(
        "Loaded {} queries and {} instruments; matchers: {}",
        queries.len(),
        instruments.len(),
        selection.labels().join(", ")
    );

    let status = HarnessBuilder::new(&config)
        .prepare(&selection)
        .context("Failed to build matcher harnesses")?;

    let executor = QualityExecutor::new(&config, &instruments, status.filter_available);
    let results = executor.execute_all(&selection, &queries).await?;

    let store = SnapshotStore::new(&config.paths.scratch_dir);
    let mut snapshot_paths = Vec::with_capacity(results.len());
    for result in &results {
        let path = store
            .save(result.matcher, &result.table)
            .with_context(|| format!("Failed to save {} snapshot", result.matcher))?;
        snapshot_paths.push(path);
    }

    emit_reports(
        &config,
        &queries,
        instruments.len(),
        &results,
        &snapshot_paths,
        args.output.as_deref(),
    )?;
    Ok(ExitCode::SUCCESS)
}

/// @ai:intent Rebuild reports from snapshots left by an earlier run
/// @ai:effects fs:read, fs:write
fn report_from_snapshots(args: RunArgs) -> Result<ExitCode> {
    let config = args.resolve_config()?;
    let selection = args.selection();

    let Some((queries, instruments)) = load_inputs(&config, false)? else {
        return Ok(ExitCode::from(1));
    };

    let store = SnapshotStore::new(&config.paths.scratch_dir);
    let mut results = Vec::new();
    let mut snapshot_paths = Vec::new();

    for matcher in &selection.matchers {
        let path = store.path_for(*matcher);
        if !path.exists() {
            tracing::warn!("No snapshot for {} at {}, skipping", matcher, path.display());
            continue;
        }
        let table = store
            .load(*matcher)
            .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
        results.push(MatcherResults::new(*matcher, table));
        snapshot_paths.push(path);
    }

    emit_reports(
        &config,
        &queries,
        instruments.len(),
        &results,
        &snapshot_paths,
        args.output.as_deref(),
    )?;
    Ok(ExitCode::SUCCESS)
}

/// @ai:intent Check and load the query set and corpus
/// @ai:post `None` after printing a diagnostic when a required file is missing
/// @ai:effects fs:read
fn load_inputs(
    config: &QualityConfig,
    corpus_required: bool,
) -> Result<Option<(Vec<Query>, Vec<Instrument>)>> {
    let corpus_path = config.paths.corpus_file.as_path();
    let queries_path = config.paths.queries_file.as_path();

    let mut required = vec![("queries", queries_path)];
    if corpus_required {
        required.insert(0, ("corpus", corpus_path));
    }
    for (kind, path) in required {
        if let Err(e) = CorpusLoader::require(kind, path) {
            println!("Error: {}", e);
            return Ok(None);
        }
    }

    let loader = CorpusLoader::new();
    let queries = loader
        .load_queries(queries_path)
        .with_context(|| format!("Failed to read {}", queries_path.display()))?;
    let instruments = if corpus_path.is_file() {
        loader
            .load_instruments(corpus_path)
            .with_context(|| format!("Failed to read {}", corpus_path.display()))?
    } else {
        vec![]
    };

    Ok(Some((queries, instruments)))
}

/// @ai:intent Aggregate, print the console report and write optional file reports
/// @ai:effects fs:write
fn emit_reports(
    config: &QualityConfig,
    queries: &[Query],
    corpus_size: usize,
    results: &[MatcherResults],
    snapshot_paths: &[PathBuf],
    output: Option<&Path>,
) -> Result<()> {
    let summary = QualityAggregator::new().aggregate(queries, results, corpus_size);

    let report = ConsoleReport {
        summary: &summary,
        queries,
        results,
        snapshot_paths,
        column_width: config.run.column_width,
    };
    print!("{}", report.to_text()?);

    if let Some(dir) = output {
        ReportGenerator::new().generate_all(&summary, dir)?;
        println!("Reports written to {}", dir.display());
    }
    Ok(())
}

/// @ai:intent Initialize default configuration file
/// @ai:effects fs:write
fn init_config(output: PathBuf) -> Result<ExitCode> {
    let config = QualityConfig::default();
    config.save(&output)?;
    println!("Configuration saved to {}", output.display());
    Ok(ExitCode::SUCCESS)
}

/// @ai:intent Load configuration or use defaults
/// @ai:effects fs:read
fn load_or_default_config(path: Option<&Path>) -> Result<QualityConfig> {
    match path {
        Some(p) => QualityConfig::load(p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => {
            let default_path = PathBuf::from(DEFAULT_CONFIG);

            if default_path.exists() {
                QualityConfig::load(&default_path)
                    .with_context(|| format!("Failed to load config {}", default_path.display()))
            } else {
                Ok(QualityConfig::default())
            }
        }
    }
}
