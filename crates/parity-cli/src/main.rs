//! Log parity CLI
//!
//! Command-line tool for checking that a candidate event log reproduces a
//! baseline log within numeric tolerance.

mod render;

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use parity_core::{
    check_header, compare_logs, load_schema, read_log, split_columns, CompareConfig, LogTable,
};
use render::{write_json, write_text, ReportFile, SchemaOutcome};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "compare-logs")]
#[command(about = "Compare two instrumented trading logs for parity", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a candidate log against a baseline log
    Compare(CompareArgs),

    /// Check log headers against a schema file
    CheckSchema {
        /// Path to the schema file
        #[arg(short, long)]
        schema: PathBuf,

        /// Logs whose headers should be checked
        #[arg(required = true)]
        logs: Vec<PathBuf>,
    },

    /// Write a config file populated with the defaults
    InitConfig {
        /// Output path for the config file
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(clap::Args)]
struct CompareArgs {
    /// Path to the baseline log
    #[arg(long)]
    baseline: PathBuf,

    /// Path to the candidate log
    #[arg(long)]
    candidate: PathBuf,

    /// Optional schema file to validate both headers against
    #[arg(long)]
    schema: Option<PathBuf>,

    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Comma-separated alignment key (default: timestamp,event,ticket,op)
    #[arg(long)]
    align_key: Option<String>,

    /// Tolerance for price columns
    #[arg(long)]
    float_tol_price: Option<f64>,

    /// Tolerance for money columns
    #[arg(long)]
    float_tol_money: Option<f64>,

    /// Tolerance for lot sizes
    #[arg(long)]
    float_tol_lots: Option<f64>,

    /// Show at most N detail records
    #[arg(long)]
    max_diffs: Option<usize>,

    /// Comma-separated columns to ignore completely
    #[arg(long)]
    ignore_cols: Option<String>,

    /// Fail if row counts differ (missing/extra rows)
    #[arg(long)]
    strict_rows: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also write the JSON report to this path
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

/// Run a command; `Ok(false)` means the check ran and failed
fn run(cli: Cli) -> parity_core::Result<bool> {
    match cli.command {
        Commands::Compare(args) => cmd_compare(&args),
        Commands::CheckSchema { schema, logs } => cmd_check_schema(&schema, &logs),
        Commands::InitConfig { output } => cmd_init_config(&output),
    }
}

/// Layer command-line overrides on top of the config file (or defaults)
fn build_config(args: &CompareArgs) -> parity_core::Result<CompareConfig> {
    let mut config = match &args.config {
        Some(path) => CompareConfig::load(path)?,
        None => CompareConfig::default(),
    };

    if let Some(key) = &args.align_key {
        config.key_columns = split_columns(key);
    }
    if let Some(tol) = args.float_tol_price {
        config.tolerance_price = tol;
    }
    if let Some(tol) = args.float_tol_money {
        config.tolerance_money = tol;
    }
    if let Some(tol) = args.float_tol_lots {
        config.tolerance_lots = tol;
    }
    if let Some(max) = args.max_diffs {
        config.max_diffs = max;
    }
    if let Some(cols) = &args.ignore_cols {
        config.ignore_columns.extend(split_columns(cols));
    }
    if args.strict_rows {
        config.strict_rows = true;
    }

    Ok(config)
}

fn cmd_compare(args: &CompareArgs) -> parity_core::Result<bool> {
    let config = build_config(args)?;
    config.validate()?;

    let baseline = read_log(&args.baseline)?;
    let candidate = read_log(&args.candidate)?;
    info!(
        baseline_rows = baseline.row_count(),
        candidate_rows = candidate.row_count(),
        "logs loaded"
    );

    let schema = match &args.schema {
        Some(path) => validate_schema(path, &baseline, &candidate, args.format)?,
        None => None,
    };

    if baseline.header != candidate.header {
        warn!(
            baseline = ?baseline.header,
            candidate = ?candidate.header,
            "baseline and candidate headers differ"
        );
    }

    let report = compare_logs(&baseline, &candidate, &config)?;
    let passed = report.passed() && schema.as_ref().map_or(true, SchemaOutcome::matches);

    let file = ReportFile {
        generated_at: Utc::now(),
        baseline: args.baseline.clone(),
        candidate: args.candidate.clone(),
        schema,
        passed,
        report: &report,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Text => write_text(&mut out, &report, &config.display_names, passed)?,
        OutputFormat::Json => write_json(&mut out, &file)?,
    }

    if let Some(path) = &args.report {
        let mut writer = BufWriter::new(File::create(path)?);
        write_json(&mut writer, &file)?;
        info!(path = %path.display(), "report written");
    }

    Ok(passed)
}

/// Check both headers against the schema, printing warnings in text mode
fn validate_schema(
    path: &Path,
    baseline: &LogTable,
    candidate: &LogTable,
    format: OutputFormat,
) -> parity_core::Result<Option<SchemaOutcome>> {
    let text = format == OutputFormat::Text;

    let Some(expected) = load_schema(path)? else {
        if text {
            println!("[INFO] Could not extract header from schema; skipping header validation.");
        }
        return Ok(None);
    };

    let outcome = SchemaOutcome {
        baseline: check_header(&baseline.header, &expected),
        candidate: check_header(&candidate.header, &expected),
    };

    if text {
        for (label, check, header) in [
            ("Baseline", &outcome.baseline, &baseline.header),
            ("Candidate", &outcome.candidate, &candidate.header),
        ] {
            if !check.matches() {
                println!("[WARN] {} header does not match schema. {}: {:?}", label, label, header);
                println!("[WARN] Expected (from schema): {:?}", expected);
            }
        }
    }

    Ok(Some(outcome))
}

fn cmd_check_schema(schema: &Path, logs: &[PathBuf]) -> parity_core::Result<bool> {
    let Some(expected) = load_schema(schema)? else {
        println!("Could not extract a header from {}", schema.display());
        return Ok(false);
    };

    println!("Expected columns ({}): {}", expected.len(), expected.join(", "));
    println!();

    let mut all_ok = true;
    for path in logs {
        let table = read_log(path)?;
        let check = check_header(&table.header, &expected);

        if check.matches() {
            println!("OK    {}", path.display());
            continue;
        }

        all_ok = false;
        println!("FAIL  {}", path.display());
        if !check.missing.is_empty() {
            println!("  missing: {}", check.missing.join(", "));
        }
        if !check.unexpected.is_empty() {
            println!("  unexpected: {}", check.unexpected.join(", "));
        }
        if check.reordered {
            println!("  columns are out of order");
        }
    }

    Ok(all_ok)
}

fn cmd_init_config(output: &Path) -> parity_core::Result<bool> {
    let config = CompareConfig::default();
    config.save(output)?;

    println!("Created config file: {}", output.display());
    println!();
    println!("Edit the file to adjust keys and tolerances, then run:");
    println!(
        "  compare-logs compare --baseline <csv> --candidate <csv> --config {}",
        output.display()
    );

    Ok(true)
}
