//! Pointer Analysis CLI
//!
//! Loads a JSON program description, runs the analysis and prints the report.
//!
//! # Usage
//!
//! ```bash
//! # Default configuration (1-call-site)
//! cargo run --bin pta-cli -- --program demos/sample.json
//!
//! # YAML config, then command-line overrides
//! cargo run --bin pta-cli -- --program demos/sample.json --config pta.yaml --depth 2
//!
//! # One run per entry point, JSON output
//! cargo run --bin pta-cli -- --program demos/sample.json --per-entry --format json
//! ```
//!
//! Logging goes to stderr and follows `RUST_LOG` (default `codegraph_pta=info`).

use clap::{Parser, ValueEnum};
use codegraph_pta::config::{ContextKind, Preset, PtaConfig};
use codegraph_pta::{ParallelAnalyzer, PointerAnalysis, Program};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "pta-cli")]
#[command(about = "Context-sensitive pointer analysis over a JSON program", long_about = None)]
struct Cli {
    /// Program description (JSON)
    #[arg(short, long)]
    program: PathBuf,

    /// Configuration file (YAML v1)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Preset: fast, balanced, thorough (ignored with --config)
    #[arg(long)]
    preset: Option<String>,

    /// Context sensitivity: callsite, object, insensitive
    #[arg(long)]
    context: Option<String>,

    /// Context depth k
    #[arg(long)]
    depth: Option<usize>,

    /// Stop after this many propagated facts
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Analyze each entry point separately, in parallel
    #[arg(long)]
    per_entry: bool,

    /// Worker threads for --per-entry
    #[arg(long)]
    threads: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("codegraph_pta=info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_config(cli: &Cli) -> Result<PtaConfig, Box<dyn std::error::Error>> {
    let mut config = match (&cli.config, &cli.preset) {
        (Some(path), _) => PtaConfig::from_yaml_file(path)?,
        (None, Some(name)) => PtaConfig::from_preset(Preset::from_str(name)?),
        (None, None) => PtaConfig::default(),
    };
    if let Some(kind) = &cli.context {
        config = config.context(ContextKind::from_str(kind)?);
    }
    if let Some(depth) = cli.depth {
        config = config.depth(depth);
    }
    if cli.max_iterations.is_some() {
        config = config.max_iterations(cli.max_iterations);
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    let config = build_config(&cli)?;
    let program = Program::from_json_file(&cli.program)?;

    if cli.per_entry {
        let mut analyzer = ParallelAnalyzer::new(config);
        if let Some(threads) = cli.threads {
            analyzer = analyzer.with_threads(threads);
        }
        let reports = analyzer.analyze_entry_points(Arc::new(program))?;
        match cli.format {
            Format::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
            Format::Text => {
                for entry in &reports {
                    println!("== {} ==", entry.entry);
                    println!("{}", entry.report.render_text());
                }
            }
        }
        return Ok(());
    }

    let mut pta = PointerAnalysis::new(program, config)?;
    pta.solve()?;
    let report = pta.report();
    match cli.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        Format::Text => print!("{}", report.render_text()),
    }
    Ok(())
}
