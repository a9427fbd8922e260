//! Stencil Code Generator
//!
//! Regenerates the typed resource crate from a directory of schema files.

use std::path::PathBuf;

use clap::Parser;
use stencil_gen::config::{DEFAULT_CRATE_NAME, DEFAULT_MAX_DEPTH};
use stencil_gen::errors::GeneratorError;
use stencil_gen::{GeneratorConfig, run};
use tracing_subscriber::{filter::EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Stencil code generator - turns REST resource schemas into typed Rust clients
#[derive(Parser, Debug)]
#[command(name = "stencil-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing the schema files
    #[arg(short, long)]
    schemas: PathBuf,

    /// Root of the generated crate
    #[arg(short, long, default_value = "stencil/api")]
    output: PathBuf,

    /// Deepest allowed child table nesting
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Worker threads (default: one per core)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Package name of the generated crate
    #[arg(long, default_value = DEFAULT_CRATE_NAME)]
    crate_name: String,

    /// Path of the stencil runtime, used as a path dependency in the generated manifest
    #[arg(long)]
    runtime_path: Option<PathBuf>,

    /// Write a JSON run report to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Remove previously generated sources first
    #[arg(long)]
    clean: bool,

    /// Generate and validate without writing files
    #[arg(long)]
    dry_run: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

impl From<Cli> for GeneratorConfig {
    fn from(cli: Cli) -> Self {
        Self {
            schema_root: cli.schemas,
            output_root: cli.output,
            max_depth: cli.max_depth,
            jobs: cli.jobs,
            crate_name: cli.crate_name,
            runtime_path: cli.runtime_path,
            report: cli.report,
            clean: cli.clean,
            dry_run: cli.dry_run,
        }
    }
}

/// Initialize tracing subscriber based on verbosity and output format
fn init_tracing(verbose: u8, json: bool) {
    let base_filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "warn,stencil_gen=info".to_string(),
            2 => "info,stencil_gen=debug".to_string(),
            _ => "debug,stencil_gen=trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&base_filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(verbose >= 2)
                    .with_level(true)
                    .with_file(verbose >= 3)
                    .with_line_number(verbose >= 3)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    }
}

fn main() -> Result<(), GeneratorError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let config = GeneratorConfig::from(cli);
    run(&config)?;
    Ok(())
}
