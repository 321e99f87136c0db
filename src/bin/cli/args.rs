//! CLI Argument Structures
//!
//! Argument definitions and command structures for the focalcov binary.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use focalcov_rs::core::config::OracleBackend;
use focalcov_rs::FocalcovConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Focal method / test method dataset curation
#[derive(Parser)]
#[command(name = "focalcov")]
#[command(version = VERSION)]
#[command(about = "Curate focal-method / test-method pairs annotated with differential line coverage")]
#[command(long_about = "
Mine Java repositories for production methods and the tests that exercise
them, and record which focal lines one test covers that another does not.

Common Usage:

  # Unique repositories from a dataset dump (JSON Lines with max_stars_repo_name)
  focalcov repositories --input the-stack.jsonl --output repositories.jsonl

  # Clone, build, and sample coverage from a running coverage service
  focalcov coverage-samples --config run.yml --oracle-url http://localhost:8080

  # Drop duplicate samples across runs
  focalcov unique-samples --input samples.jsonl --output unique.jsonl

  # Inspect what the parser and mapper see
  focalcov parse src/main/java/com/example/App.java
  focalcov focal-methods ./guess-the-number
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Turn dataset rows into unique repository records
    Repositories(RunArgs),

    /// Clone repositories and write coverage-differenced training samples
    #[command(name = "coverage-samples")]
    CoverageSamples(RunArgs),

    /// Drop training samples whose bodies were already emitted
    #[command(name = "unique-samples")]
    UniqueSamples(RunArgs),

    /// Copy records from the loader to the sink unchanged
    Copy(RunArgs),

    /// Print the classes of one Java file as JSON
    Parse(ParseArgs),

    /// Print the focal-method samples of a checkout as JSON lines
    #[command(name = "focal-methods")]
    FocalMethods(FocalMethodsArgs),

    /// Print default configuration in YAML format
    #[command(name = "print-default-config")]
    PrintDefaultConfig,

    /// Validate a configuration file
    #[command(name = "validate-config")]
    ValidateConfig(ValidateConfigArgs),
}

/// Arguments shared by the record-processing commands
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Input JSON Lines file (overrides loader.path)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output JSON Lines file (overrides sink.path)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stop after writing this many records (overrides sink.limit)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Coverage service base URL; selects the HTTP oracle
    #[arg(long, env = "FOCALCOV_ORACLE_URL")]
    pub oracle_url: Option<String>,

    /// Coverage CLI executable; selects the CLI oracle
    #[arg(long, conflicts_with = "oracle_url")]
    pub oracle_script: Option<PathBuf>,

    /// Directory to clone repositories into
    #[arg(long)]
    pub work_dir: Option<PathBuf>,

    /// Use existing build outputs instead of compiling
    #[arg(long)]
    pub no_compile: bool,

    /// Keep duplicate training samples
    #[arg(long)]
    pub no_dedupe: bool,
}

impl RunArgs {
    /// Layer the flags over a loaded configuration.
    pub fn apply(&self, config: &mut FocalcovConfig) {
        if let Some(input) = &self.input {
            config.loader.path = input.clone();
        }
        if let Some(output) = &self.output {
            config.sink.path = output.clone();
        }
        if self.limit.is_some() {
            config.sink.limit = self.limit;
        }
        if let Some(url) = &self.oracle_url {
            config.oracle.backend = OracleBackend::Http;
            config.oracle.base_url = url.clone();
        }
        if let Some(script) = &self.oracle_script {
            config.oracle.backend = OracleBackend::Cli;
            config.oracle.script_path = script.clone();
        }
        if let Some(work_dir) = &self.work_dir {
            config.pipeline.work_dir = Some(work_dir.clone());
        }
        if self.no_compile {
            config.pipeline.compile = false;
        }
        if self.no_dedupe {
            config.pipeline.deduplicate = false;
        }
    }
}

#[derive(Args)]
pub struct ParseArgs {
    /// Java source file
    pub file: PathBuf,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args)]
pub struct FocalMethodsArgs {
    /// Checkout or module directory
    pub root: PathBuf,

    /// Configuration file (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct ValidateConfigArgs {
    /// Path to configuration file to validate
    #[arg(short, long, required = true)]
    pub config: PathBuf,

    /// Show the effective configuration
    #[arg(short, long)]
    pub verbose: bool,
}
