//! Command execution.

use std::io::{self, Write};
use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use focalcov_rs::core::config::OracleBackend;
use focalcov_rs::core::pipeline::{
    CoverageSamplesProcessor, IdentityProcessor, RepositoryNameProcessor, UniqueSamplesProcessor,
};
use focalcov_rs::io::{JsonLinesLoader, JsonLinesSink};
use focalcov_rs::{
    run_processor, FocalMethodFinder, FocalcovConfig, JavaParser, Processor, RunContext, RunStats,
};

use super::args::{FocalMethodsArgs, ParseArgs, RunArgs, ValidateConfigArgs};

/// Load and validate a configuration file, or the defaults when `None`.
pub fn load_configuration(path: Option<&Path>) -> anyhow::Result<FocalcovConfig> {
    let config = match path {
        Some(path) => FocalcovConfig::from_yaml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => FocalcovConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run_configuration(args: &RunArgs) -> anyhow::Result<FocalcovConfig> {
    let mut config = load_configuration(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

/// Run `processor` from the configured loader into the configured sink.
async fn run_jsonl<P>(processor: &P, config: &FocalcovConfig) -> anyhow::Result<RunStats>
where
    P: Processor,
    P::Input: DeserializeOwned + Send + 'static,
    P::Output: Serialize + 'static,
{
    let loader = JsonLinesLoader::<P::Input>::new(&config.loader.path);
    let mut sink = JsonLinesSink::create(&config.sink.path, config.sink.limit)?;
    let ctx = RunContext::from_config(config);

    info!(
        "{}: {} -> {}",
        processor.name(),
        config.loader.path.display(),
        config.sink.path.display()
    );
    let stats = run_processor(processor, &loader, &mut sink, &ctx).await?;
    println!(
        "{}: wrote {} record(s) to {} ({} read, {} failed)",
        processor.name(),
        stats.written,
        config.sink.path.display(),
        stats.loaded,
        stats.failed
    );
    Ok(stats)
}

/// Dataset rows to unique repository records
pub async fn repositories_command(args: RunArgs) -> anyhow::Result<()> {
    let config = run_configuration(&args)?;
    run_jsonl(&RepositoryNameProcessor, &config).await?;
    Ok(())
}

/// Repository records to training samples
pub async fn coverage_samples_command(args: RunArgs) -> anyhow::Result<()> {
    let config = run_configuration(&args)?;
    let processor = CoverageSamplesProcessor::from_config(config.clone())?;
    run_jsonl(&processor, &config).await?;
    Ok(())
}

/// Training samples to deduplicated training samples
pub async fn unique_samples_command(args: RunArgs) -> anyhow::Result<()> {
    let mut config = run_configuration(&args)?;
    config.pipeline.deduplicate = true;
    run_jsonl(&UniqueSamplesProcessor, &config).await?;
    Ok(())
}

/// Copy records unchanged
pub async fn copy_command(args: RunArgs) -> anyhow::Result<()> {
    let config = run_configuration(&args)?;
    run_jsonl(&IdentityProcessor::<serde_json::Value>::new(), &config).await?;
    Ok(())
}

/// Print the classes of one file
pub async fn parse_command(args: ParseArgs) -> anyhow::Result<()> {
    let source = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("reading {}", args.file.display()))?;
    let mut parser = JavaParser::new()?;
    let classes = parser.parse_source(&source, &args.file.to_string_lossy())?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&classes)?
    } else {
        serde_json::to_string(&classes)?
    };
    println!("{json}");
    Ok(())
}

/// Print the focal-method samples found under a directory
pub async fn focal_methods_command(args: FocalMethodsArgs) -> anyhow::Result<()> {
    if !args.root.is_dir() {
        anyhow::bail!("{} is not a directory", args.root.display());
    }
    let config = load_configuration(args.config.as_deref())?;
    let mut finder = FocalMethodFinder::from_config(&config)?;
    let samples = finder.find_focal_method_samples(&args.root);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for sample in samples {
        serde_json::to_writer(&mut out, &sample.detach_classes())?;
        writeln!(out)?;
    }
    Ok(())
}

/// Print default configuration in YAML format
pub async fn print_default_config() -> anyhow::Result<()> {
    println!("# Default focalcov configuration");
    println!("# Save this to a file and customize as needed");
    println!("# Usage: focalcov coverage-samples --config your-config.yml");
    println!();

    let yaml_output = serde_yaml::to_string(&FocalcovConfig::default())?;
    println!("{yaml_output}");
    Ok(())
}

/// Validate a configuration file
pub async fn validate_config(args: ValidateConfigArgs) -> anyhow::Result<()> {
    let config = load_configuration(Some(&args.config))
        .with_context(|| format!("{} is not a valid configuration", args.config.display()))?;

    println!("Configuration file is valid: {}", args.config.display());
    println!();
    let oracle = match config.oracle.backend {
        OracleBackend::Http => format!("http ({})", config.oracle.base_url),
        OracleBackend::Cli => format!("cli ({})", config.oracle.script_path.display()),
    };
    println!("  Oracle:       {oracle}, {}s timeout", config.oracle.timeout_secs);
    println!("  Input:        {}", config.loader.path.display());
    println!("  Output:       {}", config.sink.path.display());
    println!(
        "  Limit:        {}",
        config
            .sink
            .limit
            .map_or_else(|| "none".to_string(), |limit| limit.to_string())
    );
    println!("  Deduplicate:  {}", config.pipeline.deduplicate);
    println!("  Compile:      {}", config.pipeline.compile);

    if args.verbose {
        println!();
        println!("{}", serde_yaml::to_string(&config)?);
    }
    Ok(())
}
