//! Course-Mirror main entry point
//!
//! This is the command-line interface for the course site mirror.

use anyhow::{bail, Context};
use clap::Parser;
use course_mirror::config::{parse_config_with_hash, validate, Config};
use course_mirror::crawler::mirror;
use course_mirror::output::print_summary;
use course_mirror::RunStatus;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Course-Mirror: an offline mirror for a batch/chapter course site
///
/// Fetches the batch listing, every batch page and every chapter's lecture
/// and notes views, and writes them as a navigable folder tree.
#[derive(Parser, Debug)]
#[command(name = "course-mirror")]
#[command(version = "1.0.0")]
#[command(about = "Mirror a batch/chapter course site to a local folder tree", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Root listing URL (overrides the config file)
    #[arg(long, value_name = "URL")]
    root_url: Option<String>,

    /// Output directory (overrides the config file)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the planned layout without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Exit with a non-zero status when any page could not be mirrored
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let failed = handle_mirror(&config).await?;
    if cli.strict && failed {
        bail!("mirror finished with failures");
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("course_mirror=info,warn"),
            1 => EnvFilter::new("course_mirror=debug,info"),
            2 => EnvFilter::new("course_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies overrides, and validates
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = parse_config_with_hash(path)
                .with_context(|| format!("load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => match (&cli.root_url, &cli.output_dir) {
            (Some(root_url), Some(output_dir)) => {
                Config::new(root_url.clone(), output_dir.display().to_string())
            }
            _ => bail!("either a CONFIG file or both --root-url and --output-dir are required"),
        },
    };

    if let Some(root_url) = &cli.root_url {
        config.mirror.root_url = root_url.clone();
    }
    if let Some(output_dir) = &cli.output_dir {
        config.mirror.output_dir = output_dir.display().to_string();
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the resolved config and planned layout
fn handle_dry_run(config: &Config) {
    println!("=== Course-Mirror Dry Run ===\n");

    println!("Mirror:");
    println!("  Root URL: {}", config.mirror.root_url);
    println!("  Output directory: {}", config.mirror.output_dir);
    println!(
        "  Inter-batch delay: {}ms",
        config.mirror.inter_batch_delay_ms
    );

    println!("\nFetch:");
    println!("  Max attempts: {}", config.fetch.max_retries);
    println!("  Retry delay: {}ms", config.fetch.retry_delay_ms);
    println!("  Timeout: {}ms", config.fetch.timeout_ms);
    println!("  User agent: {}", config.fetch.user_agent);
    println!(
        "  TLS certificate validation: {}",
        if config.fetch.accept_invalid_certs {
            "disabled"
        } else {
            "enabled"
        }
    );

    println!("\nPlanned layout:");
    println!("  index.html");
    println!("  <Batch>/index.html");
    println!("  <Batch>/batch_details.html");
    println!("  <Batch>/<Chapter>/Lectures/index.html");
    println!("  <Batch>/<Chapter>/Notes/index.html");

    println!("\n✓ Configuration is valid");
}

/// Handles the main mirror operation; returns whether anything failed
async fn handle_mirror(config: &Config) -> anyhow::Result<bool> {
    tracing::info!("{}", "=".repeat(60));
    tracing::info!("Main URL: {}", config.mirror.root_url);
    tracing::info!("Base Directory: {}", config.mirror.output_dir);
    tracing::info!("{}", "=".repeat(60));

    let summary = mirror(config).await.context("mirror run failed")?;

    match summary.status {
        RunStatus::NoContent => tracing::info!("No batches found; nothing to mirror"),
        RunStatus::Completed => tracing::info!("Mirroring completed"),
    }

    println!();
    print_summary(&summary);

    Ok(summary.has_failures())
}
