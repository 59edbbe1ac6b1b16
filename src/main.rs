//! Webpulse main entry point
//!
//! This is the command-line interface for the Webpulse page surveyor.

use anyhow::Context;
use clap::Parser;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use webpulse::config::{load_config_with_hash, validate, Config};
use webpulse::crawler::run_pipeline;
use webpulse::output::write_reports;

/// Webpulse: a concurrent page surveyor
///
/// Fetches a list of pages with a bounded worker pool, retries failures with
/// exponential backoff, and writes a JSON report plus a text summary of each
/// page's title, headings and description.
#[derive(Parser, Debug)]
#[command(name = "webpulse")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent page surveyor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Target URL to survey; repeat to give several (replaces the configured list)
    #[arg(short, long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// Number of concurrent workers
    #[arg(short, long)]
    concurrency: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be fetched without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) = resolve_config(&cli)?;

    setup_logging(cli.verbose, cli.quiet, config.output.log_path.as_deref())?;
    tracing::info!("Scraper started");
    if let Some(hash) = &config_hash {
        tracing::info!("Configuration loaded (hash: {})", hash);
    }

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let token = CancellationToken::new();
    spawn_interrupt_handler(token.clone());

    let report = run_pipeline(&config, token)
        .await
        .context("pipeline failed to start")?;

    write_reports(&report, &config.output).context("failed to write reports")?;
    println!(
        "Results saved to {} and {}",
        config.output.results_path.display(),
        config.output.summary_path.display()
    );

    tracing::info!("Session ended");
    Ok(())
}

/// Loads the configuration file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<(Config, Option<String>)> {
    let (mut config, hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path).with_context(|| {
                format!("failed to load configuration from {}", path.display())
            })?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if !cli.urls.is_empty() {
        config.targets.urls = cli.urls.clone();
    }
    if let Some(concurrency) = cli.concurrency {
        config.scraper.concurrency = concurrency;
    }

    validate(&config).context("invalid configuration")?;
    Ok((config, hash))
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Events always go to stderr; when a log path is configured they are also
/// appended to that file without ANSI colors.
fn setup_logging(verbose: u8, quiet: bool, log_path: Option<&Path>) -> anyhow::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webpulse=info,warn"),
            1 => EnvFilter::new("webpulse=debug,info"),
            2 => EnvFilter::new("webpulse=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let file_layer = match log_path {
        Some(path) => {
            let file = open_log_file(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(())
}

/// Opens the log file for appending, creating missing parent directories
fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// Cancels the pipeline on Ctrl-C; interrupted jobs are reported as failures
fn spawn_interrupt_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, cancelling in-flight requests");
            token.cancel();
        }
    });
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) {
    println!("=== Webpulse Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Concurrency: {}", config.scraper.concurrency);
    println!(
        "  Request timeout: {}s",
        config.scraper.request_timeout_secs
    );
    println!("  Max attempts: {}", config.scraper.max_attempts);
    println!("  Backoff base: {}s", config.scraper.backoff_base_secs);
    println!("  User agent: {}", config.scraper.user_agent);
    match config.scraper.deadline() {
        Some(deadline) => println!("  Deadline: {}s", deadline.as_secs()),
        None => println!("  Deadline: none"),
    }

    println!("\nOutput:");
    println!("  Results: {}", config.output.results_path.display());
    println!("  Summary: {}", config.output.summary_path.display());
    if let Some(log_path) = &config.output.log_path {
        println!("  Log file: {}", log_path.display());
    }

    println!("\nTargets ({}):", config.targets.urls.len());
    for url in &config.targets.urls {
        println!("  - {}", webpulse::url::ensure_scheme(url));
    }

    println!("\n✓ Configuration is valid");
}
