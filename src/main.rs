//! Course-Mirror main entry point
//!
//! This is the command-line interface for the Course-Mirror site mirror.

use anyhow::{bail, Context};
use clap::Parser;
use course_mirror::config::{load_config_with_hash, Config};
use course_mirror::crawler::crawl;
use course_mirror::output::print_statistics;
use course_mirror::url::{resolve_scope, CanonicalUrl};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Course-Mirror: a scoped documentation site mirror
///
/// Course-Mirror crawls a documentation site from a start page, stays within
/// the given URL prefixes, and writes the pages it finds plus an
/// `output.txt` report into the output directory.
#[derive(Parser, Debug)]
#[command(name = "course-mirror")]
#[command(version)]
#[command(about = "A scoped documentation site mirror", long_about = None)]
struct Cli {
    /// Start URL (overrides `[scope] start` from the config file)
    #[arg(value_name = "START")]
    start: Option<String>,

    /// Comma-separated scope prefixes (default: the start URL's host)
    #[arg(long, value_name = "PREFIXES")]
    prefix: Vec<String>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stop after fetching this many pages
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Maximum concurrent requests
    #[arg(short = 'j', long, value_name = "N")]
    concurrency: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the resolved scope without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, &cli);

    if config.scope.start.is_empty() {
        bail!("no start URL given; pass START or set [scope] start in the config file");
    }
    config.validate().context("invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_crawl(config, cli.quiet).await
    }
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

/// Command-line values win over file values
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(start) = &cli.start {
        config.scope.start = start.clone();
    }
    if !cli.prefix.is_empty() {
        config.scope.prefixes = cli.prefix.clone();
    }
    if let Some(output) = &cli.output {
        config.output.directory = output.display().to_string();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = Some(max_pages);
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_requests = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout_secs = timeout;
    }
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let start = CanonicalUrl::parse(&config.scope.start)?;
    let scope = resolve_scope(&start, &config.scope.prefixes)?;

    println!("=== Course-Mirror Dry Run ===\n");

    println!("Start URL: {}", start);

    println!("\nScope Prefixes ({}):", scope.len());
    for prefix in &scope {
        println!("  - {}", prefix);
    }

    println!("\nCrawler Configuration:");
    println!(
        "  Max concurrent requests: {}",
        config.crawler.max_concurrent_requests
    );
    println!("  Timeout: {}s", config.crawler.timeout_secs);
    match config.crawler.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unlimited"),
    }
    println!("  Cookie: {}", config.crawler.cookie);

    println!("\nPage Structure:");
    println!("  Main content: {}", config.html.main_selector);
    println!("  Navigation: {}", config.html.nav_selector);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, quiet: bool) -> anyhow::Result<()> {
    tracing::info!(
        "Mirroring {} into {}",
        config.scope.start,
        config.output.directory
    );

    match crawl(config).await {
        Ok(stats) => {
            tracing::info!("Crawl completed successfully");
            if !quiet {
                print_statistics(&stats);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
