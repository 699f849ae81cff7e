//! Page-Scribe main entry point
//!
//! This is the command-line interface for the Page-Scribe web page converter.

use anyhow::Context;
use clap::Parser;
use page_scribe::config::{load_config_with_hash, parse_duration, validate, Config};
use page_scribe::crawler::run_scrape;
use page_scribe::PageReport;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Page-Scribe: turns web pages into clean Markdown
///
/// Page-Scribe fetches the given pages, extracts their main content with
/// per-site rules or a structural walk, and stores one Markdown file per
/// page. Pages with a fresh artifact are skipped unless --force is given.
#[derive(Parser, Debug)]
#[command(name = "page-scribe")]
#[command(version)]
#[command(about = "Turns web pages into clean Markdown", long_about = None)]
struct Cli {
    /// URLs to scrape, in addition to the configured seeds
    #[arg(value_name = "URL")]
    urls: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory for Markdown artifacts
    #[arg(short, long, value_name = "DIR")]
    output: Option<String>,

    /// Minimum artifact age before a page is fetched again (e.g. 12h, 30m)
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    rescrape_after: Option<std::time::Duration>,

    /// Fetch every page regardless of artifact age
    #[arg(short, long)]
    force: bool,

    /// Number of pages processed at once
    #[arg(short, long, value_name = "N")]
    parallel: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and show what would be scraped
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        config.crawler.seeds.extend(self.urls.iter().cloned());
        if let Some(output) = &self.output {
            config.output.directory = output.clone();
        }
        if let Some(rescrape_after) = self.rescrape_after {
            config.output.rescrape_after = rescrape_after;
        }
        if self.force {
            config.output.force = true;
        }
        if let Some(parallel) = self.parallel {
            config.crawler.parallel = parallel;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .inspect_err(|e| tracing::error!("Failed to load configuration: {}", e))
                .with_context(|| format!("loading {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    cli.apply_overrides(&mut config);
    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    if config.crawler.seeds.is_empty() {
        tracing::error!("No URLs to scrape; pass URLs or set crawler.seeds");
        anyhow::bail!("no URLs to scrape");
    }

    handle_scrape(&config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_scribe=info,warn"),
            1 => EnvFilter::new("page_scribe=debug,info"),
            2 => EnvFilter::new("page_scribe=trace,debug"),
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

/// Prints the effective configuration
fn print_dry_run(config: &Config) {
    println!("=== Page-Scribe Dry Run ===\n");

    println!("Crawler:");
    println!("  Parallel: {}", config.crawler.parallel);
    println!("  Timeout: {}s", config.crawler.timeout_secs);
    println!("  Restrict domain: {}", config.crawler.restrict_domain);
    println!("  Allowed domains: {:?}", config.crawler.allowed_domains);
    println!("  Ignore: {:?}", config.crawler.ignore);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  Rescrape after: {:?}", config.output.rescrape_after);
    println!("  Force: {}", config.output.force);

    let mut rule_hosts: Vec<&String> = config.rules.keys().collect();
    rule_hosts.sort();
    println!("\nExtraction Rules ({}):", rule_hosts.len());
    for host in rule_hosts {
        println!("  - {}", host);
    }

    println!("\nSeeds ({}):", config.crawler.seeds.len());
    for seed in &config.crawler.seeds {
        println!("  * {}", seed);
    }

    println!("\n✓ Configuration is valid");
}

/// Runs the scrape and prints one line per page
async fn handle_scrape(config: &Config) -> anyhow::Result<()> {
    let reports = match run_scrape(config).await {
        Ok(reports) => reports,
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            return Err(e.into());
        }
    };

    for report in &reports {
        match report {
            PageReport::Saved { url, path, links } => {
                println!("saved   {} -> {} ({} links)", url, path.display(), links.len());
                for link in links {
                    println!("        {}", link);
                }
            }
            PageReport::Skipped { url } => println!("skipped {}", url),
            PageReport::Failed { url, error } => println!("failed  {}: {}", url, error),
        }
    }

    Ok(())
}
