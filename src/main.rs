//! Podscout main entry point
//!
//! This is the command-line interface for the podscout feed discovery
//! crawler.

use clap::Parser;
use podscout::config::load_config_with_hash;
use podscout::crawler::{categories_from_config, Coordinator};
use podscout::storage::FeedStore;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Podscout: a podcast directory feed discovery crawler
///
/// Podscout walks a podcast directory site category by category, resolves
/// every newly discovered podcast identifier against a metadata lookup API,
/// and stores the resulting feed URLs in a durable identity cache so
/// repeated runs never redo known work.
#[derive(Parser, Debug)]
#[command(name = "podscout")]
#[command(version = "1.0.0")]
#[command(about = "A podcast directory feed discovery crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Loop over all categories forever instead of a single pass
    #[arg(long)]
    daemon: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Validate config and show what would be crawled without any network calls
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the identity cache and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Keep the non-blocking writer alive for the lifetime of the process
    let _guard = setup_logging(cli.verbose, cli.quiet, cli.log.as_deref());

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_crawl(config, config_hash, cli.daemon).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(
    verbose: u8,
    quiet: bool,
    log: Option<&Path>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("podscout=info,warn"),
            1 => EnvFilter::new("podscout=debug,info"),
            2 => EnvFilter::new("podscout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    if let Some(path) = log {
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file_name = path.file_name().unwrap_or_else(|| OsStr::new("podscout.log"));

        let appender = tracing_appender::rolling::never(directory, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
            .init();

        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .init();

        None
    }
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &podscout::config::Config) {
    println!("=== Podscout Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!(
        "  Request timeout: {}s",
        config.crawler.request_timeout_secs
    );
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nLookup:");
    println!("  Base URL: {}", config.lookup.base_url);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    let categories = categories_from_config(&config.categories);
    println!("\nCategories ({}):", categories.len());
    for category in &categories {
        println!("  - {} ({})", category.name, category.url);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would crawl {} categories across 26 letter sections each",
        categories.len()
    );
}

/// Handles the --stats mode: shows statistics from the identity cache
fn handle_stats(config: &podscout::config::Config) -> Result<(), Box<dyn std::error::Error>> {
    use podscout::storage::open_storage;

    println!("Database: {}\n", config.output.database_path);

    let store = open_storage(Path::new(&config.output.database_path))?;

    println!("Cached feeds: {}", store.count_feeds()?);

    match store.get_latest_run()? {
        Some(run) => {
            println!("Latest run: {} ({})", run.id, run.status.to_db_string());
            println!("  Started:  {}", run.started_at);
            if let Some(finished) = run.finished_at {
                println!("  Finished: {}", finished);
            }
            println!("  New feeds: {}", store.count_feeds_for_run(run.id)?);
        }
        None => println!("No runs recorded yet"),
    }

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: podscout::config::Config,
    config_hash: String,
    daemon: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if daemon {
        tracing::info!("Starting crawl in daemon mode (loop until stopped)");
    } else {
        tracing::info!("Starting single crawl pass");
    }

    let mut coordinator = Coordinator::new(config, config_hash)?;

    if daemon {
        // Ctrl-C finishes the current pass instead of killing it mid-category
        let stop = coordinator.stop_flag();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl-C received; stopping after the current pass");
                stop.store(true, std::sync::atomic::Ordering::Relaxed);
            }
        });
    }

    match coordinator.run(daemon).await {
        Ok(()) => {
            tracing::info!("Crawl completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
