//! Shelfwatch main entry point
//!
//! This is the command-line interface for the Shelfwatch product scraper.

use clap::Parser;
use shelfwatch::config::{load_config_with_hash, Config};
use shelfwatch::report::TracingReporter;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Shelfwatch: product availability and price tracker
///
/// Shelfwatch reads product URLs from a CSV sheet, fetches every page
/// through a scraping proxy, and records availability, price, reviews,
/// rating and category rank for each row.
#[derive(Parser, Debug)]
#[command(name = "shelfwatch")]
#[command(version = "1.0.0")]
#[command(about = "Product availability and price tracker", long_about = None)]
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

    /// Validate config and input and show what would be scraped
    #[arg(long, conflicts_with_all = ["stats", "export"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "export"])]
    stats: bool,

    /// Write the CSV export and run report from existing data and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    export: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

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
        handle_dry_run(&config)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.export {
        handle_export(&config)?;
    } else {
        handle_scrape(&config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelfwatch=info,warn"),
            1 => EnvFilter::new("shelfwatch=debug,info"),
            2 => EnvFilter::new("shelfwatch=trace,debug"),
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

/// Handles the --dry-run mode: validates config and input without fetching
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use shelfwatch::input::load_input;
    use shelfwatch::url::normalize_product_url;

    println!("=== Shelfwatch Dry Run ===\n");

    println!("Proxy:");
    println!("  Endpoint: {}", config.proxy.endpoint);
    println!("  Timeout: {}s", config.proxy.timeout_secs);

    println!("\nRetry:");
    println!("  Max attempts: {}", config.retry.max_attempts);
    println!("  Retry delay: {}ms", config.retry.retry_delay_ms);
    println!("  Request delay: {}ms", config.batch.request_delay_ms);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    if let Some(csv_path) = &config.output.csv_path {
        println!("  CSV export: {}", csv_path);
    }
    if let Some(summary_path) = &config.output.summary_path {
        println!("  Report: {}", summary_path);
    }

    let sheet = load_input(Path::new(&config.input.path))?;
    println!(
        "\nInput: {} ({} rows, URL column '{}')",
        config.input.path,
        sheet.len(),
        sheet.url_column
    );
    for (row, raw) in sheet.urls.iter().enumerate() {
        println!("  {:>4}. {}", row + 1, normalize_product_url(raw));
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would scrape {} products", sheet.len());

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use shelfwatch::output::{load_statistics, print_statistics};
    use shelfwatch::storage::SqliteStorage;

    println!("Database: {}\n", config.output.database_path);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --export mode: rewrites the CSV export and run report
fn handle_export(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    use shelfwatch::scrape::export_outputs;
    use shelfwatch::storage::SqliteStorage;

    if config.output.csv_path.is_none() && config.output.summary_path.is_none() {
        println!("Nothing to export: set output.csv-path or output.summary-path");
        return Ok(());
    }

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    export_outputs(config, &storage)?;

    println!("✓ Export complete");

    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(
    config: &Config,
    config_hash: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Input: {}, output database: {}",
        config.input.path,
        config.output.database_path
    );

    match shelfwatch::scrape::run(config, config_hash, &TracingReporter).await {
        Ok(summary) => {
            println!("\n=== Scrape Summary ===");
            println!("  Rows processed: {}", summary.total);
            println!("  Succeeded: {}", summary.succeeded);
            println!("  Failed: {}", summary.failed);
            println!("  Out of stock: {}", summary.out_of_stock);
            if summary.write_failures > 0 {
                println!("  Rows not saved: {}", summary.write_failures);
            }
            println!("  Success rate: {:.1}%", summary.success_rate());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
