//! Price Catalog - interactive product search over CSV price lists
//!
//! Rescans the price directory in the background and answers product name
//! queries from stdin, cheapest price per kilogram first.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use price_catalog::{
    export_html, format_table, render_json, CatalogStore, HeaderSynonyms, ProductEntry,
    RefreshConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader};

const EXIT_COMMAND: &str = "exit";

/// Product search over price lists, ranked by price per kilogram
#[derive(Parser, Debug)]
#[command(name = "price_catalog")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory containing the price files
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Seconds between directory rescans
    #[arg(long, default_value_t = 1)]
    interval_secs: u64,

    /// Only files whose name contains this text (case-insensitive) are read
    #[arg(long, default_value = "price")]
    pattern: String,

    /// JSON file with `name`, `price` and `weight` header label lists
    #[arg(long)]
    synonyms: Option<PathBuf>,

    /// HTML file the last result set is written to on exit
    #[arg(long, default_value = "output.html")]
    export: PathBuf,

    /// Run these queries once against a single scan and exit
    #[arg(short, long)]
    query: Vec<String>,

    /// Print one-shot query results as JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let synonyms = match &args.synonyms {
        Some(path) => HeaderSynonyms::from_json_file(path)?,
        None => HeaderSynonyms::default(),
    };
    let config = RefreshConfig::new(&args.dir)
        .with_interval(Duration::from_secs(args.interval_secs.max(1)))
        .with_file_pattern(&args.pattern)
        .with_synonyms(synonyms);

    log::info!("Price directory: {}", config.directory.display());

    let store = Arc::new(CatalogStore::new());

    if !args.query.is_empty() {
        return run_queries(&store, &config, &args);
    }

    store.start(config);
    let last = run_interactive(&store).await?;
    store.stop().await;

    export_html(&last, &args.export)
        .with_context(|| format!("Failed to export results to {}", args.export.display()))?;
    println!("Results saved to {}", args.export.display());
    Ok(())
}

/// One scan, one report per query
fn run_queries(store: &CatalogStore, config: &RefreshConfig, args: &Args) -> Result<()> {
    store
        .refresh_once(config)
        .with_context(|| format!("Failed to scan {}", config.directory.display()))?;

    let mut last = Vec::new();
    for query in &args.query {
        last = store.search(query);
        if args.json {
            println!("{}", render_json(&last).context("Failed to serialize results")?);
        } else {
            println!("{}", format_table(&last));
        }
    }

    export_html(&last, &args.export)
        .with_context(|| format!("Failed to export results to {}", args.export.display()))?;
    Ok(())
}

/// Prompt loop; returns the last result set once the user exits
async fn run_interactive(store: &CatalogStore) -> Result<Vec<ProductEntry>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last = Vec::new();

    loop {
        print!("Найти продукт: ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let command = match line {
            Ok(Some(command)) => command,
            Ok(None) => break,
            Err(e) => {
                log::warn!("Could not read query: {}", e);
                continue;
            }
        };

        if command.trim() == EXIT_COMMAND {
            break;
        }

        last = store.search(&command);
        println!("{}", format_table(&last));
    }

    Ok(last)
}
