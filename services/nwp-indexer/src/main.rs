//! NWP indexer service.
//!
//! - Prints the file tree or init times of a data source
//! - Runs the validity-time cache janitor once or on an interval

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use nwp_index::{load_sources, DataSource, FileTreeIndexer};
use vt_cache::{CacheConfig, CacheJanitor, ValidTimeCache};

#[derive(Parser, Debug)]
#[command(name = "nwp-indexer")]
#[command(about = "NWP file index and validity-time cache maintenance")]
struct Args {
    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the file tree of a data source as JSON
    Tree(SourceArgs),
    /// Print the init times of a data source
    InitTimes(SourceArgs),
    /// Delete stale validity-time cache records
    Janitor(JanitorArgs),
}

#[derive(ClapArgs, Debug)]
struct SourceArgs {
    /// Data directory (ignored when --sources is given)
    #[arg(long, env = "NWP_DATA_DIR")]
    root: Option<PathBuf>,

    /// Source grid of the files in --root
    #[arg(long, default_value = "EUR_LL015")]
    grid: String,

    /// Scan subdirectories as well
    #[arg(long)]
    recursive: bool,

    /// YAML file with a `sources:` list
    #[arg(long, env = "NWP_SOURCES")]
    sources: Option<PathBuf>,

    /// Source id to use from --sources (default: the first)
    #[arg(long)]
    source: Option<String>,
}

#[derive(ClapArgs, Debug)]
struct JanitorArgs {
    /// Sweep once and exit (vs continuous sweeping)
    #[arg(long)]
    once: bool,

    /// Cache directory (default: VALID_TIME_CACHE_DIR or the temp dir)
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Maximum record age in seconds; 0 purges everything
    #[arg(long)]
    max_age: Option<u64>,

    /// Seconds between sweeps
    #[arg(long)]
    interval: Option<u64>,
}

fn init_tracing(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn resolve_source(args: &SourceArgs) -> Result<DataSource> {
    if let Some(path) = &args.sources {
        let sources = load_sources(path)?;
        let source = match &args.source {
            Some(id) => sources.into_iter().find(|s| s.id() == id),
            None => sources.into_iter().next(),
        };
        return source.context("no matching data source in sources file");
    }

    let Some(root) = &args.root else {
        bail!("either --root or --sources is required");
    };
    Ok(DataSource::new(args.grid.clone(), root, args.grid.clone()).with_recursive(args.recursive))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level)?;

    match args.command {
        Command::Tree(source_args) => {
            let source = resolve_source(&source_args)?;
            let tree = FileTreeIndexer::default().build_file_tree(&source)?;
            info!(source = %source.id(), files = tree.len(), "Built file tree");
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
        Command::InitTimes(source_args) => {
            let source = resolve_source(&source_args)?;
            for init in FileTreeIndexer::default().init_times(&source)? {
                println!("{}", init.to_rfc3339());
            }
        }
        Command::Janitor(janitor_args) => {
            let mut config = CacheConfig::from_env();
            if let Some(dir) = janitor_args.cache_dir {
                config.cache_dir = dir;
            }
            if let Some(max_age) = janitor_args.max_age {
                config.max_age_seconds = max_age;
            }
            if let Some(interval) = janitor_args.interval {
                config.janitor_interval_secs = interval;
            }

            info!(
                cache_dir = %config.cache_dir.display(),
                max_age_seconds = config.max_age_seconds,
                "Starting cache janitor"
            );

            let interval = Duration::from_secs(config.janitor_interval_secs.max(1));
            let janitor = CacheJanitor::new(Arc::new(ValidTimeCache::new(config)));

            if janitor_args.once {
                let stats = janitor.run_once()?;
                println!("{}", serde_json::to_string(&stats)?);
            } else {
                janitor.run_forever(interval).await;
            }
        }
    }

    Ok(())
}
