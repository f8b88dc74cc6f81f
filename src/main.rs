use clap::{Parser, Subcommand};
use colored::*;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod init;
mod lookup;

use icd_lookup::{CodeLookupService, Config};
use init::init_config;
use lookup::{interactive_lookup, run_lookup, show_normalized, show_stats};

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Parser)]
#[command(name = "icd-lookup")]
#[command(about = "Look up specific ICD codes for a code", long_about = None)]
struct Cli {
    /// Reads a code from stdin when omitted
    #[command(subcommand)]
    command: Option<Commands>,

    /// MongoDB connection string
    #[arg(long, global = true)]
    uri: Option<String>,

    /// Database name
    #[arg(long, global = true)]
    db: Option<String>,

    /// Collection name
    #[arg(long, global = true)]
    collection: Option<String>,

    /// Year to index (repeatable)
    #[arg(long = "year", global = true)]
    years: Vec<i32>,

    /// Read documents from a JSON export instead of MongoDB
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the specific codes for a code as JSON
    Lookup {
        /// Code to look up (read from stdin if not specified)
        code: Option<String>,
    },
    /// Print the normalized form of a code
    Normalize { code: String },
    /// Build the index and report what was included and skipped
    Stats,
    /// Interactive lookup
    Shell,
    /// Initialize a new icd-lookup.toml configuration file
    Init {
        /// Overwrite existing icd-lookup.toml if present
        #[arg(long)]
        force: bool,
    },
}

/// `RUST_LOG` when set and valid, `warn` otherwise; `--verbose` raises the
/// global level to debug on top of it.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let filter = rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    if verbose {
        filter.add_directive(tracing::Level::DEBUG.into())
    } else {
        filter
    }
}

fn init_logging(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    // stdout carries the JSON result, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn apply_overrides(cli: &Cli, config: &mut Config) {
    // CLI flags override config file
    if let Some(uri) = &cli.uri {
        config.mongo_uri = uri.clone();
    }
    if let Some(db) = &cli.db {
        config.db_name = db.clone();
    }
    if let Some(collection) = &cli.collection {
        config.collection_name = collection.clone();
    }
    if !cli.years.is_empty() {
        config.years = cli.years.clone();
    }
    if let Some(snapshot) = &cli.snapshot {
        config.snapshot = Some(snapshot.clone());
    }
}

fn connect(config: &Config) -> Result<CodeLookupService, String> {
    CodeLookupService::connect(config).map_err(|e| e.to_string())
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load();
    apply_overrides(&cli, &mut config);

    let result = match cli.command {
        None => run_lookup(&config, None, &mut io::stdin().lock()),
        Some(Commands::Lookup { code }) => run_lookup(&config, code, &mut io::stdin().lock()),
        Some(Commands::Normalize { code }) => show_normalized(&code),
        Some(Commands::Stats) => connect(&config).and_then(|service| show_stats(&service)),
        Some(Commands::Shell) => connect(&config).and_then(|service| interactive_lookup(&service)),
        Some(Commands::Init { force }) => init_config(force),
    };

    if let Err(e) = result {
        eprintln!("\n{} {}", "❌".red(), e.red());
        std::process::exit(1);
    }
}
