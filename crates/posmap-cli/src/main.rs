//! CLI application for mapping document positions to product numbers.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, import_lookup, lookup, reconcile, segment};

/// posmap - Map numbered document positions to product numbers
#[derive(Parser)]
#[command(name = "posmap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a document into numbered entries
    Segment(segment::SegmentArgs),

    /// Reconcile a document with the product mapping tables
    Reconcile(reconcile::ReconcileArgs),

    /// Reconcile multiple documents
    Batch(batch::BatchArgs),

    /// Query the lookup table
    Lookup(lookup::LookupArgs),

    /// Load a lookup CSV into the staging database
    ImportLookup(import_lookup::ImportLookupArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Segment(args) => segment::run(args),
        Commands::Reconcile(args) => reconcile::run(args, config_path),
        Commands::Batch(args) => batch::run(args, config_path),
        Commands::Lookup(args) => lookup::run(args, config_path),
        Commands::ImportLookup(args) => import_lookup::run(args, config_path),
        Commands::Config(args) => config::run(args, config_path),
    }
}
