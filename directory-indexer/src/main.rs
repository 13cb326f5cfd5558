//! Directory Indexer Main Entry Point
//!
//! This is the main binary for the employee directory sync. It fetches
//! records from the people-directory API, geocodes office addresses, and
//! indexes the results into OpenSearch.

use std::path::PathBuf;

use clap::Parser;
use dotenv::dotenv;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use directory_indexer::{Dependencies, Settings, SyncError};

#[derive(Parser)]
#[command(name = "directory-indexer")]
#[command(about = "Sync employee directory records into a search index")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "directory-indexer.yml")]
    config: PathBuf,

    /// Sync only the employee with this email address
    #[arg(long)]
    email: Option<String>,

    /// Drop and recreate the search index before writing
    #[arg(long)]
    recreate_index: bool,
}

/// Initialize tracing/logging.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("directory_indexer=info,directory_api=info,geocode=info,directory_indexer_repository=info")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
        .init();

    info!(
        service_name = "directory-indexer",
        service_version = env!("CARGO_PKG_VERSION"),
        "Tracing initialized with console output"
    );
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), SyncError> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize tracing
    init_tracing();

    info!("Starting directory indexer");

    let args = Args::parse();

    let settings = Settings::from_file(&args.config)?;

    // Initialize dependencies
    let mut deps = match Dependencies::new(settings, args.email, args.recreate_index) {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    // Run the orchestrator
    match deps.orchestrator.run().await {
        Ok(summary) => {
            info!(
                records_fetched = summary.records_fetched,
                documents_written = summary.documents_written,
                "Directory sync completed successfully"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Directory sync failed");
            Err(e)
        }
    }
}
