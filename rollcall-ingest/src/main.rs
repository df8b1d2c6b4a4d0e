//! rollcall-ingest - Roster and attendance ingest service
//!
//! Accepts roster and attendance batches from the spreadsheet-side exporter,
//! reconciles them against the user directory and records attendance events.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use rollcall_common::config::{RootFolderInitializer, RootFolderResolver};
use rollcall_ingest::AppState;

/// Default listen port
const DEFAULT_PORT: u16 = 5780;

#[derive(Debug, Parser)]
#[command(name = "rollcall-ingest", about = "Roster and attendance ingest service")]
struct Cli {
    /// Root folder holding the database (overrides env and config file)
    #[arg(long)]
    root_folder: Option<String>,

    /// Listen port
    #[arg(long, env = "ROLLCALL_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Build identification immediately after tracing init, before any
    // database delays
    info!(
        "Starting rollcall-ingest v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    // Resolve root folder: CLI arg > env var > config file > default
    let resolver = RootFolderResolver::new(cli.root_folder.as_deref());
    let root_folder = resolver.resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer.ensure_directory_exists()?;

    let db_path = initializer.database_path();
    info!("Database path: {}", db_path.display());

    let pool = rollcall_common::db::init_database(&db_path).await?;
    info!("Database connection established");

    let state = AppState::new(pool);
    let app = rollcall_ingest::build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", cli.port)).await?;
    info!("rollcall-ingest listening on http://127.0.0.1:{}", cli.port);
    info!("Health check: http://127.0.0.1:{}/health", cli.port);

    axum::serve(listener, app).await?;

    Ok(())
}
