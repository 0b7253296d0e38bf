//! paperqc-check - Paper Quality Check service
//!
//! Stores submitted papers' check tasks and runs the asynchronous
//! title/format/content analysis pipeline against a reference corpus and an
//! optional remote AI reviewer. Clients submit a check, receive the task
//! immediately, and poll for progress and results.

use anyhow::Result;
use clap::Parser;
use paperqc_check::pipeline::CheckOrchestrator;
use paperqc_check::services::{JsonDocumentParser, QwenClient, SqliteReferenceStore};
use paperqc_check::similarity::SimilarityEngine;
use paperqc_check::AppState;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_PORT: u16 = 5730;

#[derive(Debug, Parser)]
#[command(name = "paperqc-check", about = "Paper quality check service")]
struct Cli {
    /// Data folder (database and stored documents)
    #[arg(long)]
    root_folder: Option<String>,

    /// Listen port
    #[arg(long, env = "PAPERQC_CHECK_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let toml_config = paperqc_common::config::load_toml_config().unwrap_or_default();

    // Initialize tracing; RUST_LOG overrides the configured level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(toml_config.logging.level.clone())),
        )
        .init();

    info!("Starting paperqc-check (Paper Quality Check) service");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve and prepare the data folder
    let root_folder = paperqc_common::config::resolve_root_folder(
        cli.root_folder.as_deref(),
        "PAPERQC_ROOT_FOLDER",
    );
    paperqc_common::config::ensure_root_folder(&root_folder)?;

    // Open or create the database
    let db_path = paperqc_common::config::database_path(&root_folder);
    info!("Database: {}", db_path.display());
    let db_pool = paperqc_check::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    // Optional AI reviewer, from ENV/TOML configuration
    let ai = match paperqc_check::config::resolve_ai_settings(&toml_config) {
        Some(settings) => match QwenClient::new(settings.api_key, settings.api_url, settings.model)
        {
            Ok(client) => {
                info!("AI reviewer client initialized");
                Some(Arc::new(client) as Arc<dyn paperqc_check::services::AiReviewer>)
            }
            Err(e) => {
                tracing::error!("Failed to initialize AI reviewer client: {}", e);
                None
            }
        },
        None => None,
    };

    // Wire the pipeline: explicitly constructed collaborators, no globals
    let orchestrator = Arc::new(CheckOrchestrator::new(
        db_pool.clone(),
        Arc::new(JsonDocumentParser),
        Arc::new(SqliteReferenceStore::new(db_pool.clone())),
        ai,
        Arc::new(SimilarityEngine::default()),
    ));

    let state = AppState::new(db_pool, orchestrator);
    let app = paperqc_check::build_router(state);

    let port = cli.port.unwrap_or(DEFAULT_PORT);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("Listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
