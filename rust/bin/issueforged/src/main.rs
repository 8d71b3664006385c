//! `issueforged`: the IssueForge API server.
//!
//! Usage:
//!   DATABASE_URL=sqlite://issues.db issueforged [--listen <addr>]
//!
//! The store connection string is required; the server refuses to start
//! without it or when the store cannot be opened.

mod routes;
mod shutdown;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use issueforge_core::config::{DATABASE_URL_ENV, LISTEN_ENV};
use issueforge_core::{Module, ServiceConfig};
use issueforge_sql::{SQLStore, SqliteStore};
use tracing::{error, info};

/// IssueForge API server.
#[derive(Parser, Debug)]
#[command(name = "issueforged", about = "IssueForge API server", version)]
struct Cli {
    /// Store connection string (sqlite://<path>, sqlite::memory:, or a file path).
    #[arg(long = "database-url", env = DATABASE_URL_ENV, hide_env_values = true)]
    database_url: Option<String>,

    /// Listen address (default 0.0.0.0:5000).
    #[arg(long = "listen", env = LISTEN_ENV)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let config = ServiceConfig::new(cli.database_url, cli.listen).inspect_err(|e| {
        error!("{e}");
    })?;

    // Open the store once; every module shares this handle.
    let sql: Arc<dyn SQLStore> = Arc::new(
        SqliteStore::connect(&config.database_url)
            .inspect_err(|e| error!("store connection error: {e}"))
            .context("failed to open issue store")?,
    );

    let issue_module = issueforge_issue::IssueModule::new(Arc::clone(&sql))?;
    info!("Issue module initialized");

    let module_routes = vec![(issue_module.name(), issue_module.routes())];
    let app = routes::build_router(module_routes);

    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    info!("IssueForge server listening on {}", config.listen);
    info!("API endpoint: http://{}/api/issues", config.listen);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::signal())
        .await;

    // Release the store whether or not the server exited cleanly.
    if let Err(e) = sql.close() {
        error!("failed to close store: {e}");
    }

    served?;
    info!("server stopped");
    Ok(())
}
