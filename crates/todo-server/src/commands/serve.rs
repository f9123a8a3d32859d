//! Serve command handler

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use todo_core::{Config, LoadOutcome, Store};
use todo_server::{api, logging};

/// Flags that override configured values for this run
#[derive(Debug, Default)]
pub struct ServeOverrides {
    pub bind: Option<String>,
    pub data_dir: Option<PathBuf>,
}

/// Open the store and serve the HTTP API until Ctrl-C
pub async fn run(config_path: Option<&PathBuf>, overrides: ServeOverrides) -> Result<()> {
    let mut config = Config::load_with_cli_override(config_path.map(PathBuf::as_path))
        .context("Failed to load configuration")?;
    if let Some(bind) = overrides.bind {
        config.bind_addr = bind;
    }
    if let Some(data_dir) = overrides.data_dir {
        config.data_dir = data_dir;
    }

    logging::init(config.log_level.as_deref());

    let store = match Store::open(&config) {
        Ok(store) => store,
        Err(e) => {
            error!(
                recoverable = e.is_recoverable(),
                hint = e.recovery_suggestion().unwrap_or("none"),
                "Could not open store"
            );
            return Err(e).with_context(|| {
                format!("Failed to open store at {:?}", config.data_file())
            });
        }
    };
    report_load_outcome(&store);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(addr = %listener.local_addr()?, "Listening");

    api::serve(Arc::new(store), listener, shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

fn report_load_outcome(store: &Store) {
    match store.load_outcome() {
        LoadOutcome::Fresh => info!(path = %store.path().display(), "Starting with a new store"),
        LoadOutcome::Loaded { items } => info!(items, "Loaded existing todos"),
        LoadOutcome::Recovered { details, backup } => {
            let backup = backup
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".to_string());
            warn!(
                %details,
                %backup,
                "Existing data file could not be read; started empty"
            );
        }
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            // Without a signal handler, run until killed
            warn!(error = %e, "Could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}
