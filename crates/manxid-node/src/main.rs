//! Manx ID node entry point.
//!
//! Starts the credential service with configuration from a TOML file or
//! defaults.

mod api;
mod config;
mod provision;
mod sessions;
mod state;
mod storage;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use manxid_credentials::{CredentialIssuer, CredentialStore, CredentialVerifier};

use config::ManxIdConfig;
use sessions::SessionTable;
use state::AppState;
use storage::RocksStore;

/// Manx ID credential service node
#[derive(Parser, Debug)]
#[command(name = "manxid-node", version, about = "Manx ID credential service node")]
struct Args {
    /// Path to the configuration file (TOML).
    #[arg(short, long, default_value = "manxid.toml")]
    config: PathBuf,

    /// Override the API port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the data directory.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Generate a default config file and exit.
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    // Handle --init flag
    if args.init {
        let config = ManxIdConfig::default();
        config.save(&args.config)?;
        tracing::info!(path = %args.config.display(), "wrote default config");
        return Ok(());
    }

    // Load configuration
    let mut config = ManxIdConfig::load(&args.config)?;

    // Apply CLI overrides
    if let Some(port) = args.api_port {
        config.api.port = port;
    }
    if let Some(ref data_dir) = args.data_dir {
        config.storage.data_dir = data_dir.clone();
    }
    config.logging.level = args.log_level;

    tracing::info!("Manx ID node v{}", env!("CARGO_PKG_VERSION"));

    // Open the credential store
    let store: Arc<dyn CredentialStore> = Arc::new(RocksStore::open(&config.storage.data_dir)?);
    tracing::info!(path = %config.storage.data_dir.display(), "storage initialized");

    // Provision the issuer secret
    let secret = provision::load_or_generate_secret(&config.issuer.secret_path)?;

    let issuer = CredentialIssuer::new(config.issuer.name.clone(), secret.clone(), store.clone());
    let verifier = CredentialVerifier::new(secret, store.clone());

    let sessions = SessionTable::from_entries(&config.sessions);
    if sessions.is_empty() {
        tracing::warn!("no sessions configured; issuance will reject every caller");
    }

    let app_state = Arc::new(AppState::new(
        issuer,
        verifier,
        store,
        sessions,
        config.issuer.public_base_url.clone(),
    ));

    let api_addr: SocketAddr = config.api_addr().parse()?;

    // Set up graceful shutdown on SIGINT/SIGTERM
    let shutdown = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
        tracing::info!("received shutdown signal");
    };

    tokio::select! {
        result = api::start_api_server(api_addr, app_state) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP API server error");
            }
        }
        _ = shutdown => {
            tracing::info!("initiating graceful shutdown");
        }
    }

    tracing::info!("Manx ID node exited cleanly");
    Ok(())
}
