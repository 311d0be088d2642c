//! mirror-api - Mirror of Dreams artifact and record service
//!
//! Renders tone artifacts as PNG and manages the legacy receipt, gift and
//! registration records. Default port: 5750.

use std::fs::OpenOptions;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use mirror_api::{build_router, AppState};
use mirror_art::{ArtifactGenerator, FontBook};
use mirror_common::api::auth::load_shared_secret;
use mirror_common::config::{
    BootstrapConfig, CliOverrides, LoggingConfig, RootFolderInitializer, StorageBackend,
    TomlConfig,
};
use mirror_common::store::open_store;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for mirror-api
#[derive(Parser, Debug)]
#[command(name = "mirror-api")]
#[command(about = "Mirror of Dreams artifact and record service")]
#[command(version)]
struct Args {
    /// Configuration file (default: platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Root folder holding mirror.db
    #[arg(short, long, env = "MIRROR_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "MIRROR_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    bind: Option<String>,

    /// Storage backend: sqlite or memory
    #[arg(long)]
    storage: Option<StorageBackend>,

    /// TTF/OTF font for artifact text
    #[arg(long)]
    font_path: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            root_folder: self.root_folder.clone(),
            bind_address: self.bind.clone(),
            port: self.port,
            storage: self.storage,
            font_path: self.font_path.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = TomlConfig::load_or_default(args.config.as_deref())
        .context("Failed to load configuration file")?;
    let config = BootstrapConfig::resolve(args.overrides(), toml_config);

    init_tracing(&config.logging)?;

    // Log build identification immediately after tracing init
    info!(
        "Starting Mirror of Dreams API (mirror-api) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let initializer = RootFolderInitializer::new(config.root_folder.clone());
    initializer
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;
    info!("Root folder: {}", initializer.root_folder().display());

    let db_path = config.database_path();
    if config.storage == StorageBackend::Sqlite {
        info!("Database: {}", db_path.display());
    }
    let store = open_store(config.storage, &db_path)
        .await
        .context("Failed to open record storage")?;
    info!("Storage backend: {}", store.backend_name());

    let shared_secret = load_shared_secret(store.as_ref())
        .await
        .context("Failed to load shared secret")?;
    if shared_secret == 0 {
        warn!("Admin authentication disabled (shared_secret = 0)");
    } else {
        info!("✓ Loaded shared secret for admin authentication");
    }

    let fonts = match &config.font_path {
        Some(path) => FontBook::from_file(path)
            .with_context(|| format!("Failed to load font {}", path.display()))?,
        None => {
            info!("No font configured; using built-in bitmap face");
            FontBook::builtin()
        }
    };

    let state = AppState::new(store, ArtifactGenerator::new(fonts), shared_secret);
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", config.bind_address, config.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("mirror-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .context("Invalid log level")?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        None => builder.init(),
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
