//! Jiraa Daemon
//!
//! Serves the `/jiraa` issue lookup command over a Unix socket.

use anyhow::Result;
use clap::Parser;
use jiraa_core::storage::{init_config_dir, init_data_dir};
use jiraa_daemon::{ApiHandler, CommandRouter, EventManager, IpcServer, SettingsManager};
use jiraa_tracker::TrackerClient;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "jiraad")]
#[command(about = "Jiraa daemon - issue lookup slash command backend", long_about = None)]
struct Args {
    /// Socket path for IPC
    #[arg(short, long, default_value = "/tmp/jiraa.sock")]
    socket: String,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Directory holding settings.json (defaults to the user config dir)
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize data directory and log file
    let data_dir = init_data_dir()?;
    let log_file_path = data_dir.join("daemon.log");

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    // Initialize logging - write to both file and stdout
    use tracing_subscriber::fmt::writer::MakeWriterExt;
    let stdout_writer = std::io::stdout.with_max_level(tracing::Level::INFO);
    let file_writer = log_file.with_max_level(tracing::Level::DEBUG);

    tracing_subscriber::fmt()
        .with_writer(stdout_writer.and(file_writer))
        .with_env_filter(tracing_subscriber::EnvFilter::new(&args.log_level))
        .with_ansi(false) // No color codes in log file
        .init();

    tracing::info!("Jiraa daemon starting...");
    tracing::info!("Socket path: {}", args.socket);
    tracing::info!("Log file: {}", log_file_path.display());

    let config_dir = match args.config_dir.clone() {
        Some(dir) => dir,
        None => init_config_dir()?,
    };

    let event_manager = Arc::new(EventManager::new());
    let settings_manager = Arc::new(SettingsManager::with_config_dir(
        event_manager.clone(),
        config_dir.clone(),
    )?);
    tracing::info!("Settings loaded from {}", config_dir.display());

    let missing = settings_manager.get().await.missing_required();
    if !missing.is_empty() {
        tracing::warn!(
            "Required settings not set yet: {:?}. Lookups will fail until they are configured.",
            missing
        );
    }

    let router = Arc::new(CommandRouter::new(
        settings_manager.clone(),
        TrackerClient::new(),
    ));
    let api_handler = Arc::new(ApiHandler::new(event_manager, settings_manager, router));

    run_daemon(args, api_handler).await
}

async fn run_daemon(args: Args, api_handler: Arc<ApiHandler>) -> Result<()> {
    let ipc_server = Arc::new(IpcServer::new(args.socket, api_handler));

    // Start IPC server in background
    let server_handle = {
        let server = ipc_server.clone();
        tokio::spawn(async move {
            if let Err(e) = server.start().await {
                tracing::error!("IPC server error: {}", e);
            }
        })
    };

    tracing::info!("Daemon ready and listening");

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");

    server_handle.abort();

    Ok(())
}
