//! Daemon entry point: loads settings, seeds the default policy on first
//! run, wires the service container onto the HTTP router, and serves.

#![deny(unsafe_code)]

use clap::Parser;
use dlp_server::Settings;
use tracing::info;

/// DLP inspection daemon.
#[derive(Parser, Debug)]
#[command(name = "dlp-server", about = "DLP inspection daemon")]
struct Cli {
    /// Override `DLP_HOST`.
    #[arg(long)]
    host: Option<String>,
    /// Override `DLP_PORT`.
    #[arg(long)]
    port: Option<u16>,
    /// Override `DLP_POLICY_PATH`.
    #[arg(long)]
    policy_path: Option<std::path::PathBuf>,
    /// Override `DLP_DATABASE_URL`.
    #[arg(long)]
    database_url: Option<String>,
    /// Override `DLP_LOG_LEVEL`.
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut settings = Settings::default();
    if let Some(host) = cli.host {
        settings.host = host;
    }
    if let Some(port) = cli.port {
        settings.port = port;
    }
    if let Some(policy_path) = cli.policy_path {
        settings.policy_path = policy_path;
    }
    if let Some(database_url) = cli.database_url {
        settings.database_url = database_url;
    }
    if let Some(log_level) = cli.log_level {
        settings.log_level = log_level;
    }

    if std::env::var("RUST_LOG").is_err() {
        let level = if settings.debug { "debug" } else { settings.log_level.as_str() };
        std::env::set_var("RUST_LOG", level);
    }
    dlp_telemetry::init_json_logging();

    let app = dlp_server::build_app(&settings).await?;

    let listener = tokio::net::TcpListener::bind((settings.host.as_str(), settings.port)).await?;
    info!(host = %settings.host, port = settings.port, "dlp-server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
