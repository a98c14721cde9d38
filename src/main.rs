//! CLI entry point for the GBFS archiver.
//!
//! `run` executes one ingestion pass over every configured provider:
//! fetch the root manifest, archive it to S3, discover and fetch the
//! relevant sub-feeds, archive those, and append availability stats to
//! MySQL. Scheduling repeated passes is left to whatever invokes the
//! binary (cron, EventBridge, systemd timers).

use std::ffi::OsStr;
use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use gbfs_archiver::archive::S3Sink;
use gbfs_archiver::config::AppConfig;
use gbfs_archiver::fetch::BasicClient;
use gbfs_archiver::pipeline::run_once;
use gbfs_archiver::store::MySqlStatsStore;

#[derive(Parser)]
#[command(name = "gbfs_archiver")]
#[command(about = "Archives GBFS feeds to S3 and records availability stats", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one ingestion pass over all configured providers
    Run,
    /// Resolve and print the configuration without fetching anything
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/gbfs_archiver.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("gbfs_archiver.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run().await?,
        Commands::CheckConfig => check_config()?,
    }

    Ok(())
}

/// One full ingestion pass: resolve config, connect the shared S3 and
/// MySQL clients, and walk the provider list.
async fn run() -> Result<()> {
    let cfg = AppConfig::from_env()?;
    info!(
        providers = cfg.providers.len(),
        bucket = %cfg.s3_bucket,
        feeds = ?cfg.relevant_feeds,
        "Starting ingestion pass"
    );

    let http = BasicClient::new(cfg.http_timeout)?;

    let aws_config = aws_config::load_from_env().await;
    let sink = S3Sink::new(&aws_config);

    // Held for the whole run; released when the store drops, on every
    // exit path. Inability to connect at all is fatal.
    let store = MySqlStatsStore::connect(&cfg.db).await?;

    run_once(&cfg, &http, &sink, &store).await;

    Ok(())
}

/// Prints the resolved configuration with credentials redacted.
fn check_config() -> Result<()> {
    let cfg = AppConfig::from_env()?;

    info!(
        bucket = %cfg.s3_bucket,
        lang_key = %cfg.lang_key,
        feeds = ?cfg.relevant_feeds,
        http_timeout_secs = cfg.http_timeout.as_secs(),
        db_host = %cfg.db.host,
        db_port = cfg.db.port,
        db_user = %cfg.db.user,
        db_name = %cfg.db.database,
        "Configuration resolved"
    );

    for provider in &cfg.providers {
        info!(provider = %provider.name, url = %provider.url, "Provider");
    }

    Ok(())
}
