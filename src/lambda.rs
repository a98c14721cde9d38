//! AWS Lambda entry point (feature = "lambda").
//!
//! The original deployment runs this on an EventBridge schedule. The
//! event payload is ignored; each invocation is one ingestion pass over
//! the providers configured in the environment, same as `gbfs_archiver run`.

use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde::Serialize;
use serde_json::Value;

use gbfs_archiver::archive::S3Sink;
use gbfs_archiver::config::AppConfig;
use gbfs_archiver::fetch::BasicClient;
use gbfs_archiver::pipeline::run_once;
use gbfs_archiver::store::MySqlStatsStore;

#[derive(Serialize)]
struct Response {
    providers_ok: usize,
    providers_failed: usize,
    records_written: usize,
}

async fn function_handler(_event: LambdaEvent<Value>) -> Result<Response, Error> {
    let cfg = AppConfig::from_env()?;
    let http = BasicClient::new(cfg.http_timeout)?;

    let aws_config = aws_config::load_from_env().await;
    let sink = S3Sink::new(&aws_config);

    let store = MySqlStatsStore::connect(&cfg.db).await?;

    let summary = run_once(&cfg, &http, &sink, &store).await;

    Ok(Response {
        providers_ok: summary.providers_ok,
        providers_failed: summary.providers_failed,
        records_written: summary.records_written,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .without_time()
        .init();

    run(service_fn(function_handler)).await
}
