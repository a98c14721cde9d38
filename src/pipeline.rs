//! Per-provider ingestion orchestration.
//!
//! Providers pass through fetch → archive → discover → fetch → archive →
//! extract → record, one at a time. Each stage catches its own failures:
//! a bad provider costs only its own stats, never the rest of the run.

use serde::Serialize;
use tracing::{Instrument, debug, error, info};

use crate::archive::{ObjectSink, archive_json};
use crate::config::{AppConfig, ProviderConfig};
use crate::error::FetchError;
use crate::fetch::{HttpClient, fetch_json};
use crate::gbfs::{FetchResult, feed_url};
use crate::stats::extract_stats;
use crate::store::StatsStore;

/// Outcome counts for one ingestion pass, reported in the closing log
/// line and the Lambda response.
#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub providers_ok: usize,
    pub providers_failed: usize,
    pub records_written: usize,
}

/// Runs one ingestion pass over all configured providers.
///
/// Partial success is the norm: a provider whose manifest fetch fails is
/// counted in `providers_failed` and the pass moves on. There is no
/// aggregate success signal beyond the summary and the log stream.
pub async fn run_once<C, A, S>(cfg: &AppConfig, http: &C, sink: &A, store: &S) -> RunSummary
where
    C: HttpClient,
    A: ObjectSink + ?Sized,
    S: StatsStore + ?Sized,
{
    let mut summary = RunSummary::default();

    for provider in &cfg.providers {
        let span = tracing::info_span!("ingest_provider", provider = %provider.name);
        match ingest_provider(cfg, http, sink, store, provider)
            .instrument(span)
            .await
        {
            Ok(records) => {
                summary.providers_ok += 1;
                summary.records_written += records;
            }
            Err(err) => {
                summary.providers_failed += 1;
                error!(provider = %provider.name, error = %err, "Failed to fetch root manifest");
            }
        }
    }

    info!(
        providers_ok = summary.providers_ok,
        providers_failed = summary.providers_failed,
        records_written = summary.records_written,
        "Ingestion pass complete"
    );

    summary
}

/// Ingests a single provider, returning the number of stats rows written.
///
/// Only the root-manifest fetch propagates an error; every later stage
/// logs and degrades (the manifest stays archived even when its sub-feeds
/// go nowhere).
async fn ingest_provider<C, A, S>(
    cfg: &AppConfig,
    http: &C,
    sink: &A,
    store: &S,
    provider: &ProviderConfig,
) -> Result<usize, FetchError>
where
    C: HttpClient,
    A: ObjectSink + ?Sized,
    S: StatsStore + ?Sized,
{
    let manifest = fetch_json(http, &provider.url).await?;
    let wrapped = FetchResult::new(&provider.name, manifest);

    let manifest_key = format!("{}/gbfs.json", provider.name);
    if let Err(err) = archive_json(sink, &cfg.s3_bucket, &manifest_key, &wrapped).await {
        error!(key = %manifest_key, error = %err, "Failed to archive root manifest");
    }

    let mut records = 0;

    for feed_name in &cfg.relevant_feeds {
        let Some(url) = feed_url(&wrapped.data, &cfg.lang_key, feed_name) else {
            debug!(feed = %feed_name, "Feed not listed in manifest, skipping");
            continue;
        };

        let snapshot = match fetch_json(http, url).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(feed = %feed_name, error = %err, "Failed to fetch sub-feed");
                continue;
            }
        };

        let feed_key = format!("{}/{}.json", provider.name, feed_name);
        if let Err(err) = archive_json(sink, &cfg.s3_bucket, &feed_key, &snapshot).await {
            // Archival and stats are independent writes; keep going.
            error!(key = %feed_key, error = %err, "Failed to archive sub-feed payload");
        }

        let Some(totals) = extract_stats(feed_name, &snapshot) else {
            debug!(feed = %feed_name, "Feed kind not recognized for stats");
            continue;
        };

        match store.record_stats(&provider.name, feed_name, totals).await {
            Ok(()) => {
                records += 1;
                info!(
                    feed = %feed_name,
                    total_bikes = totals.total_bikes,
                    available_docks = totals.available_docks,
                    "Stats recorded"
                );
            }
            Err(err) => {
                error!(feed = %feed_name, error = %err, "Failed to record stats");
            }
        }
    }

    Ok(records)
}
