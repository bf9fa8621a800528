// src/checker/pool.rs
// =============================================================================
// Drives a whole URL list through the checker.
//
// For each URL, in sitemap order:
// 1. wait for the pacer (at most one dispatch per delay interval)
// 2. wait for a free concurrency slot
// 3. spawn a task that checks the URL while holding the slot
//
// Dispatching never waits for a check to finish; only the final collection
// step does. A failure on one URL never cancels the others.
//
// Results arrive in completion order, not input order.
// =============================================================================

use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;

use super::gate::ConcurrencyGate;
use super::http::Fetcher;
use super::pacer::Pacer;
use super::progress::ProgressReporter;
use super::result::CheckResult;
use super::CheckConfig;
use crate::logfile::LogFile;

/// Checks every URL in `urls` and returns all results
///
/// Waits for every dispatched check, fallback GETs included, before returning.
pub async fn check_urls(
    client: reqwest::Client,
    urls: Vec<String>,
    config: &CheckConfig,
    log: Option<Arc<LogFile>>,
    progress: Arc<ProgressReporter>,
) -> Result<Vec<CheckResult>> {
    let pacer = Arc::new(Pacer::new(config.delay));
    let gate = ConcurrencyGate::new(config.concurrency);
    let fetcher = Fetcher::new(client, Arc::clone(&pacer), log);

    tracing::debug!(
        "checking {} URLs, at most {} at a time, {}ms apart",
        urls.len(),
        gate.limit(),
        pacer.interval().as_millis()
    );

    let mut in_flight = FuturesUnordered::new();

    for url in urls {
        pacer.wait().await;
        let permit = gate
            .acquire()
            .await
            .context("concurrency gate closed while dispatching")?;

        tracing::debug!("dispatching check for {}", url);

        let fetcher = fetcher.clone();
        let progress = Arc::clone(&progress);
        in_flight.push(tokio::spawn(async move {
            let _permit = permit;
            let results = fetcher.check(&url).await;
            progress.increment();
            results
        }));
    }

    let mut results = Vec::new();
    while let Some(joined) = in_flight.next().await {
        match joined {
            Ok(batch) => results.extend(batch),
            Err(e) => tracing::warn!("check task did not complete: {}", e),
        }
    }

    tracing::debug!(
        "{} of {} checks finished, {} results",
        progress.current(),
        progress.total(),
        results.len()
    );

    Ok(results)
}
