// src/scan.rs
// =============================================================================
// One complete sitemap check.
//
// What happens here:
// 1. Open the run log (a failure only disables logging)
// 2. Resolve the sitemap into page URLs (a failure ends the run)
// 3. Check every URL with the configured pacing and concurrency
// 4. Write the summary to the run log
// =============================================================================

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::checker::{self, CheckConfig, CheckResult, ProgressReporter, Summary};
use crate::logfile::{self, LogFile, SEPARATOR};
use crate::sitemap::{build_sitemap_client, SitemapResolver};

/// Everything a run needs, decided up front from the command line
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub sitemap_url: String,
    pub check: CheckConfig,
    pub request_timeout: Duration,
    /// Skip TLS certificate validation
    pub insecure: bool,
    /// Directory for the run log; the current directory when unset
    pub log_dir: Option<PathBuf>,
    pub show_progress: bool,
}

/// What `--json` prints
#[derive(Debug, Serialize)]
pub struct ScanReport {
    /// Number of page URLs the sitemap listed
    pub url_count: usize,
    /// One entry per request performed, in completion order
    pub results: Vec<CheckResult>,
    pub summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<PathBuf>,
}

pub async fn run_scan(config: &ScanConfig) -> Result<ScanReport> {
    let log = open_log(config).map(Arc::new);
    if let Some(log) = &log {
        eprintln!("Logging to: {}", log.path().display());
        write_header(log, &config.sitemap_url);
    }

    let sitemap_client = build_sitemap_client(config.request_timeout, config.insecure)
        .context("failed to build HTTP client")?;
    let check_client = checker::build_check_client(config.request_timeout, config.insecure)
        .context("failed to build HTTP client")?;

    eprintln!("Retrieving URLs from sitemap...");
    let urls = match SitemapResolver::new(sitemap_client)
        .resolve(&config.sitemap_url)
        .await
    {
        Ok(urls) => urls,
        Err(e) => {
            log_line(log.as_deref(), &format!("Error retrieving URLs: {}", e));
            return Err(e).context("error retrieving URLs");
        }
    };

    let url_count = urls.len();
    eprintln!("Found {} URLs to check", url_count);
    log_line(log.as_deref(), &format!("Found {} URLs to check", url_count));

    eprintln!("Checking URLs...");
    let progress = if config.show_progress {
        ProgressReporter::new(url_count)
    } else {
        ProgressReporter::hidden(url_count)
    };

    let results = checker::check_urls(
        check_client,
        urls,
        &config.check,
        log.clone(),
        Arc::new(progress),
    )
    .await?;

    let summary = Summary::from_results(&results);
    if let Some(log) = &log {
        write_footer(log, &summary);
    }

    Ok(ScanReport {
        url_count,
        results,
        summary,
        log_path: log.map(|l| l.path().to_path_buf()),
    })
}

fn open_log(config: &ScanConfig) -> Option<LogFile> {
    let path = logfile::log_path(&config.sitemap_url, config.log_dir.as_deref());
    match LogFile::open(&path) {
        Ok(log) => Some(log),
        Err(e) => {
            tracing::warn!("Failed to create log file {}: {}", path.display(), e);
            eprintln!(
                "Warning: Failed to create logger: {}. Proceeding without logging.",
                e
            );
            None
        }
    }
}

fn write_header(log: &LogFile, sitemap_url: &str) {
    if let Some(site) = site_label(sitemap_url) {
        log_line(Some(log), &format!("Sitemap check for: {}", site));
    }
    log_line(Some(log), &format!("Started at: {}", Local::now().to_rfc3339()));
    log_line(Some(log), SEPARATOR);
}

// Host of the sitemap URL, with the port when one is written out
fn site_label(sitemap_url: &str) -> Option<String> {
    let url = Url::parse(sitemap_url).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

fn write_footer(log: &LogFile, summary: &Summary) {
    log_line(Some(log), SEPARATOR);
    log_line(Some(log), &summary.headline());
    log_line(Some(log), &summary.redirect_line());
    log_line(Some(log), &format!("Finished at: {}", Local::now().to_rfc3339()));
}

fn log_line(log: Option<&LogFile>, line: &str) {
    if let Some(log) = log {
        if let Err(e) = log.log(line) {
            tracing::warn!("Failed to write to {}: {}", log.path().display(), e);
        }
    }
}
