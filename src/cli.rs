// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// The parsed flags are turned into a ScanConfig once, in scan_config(), so
// the rest of the program never looks at the command line again.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::checker::CheckConfig;
use crate::scan::ScanConfig;

#[derive(Parser, Debug)]
#[command(
    name = "sitemap-checker",
    version,
    about = "Checks every URL listed in a sitemap for errors, bad statuses and redirects",
    long_about = "sitemap-checker downloads a sitemap (or sitemap index), then sends a HEAD request \
                  to every page it lists. Redirects are reported, never followed. Pages that \
                  reject HEAD with 405 are retried once with GET."
)]
pub struct Cli {
    /// URL of the sitemap.xml or sitemap index to check
    #[arg(short = 'u', long = "url", value_name = "URL")]
    pub sitemap_url: String,

    /// Minimum delay in milliseconds between two requests
    #[arg(short = 't', long = "delay", value_name = "MS", default_value_t = 1000)]
    pub delay_ms: u64,

    /// Maximum number of requests in flight at once
    #[arg(
        short = 'c',
        long,
        value_name = "N",
        default_value_t = 5,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub concurrency: u16,

    /// Timeout in seconds for each individual request
    #[arg(
        long = "timeout",
        value_name = "SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Directory to store log files (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub logdir: Option<PathBuf>,

    /// Skip TLS certificate validation
    #[arg(long)]
    pub insecure: bool,

    /// Print the summary and all results as JSON instead of a report
    #[arg(long)]
    pub json: bool,

    /// Do not draw the progress bar
    #[arg(long)]
    pub no_progress: bool,

    /// Show debug diagnostics on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            sitemap_url: self.sitemap_url.clone(),
            check: CheckConfig {
                concurrency: usize::from(self.concurrency),
                delay: Duration::from_millis(self.delay_ms),
            },
            request_timeout: Duration::from_secs(self.timeout_secs),
            insecure: self.insecure,
            log_dir: self.logdir.clone(),
            // JSON output goes to stdout, keep it clean
            show_progress: !self.no_progress && !self.json,
        }
    }
}
