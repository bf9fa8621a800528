// src/checker/mod.rs
// =============================================================================
// This module contains all URL checking logic.
//
// Submodules:
// - result: CheckResult (one per HTTP request) and Summary
// - http: the HTTP client and the per-URL check (HEAD, GET fallback on 405)
// - pacer: minimum delay between dispatches
// - gate: maximum number of checks in flight
// - progress: the text progress bar
// - pool: runs a whole URL list through pacer, gate and fetcher
// =============================================================================

mod gate;
mod http;
mod pacer;
mod pool;
mod progress;
mod result;

use std::time::Duration;

pub use http::{build_check_client, USER_AGENT};
pub use pool::check_urls;
pub use progress::ProgressReporter;
pub use result::{CheckMethod, CheckResult, Summary};

/// How aggressively URLs are checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckConfig {
    /// Maximum number of checks in flight (at least 1)
    pub concurrency: usize,
    /// Minimum time between two dispatches
    pub delay: Duration,
}
