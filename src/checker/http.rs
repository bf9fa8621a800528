// src/checker/http.rs
// =============================================================================
// Checks a single URL over HTTP.
//
// Key functionality:
// - Makes a HEAD request (lightweight, no body download)
// - Never follows redirects: a 3xx is recorded together with its Location
// - Falls back to exactly one GET when the server answers HEAD with 405
// - Turns transport failures (DNS, TLS, timeout, refused) into results
// - Hands every problematic result to the run log as soon as it exists
// =============================================================================

use reqwest::header::LOCATION;
use reqwest::{redirect, Client, Method, StatusCode};
use std::error::Error as _;
use std::sync::Arc;
use std::time::Duration;

use super::pacer::Pacer;
use super::result::{CheckMethod, CheckResult};
use crate::logfile::LogFile;

/// Sent with every request
pub const USER_AGENT: &str = concat!("sitemap-checker/", env!("CARGO_PKG_VERSION"));

/// Builds the client used for URL checks
///
/// Redirects are never followed so that they can be reported.
pub fn build_check_client(timeout: Duration, insecure: bool) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .redirect(redirect::Policy::none())
        .danger_accept_invalid_certs(insecure)
        .build()
}

/// Checks URLs, one call per URL
///
/// Cloning is cheap: the client and collaborators are reference counted.
#[derive(Clone)]
pub struct Fetcher {
    client: Client,
    pacer: Arc<Pacer>,
    log: Option<Arc<LogFile>>,
}

impl Fetcher {
    pub fn new(client: Client, pacer: Arc<Pacer>, log: Option<Arc<LogFile>>) -> Self {
        Fetcher { client, pacer, log }
    }

    /// Checks `url` and returns one result, or two if a GET fallback ran
    pub async fn check(&self, url: &str) -> Vec<CheckResult> {
        let head = self.send(url, CheckMethod::Head).await;
        self.record(&head);

        let fallback = head.needs_get_fallback();
        let mut results = vec![head];

        if fallback {
            tracing::debug!("{} answered HEAD with 405, retrying with GET", url);
            self.pacer.wait().await;
            let get = self.send(url, CheckMethod::Get).await;
            self.record(&get);
            results.push(get);
        }

        results
    }

    async fn send(&self, url: &str, method: CheckMethod) -> CheckResult {
        let http_method = match method {
            CheckMethod::Head => Method::HEAD,
            CheckMethod::Get => Method::GET,
        };

        match self.client.request(http_method, url).send().await {
            Ok(response) => {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok());
                classify(url, method, response.status(), location)
            }
            Err(e) => CheckResult::transport_error(url, method, describe_error(&e)),
        }
    }

    fn record(&self, result: &CheckResult) {
        let (Some(log), Some(line)) = (&self.log, result.log_line()) else {
            return;
        };
        if let Err(e) = log.log(&line) {
            tracing::warn!("Failed to write to {}: {}", log.path().display(), e);
        }
    }
}

/// Turns a received status into a result
///
/// Pure function of its inputs: the same response always gives the same result.
pub fn classify(url: &str, method: CheckMethod, status: StatusCode, location: Option<&str>) -> CheckResult {
    CheckResult::from_status(url, method, status.as_u16(), location)
}

/// Describes a failed request, including the underlying cause
///
/// reqwest's own message is generic ("error sending request for url"), the
/// interesting part (DNS, refused, certificate) is further down the chain.
pub fn describe_error(error: &reqwest::Error) -> String {
    let category = if error.is_timeout() {
        "request timed out"
    } else if error.is_connect() {
        "connection failed"
    } else if error.is_builder() {
        "invalid request"
    } else {
        "request failed"
    };

    let mut message = format!("{}: {}", category, error);
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
