// src/checker/result.rs
// =============================================================================
// The data produced by checking URLs.
//
// One CheckResult is created per HTTP request actually performed. A URL whose
// HEAD request answers 405 produces two results: the HEAD one and the fallback
// GET one. Results are never deduplicated or re-ordered.
//
// Summary folds a result collection into the three numbers printed at the end
// of a run (total, problematic, redirects).
// =============================================================================

use serde::{Deserialize, Serialize};

/// Which HTTP method produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckMethod {
    /// The primary check
    Head,
    /// The single fallback issued after a HEAD answered 405
    Get,
}

/// Outcome of one HTTP check
///
/// Exactly one of `error` or a valid `status` is set. `status` is 0 when no
/// response was received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// The checked address, exactly as listed in the sitemap
    pub url: String,
    pub method: CheckMethod,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub is_redirect: bool,
    /// Value of the Location header; only meaningful when `is_redirect` is set
    #[serde(skip_serializing_if = "String::is_empty")]
    pub redirect_target: String,
}

impl CheckResult {
    /// A check that failed before any response arrived
    pub fn transport_error(url: &str, method: CheckMethod, error: String) -> Self {
        CheckResult {
            url: url.to_string(),
            method,
            status: 0,
            error: Some(error),
            is_redirect: false,
            redirect_target: String::new(),
        }
    }

    /// A check that received a response with `status`
    ///
    /// `location` is only kept for 3xx statuses; a redirect without a
    /// Location header gets an empty target.
    pub fn from_status(url: &str, method: CheckMethod, status: u16, location: Option<&str>) -> Self {
        let is_redirect = (300..400).contains(&status);
        let redirect_target = if is_redirect {
            location.unwrap_or_default().to_string()
        } else {
            String::new()
        };

        CheckResult {
            url: url.to_string(),
            method,
            status,
            error: None,
            is_redirect,
            redirect_target,
        }
    }

    /// True for a HEAD answered with 405 Method Not Allowed
    ///
    /// Such a result is always followed by a GET for the same URL, which
    /// replaces it as the URL's verdict.
    pub fn needs_get_fallback(&self) -> bool {
        self.method == CheckMethod::Head && self.error.is_none() && self.status == 405
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }

    /// Whether this result should be reported to the user
    pub fn is_problematic(&self) -> bool {
        !self.needs_get_fallback() && !self.is_success()
    }

    /// The line written to the run log (and printed in the report), if any
    ///
    /// Successful checks and superseded HEAD 405 results produce no line.
    pub fn log_line(&self) -> Option<String> {
        if !self.is_problematic() {
            return None;
        }

        let tag = match self.method {
            CheckMethod::Head => "",
            CheckMethod::Get => " (GET after 405)",
        };

        let line = if let Some(error) = &self.error {
            format!("ERROR{}: {} - {}", tag, self.url, error)
        } else if self.is_redirect {
            format!(
                "REDIRECT{}: {} -> {} (Status: {})",
                tag, self.url, self.redirect_target, self.status
            )
        } else {
            format!("INVALID STATUS{}: {} - {}", tag, self.url, self.status)
        };

        Some(line)
    }
}

/// Counts printed at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of checks performed (HEAD and fallback GET results both count)
    pub total: usize,
    pub problematic: usize,
    pub redirects: usize,
}

impl Summary {
    pub fn from_results(results: &[CheckResult]) -> Self {
        Summary {
            total: results.len(),
            problematic: results.iter().filter(|r| r.is_problematic()).count(),
            redirects: results.iter().filter(|r| r.is_redirect).count(),
        }
    }

    pub fn headline(&self) -> String {
        format!(
            "Summary: Found {} problematic URLs out of {} total URLs",
            self.problematic, self.total
        )
    }

    pub fn redirect_line(&self) -> String {
        format!("Redirects: {} URLs", self.redirects)
    }
}
