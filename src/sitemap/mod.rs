// src/sitemap/mod.rs
// =============================================================================
// This module turns a root sitemap URL into the flat list of page URLs to
// check.
//
// Features:
// - Reads both <urlset> sitemaps and <sitemapindex> documents
// - Expands indexes recursively, keeping document order
// - Skips (with a warning) child sitemaps that fail, but fails the run if the
//   root sitemap itself cannot be read
// =============================================================================

mod parse;
mod resolve;

use thiserror::Error;

pub use resolve::{build_sitemap_client, SitemapResolver};

#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("error fetching sitemap {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("error fetching sitemap {url}: received non-success status code {status}")]
    Status { url: String, status: u16 },

    #[error("error parsing sitemap {url}: {reason}")]
    Parse { url: String, reason: String },

    #[error("sitemap index nesting deeper than {depth} levels at {url}")]
    TooDeep { url: String, depth: usize },
}
