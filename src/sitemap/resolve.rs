// src/sitemap/resolve.rs
// =============================================================================
// Fetches a sitemap and flattens it into page URLs.
//
// How it works:
// 1. Download the document (following redirects, unlike the URL checks)
// 2. Parse it as a sitemap index or a urlset
// 3. For an index, resolve every child in order and concatenate the results
//
// A failing child sitemap is reported and skipped. A failing root sitemap is
// an error for the caller. Index nesting is capped at MAX_INDEX_DEPTH so that
// an index listing itself cannot loop forever.
//
// Rust concepts:
// - BoxFuture: an async fn cannot call itself directly, because its future
//   would contain itself; boxing gives the recursive future a fixed size
// =============================================================================

use futures::future::{BoxFuture, FutureExt};
use reqwest::{redirect, Client};
use std::time::Duration;

use super::parse::{parse_sitemap, SitemapDocument};
use super::SitemapError;
use crate::checker::USER_AGENT;

/// Deepest chain of nested sitemap indexes that is followed
pub const MAX_INDEX_DEPTH: usize = 5;

/// Builds the client used to download sitemap documents
pub fn build_sitemap_client(timeout: Duration, insecure: bool) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .redirect(redirect::Policy::limited(10))
        .danger_accept_invalid_certs(insecure)
        .build()
}

pub struct SitemapResolver {
    client: Client,
}

impl SitemapResolver {
    pub fn new(client: Client) -> Self {
        SitemapResolver { client }
    }

    /// Returns every page URL reachable from `root`, in document order
    pub async fn resolve(&self, root: &str) -> Result<Vec<String>, SitemapError> {
        self.resolve_at(root, 0).await
    }

    fn resolve_at<'a>(
        &'a self,
        url: &'a str,
        depth: usize,
    ) -> BoxFuture<'a, Result<Vec<String>, SitemapError>> {
        async move {
            if depth > MAX_INDEX_DEPTH {
                return Err(SitemapError::TooDeep {
                    url: url.to_string(),
                    depth: MAX_INDEX_DEPTH,
                });
            }

            let body = self.fetch(url).await?;
            let document = parse_sitemap(&body).map_err(|reason| SitemapError::Parse {
                url: url.to_string(),
                reason,
            })?;

            match document {
                SitemapDocument::UrlSet(pages) => {
                    tracing::info!("{} lists {} URLs", url, pages.len());
                    Ok(pages)
                }
                SitemapDocument::Index(children) => {
                    eprintln!("Found sitemap index with {} sitemaps", children.len());

                    let mut pages = Vec::new();
                    for child in &children {
                        eprintln!("Processing referenced sitemap: {}", child);
                        match self.resolve_at(child, depth + 1).await {
                            Ok(found) => pages.extend(found),
                            Err(e) => {
                                tracing::warn!("Skipping referenced sitemap {}: {}", child, e);
                                eprintln!(
                                    "Warning: Error processing referenced sitemap {}: {}",
                                    child, e
                                );
                            }
                        }
                    }
                    Ok(pages)
                }
            }
        }
        .boxed()
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, SitemapError> {
        let request_error = |source| SitemapError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;

        if !response.status().is_success() {
            return Err(SitemapError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await.map_err(request_error)?;
        Ok(body.to_vec())
    }
}
