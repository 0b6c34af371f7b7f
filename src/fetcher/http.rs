// src/fetcher/http.rs
// =============================================================================
// This module fetches live web pages for the crawler.
//
// How it works:
// 1. GET the URL with a shared reqwest client (connection pooling)
// 2. Treat any non-2xx status as a failed fetch
// 3. Extract links from the HTML body, resolved against the final URL
//    (after redirects), optionally restricted to the starting host
//
// Rust concepts:
// - async_trait: Lets us implement an async method on a trait object
// - The ? operator: reqwest errors convert into FetchError::Request via From
// =============================================================================

use super::{extract_links, FetchError, FetchedPage, Fetcher};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Settings for the HTTP transport.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Per-request timeout
    pub timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Only follow links on the starting URL's host
    pub same_domain: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: concat!("link-crawler/", env!("CARGO_PKG_VERSION")).to_string(),
            same_domain: true,
        }
    }
}

// Fetches pages over HTTP(S)
//
// The client is created once and shared by every crawl task; reqwest's Client
// is internally reference counted so borrowing it from many tasks is fine.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    /// When Some, links to other hosts are dropped
    host: Option<String>,
}

impl HttpFetcher {
    /// Builds a fetcher for crawling the site rooted at `start_url`.
    pub fn for_site(start_url: &str, options: &FetchOptions) -> Result<Self> {
        let start = Url::parse(start_url)
            .map_err(|e| anyhow!("Invalid URL '{}': {}", start_url, e))?;

        let host = if options.same_domain {
            let host = start
                .host_str()
                .ok_or_else(|| anyhow!("URL has no host: {}", start_url))?;
            Some(host.to_string())
        } else {
            None
        };

        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, host })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Relative links are relative to where we ended up, not where we started
        let final_url = response.url().to_string();
        let body = response.text().await?;
        let links = extract_links(&body, &final_url, self.host.as_deref());

        Ok(FetchedPage { body, links })
    }
}
