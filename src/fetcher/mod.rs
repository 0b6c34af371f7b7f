// src/fetcher/mod.rs
// =============================================================================
// This module defines how the crawler gets pages.
//
// The crawl engine never talks to the network itself. It only knows about the
// `Fetcher` trait: "give me the body of this URL and the URLs it links to".
//
// Submodules:
// - http: Fetches live pages with reqwest and pulls links out with scraper
// - html: Extracts and resolves links from an HTML document
// - graph: An in-memory link graph (handy for demos and tests)
//
// Rust concepts:
// - Traits: A shared interface that several types implement
// - Trait objects: Arc<dyn Fetcher> lets the engine use any implementation
// - thiserror: Deriving std::error::Error for our own error enum
// =============================================================================

mod graph;
mod html;
mod http;

use async_trait::async_trait;
use thiserror::Error;

pub use graph::{GraphFetcher, SAMPLE_ROOT};
pub use html::extract_links;
pub use http::{FetchOptions, HttpFetcher};

// What a successful fetch hands back to the crawler
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FetchedPage {
    /// The page content
    pub body: String,
    /// Every URL the page references, in the order they were found
    pub links: Vec<String>,
}

/// Why a single fetch failed.
///
/// A fetch error only ends the branch of the crawl it happened on.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The resource does not exist
    #[error("not found: {0}")]
    NotFound(String),
    /// The identifier could not be parsed as a URL
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    /// The server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    /// The request itself failed (timeout, DNS, TLS, ...)
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

// The one capability the crawl engine needs from the outside world
//
// Implementations must be Send + Sync because a single fetcher is shared by
// every concurrently running crawl task.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`, returning its content and outbound links.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}
