// src/crawl/report.rs
// =============================================================================
// How a crawl tells the outside world what happened.
//
// The engine itself returns nothing. Instead, every successfully fetched page
// and every failed fetch is handed to a `CrawlReporter` chosen by the caller.
//
// Provided reporters:
// - LogReporter: writes one tracing event per visit/failure
// - CollectingReporter: logs too, and keeps every event for later printing
// =============================================================================

use crate::fetcher::{FetchError, FetchedPage};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

/// Receives crawl outcomes. Called concurrently from many tasks.
pub trait CrawlReporter: Send + Sync {
    /// `url` was fetched successfully, `depth` hops away from the root.
    fn visited(&self, url: &str, depth: usize, page: &FetchedPage);

    /// Fetching `url` failed; its links will not be followed.
    fn failed(&self, url: &str, depth: usize, error: &FetchError);
}

/// One crawl outcome, in a form that can be printed or serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CrawlEvent {
    Visited {
        url: String,
        depth: usize,
        /// Body size in bytes
        body_len: usize,
        /// Number of links found on the page
        links: usize,
    },
    Failed {
        url: String,
        depth: usize,
        error: String,
    },
}

impl CrawlEvent {
    pub fn url(&self) -> &str {
        match self {
            CrawlEvent::Visited { url, .. } | CrawlEvent::Failed { url, .. } => url,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            CrawlEvent::Visited { depth, .. } | CrawlEvent::Failed { depth, .. } => *depth,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CrawlEvent::Visited { .. })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl CrawlReporter for LogReporter {
    fn visited(&self, url: &str, depth: usize, page: &FetchedPage) {
        info!(url, depth, links = page.links.len(), bytes = page.body.len(), "found");
    }

    fn failed(&self, url: &str, depth: usize, error: &FetchError) {
        warn!(url, depth, error = %error, "fetch failed");
    }
}

// Keeps every event in arrival order (which is not crawl order: sibling tasks
// finish whenever their fetch does)
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<CrawlEvent>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: CrawlEvent) {
        // A panic elsewhere can't leave a Vec half-pushed, so poison is harmless
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    /// Snapshot of everything reported so far.
    pub fn events(&self) -> Vec<CrawlEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CrawlReporter for CollectingReporter {
    fn visited(&self, url: &str, depth: usize, page: &FetchedPage) {
        LogReporter.visited(url, depth, page);
        self.push(CrawlEvent::Visited {
            url: url.to_string(),
            depth,
            body_len: page.body.len(),
            links: page.links.len(),
        });
    }

    fn failed(&self, url: &str, depth: usize, error: &FetchError) {
        LogReporter.failed(url, depth, error);
        self.push(CrawlEvent::Failed {
            url: url.to_string(),
            depth,
            error: error.to_string(),
        });
    }
}
