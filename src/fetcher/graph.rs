// src/fetcher/graph.rs
// =============================================================================
// An in-memory link graph that implements Fetcher.
//
// Each URL maps to a body and a list of outbound links. URLs that are not in
// the graph fail with "not found: <url>", exactly like a dead link would.
//
// Graphs can be:
// - the built-in sample (a few golang.org pages that link to each other)
// - loaded from a JSON file: { "<url>": { "body": "...", "links": ["..."] } }
// - built in code with `with_page` (used heavily by the tests)
// =============================================================================

use super::{FetchError, FetchedPage, Fetcher};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Root of the built-in sample graph.
pub const SAMPLE_ROOT: &str = "https://golang.org/";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GraphPage {
    #[serde(default)]
    body: String,
    #[serde(default)]
    links: Vec<String>,
}

/// A fetcher backed by a fixed map of pages.
#[derive(Debug, Clone, Default)]
pub struct GraphFetcher {
    pages: HashMap<String, GraphPage>,
}

impl GraphFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a page.
    pub fn with_page<I, S>(mut self, url: &str, body: &str, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pages.insert(
            url.to_string(),
            GraphPage {
                body: body.to_string(),
                links: links.into_iter().map(Into::into).collect(),
            },
        );
        self
    }

    /// Four golang.org pages linking to each other. `/cmd/` is linked twice
    /// but missing, so crawling it reports a failure.
    pub fn sample() -> Self {
        Self::new()
            .with_page(
                "https://golang.org/",
                "The Go Programming Language",
                ["https://golang.org/pkg/", "https://golang.org/cmd/"],
            )
            .with_page(
                "https://golang.org/pkg/",
                "Packages",
                [
                    "https://golang.org/",
                    "https://golang.org/cmd/",
                    "https://golang.org/pkg/fmt/",
                    "https://golang.org/pkg/os/",
                ],
            )
            .with_page(
                "https://golang.org/pkg/fmt/",
                "Package fmt",
                ["https://golang.org/", "https://golang.org/pkg/"],
            )
            .with_page(
                "https://golang.org/pkg/os/",
                "Package os",
                ["https://golang.org/", "https://golang.org/pkg/"],
            )
    }

    /// Parses a graph from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        let pages: HashMap<String, GraphPage> =
            serde_json::from_str(json).context("Invalid graph JSON")?;
        Ok(Self { pages })
    }

    /// Loads a graph from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read graph file {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Could not load {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

#[async_trait]
impl Fetcher for GraphFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        match self.pages.get(url) {
            Some(page) => Ok(FetchedPage {
                body: page.body.clone(),
                links: page.links.clone(),
            }),
            None => Err(FetchError::NotFound(url.to_string())),
        }
    }
}
