// src/crawl/mod.rs
// =============================================================================
// This module is the concurrent crawl engine.
//
// Features:
// - Every discovered page is crawled in its own tokio task
// - Each URL is fetched at most once per crawl (claims)
// - Exploration stops after a configurable number of levels (depth budget)
// - The caller waits until every task has finished (completion tracker)
// - A failed fetch is reported and only ends its own branch
//
// Submodules:
// - claims: the shared set of already-claimed URLs
// - tracker: counts outstanding tasks, waits for zero
// - dispatcher: the recursive fan-out driver and `run_crawl`
// - report: where crawl outcomes go
// =============================================================================

mod claims;
mod dispatcher;
mod report;
mod tracker;

pub use dispatcher::run_crawl;
pub use report::{CollectingReporter, CrawlEvent};
