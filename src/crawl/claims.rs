// src/crawl/claims.rs
// =============================================================================
// The claim set: which URLs has some crawl task already taken responsibility
// for?
//
// A URL is claimed at most once per crawl. Claiming is a single atomic
// check-and-insert, so two tasks that discover the same link at the same
// moment cannot both end up fetching it. Nothing is ever removed.
//
// Rust concepts:
// - DashMap/DashSet: A concurrent hash map split into shards, each shard
//   behind its own lock, so unrelated URLs rarely contend
// - &self methods: Many tasks share one ClaimSet through an Arc
// =============================================================================

use dashmap::DashSet;

#[derive(Debug, Default)]
pub struct ClaimSet {
    claimed: DashSet<String>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for the caller.
    ///
    /// Returns `true` if the URL was unclaimed (the caller must now visit
    /// it) and `false` if it was already claimed (the caller must not).
    pub fn try_claim(&self, url: &str) -> bool {
        // Cheap read first so already-seen links don't allocate
        if self.claimed.contains(url) {
            return false;
        }
        self.claimed.insert(url.to_string())
    }

    /// Number of URLs claimed so far.
    pub fn len(&self) -> usize {
        self.claimed.len()
    }
}
