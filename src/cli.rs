// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - site: crawl a live website over HTTP
// - graph: crawl an in-memory link graph (built-in sample or a JSON file)
//
// Rust concepts:
// - Derive macros: clap generates the parser from these types
// - Option<T>: arguments the user may leave out
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "link-crawler",
    version,
    about = "Crawl a link graph concurrently, visiting every page exactly once",
    long_about = "link-crawler follows links from a starting page in parallel, fetches each \
                  distinct page at most once and stops after a maximum depth. \
                  Failed pages are reported without stopping the rest of the crawl."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website
    ///
    /// Example: link-crawler site https://example.com --max-depth 3
    Site {
        /// Website URL to start from (e.g., https://example.com)
        website_url: String,

        /// Maximum crawl depth
        ///
        /// Depth 0 = fetch nothing
        /// Depth 1 = just the starting page
        /// Depth 2 = starting page + all pages it links to
        /// etc.
        #[arg(long, default_value_t = 2)]
        max_depth: usize,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,

        /// Follow links to other hosts too (by default only the starting
        /// URL's host is crawled)
        #[arg(long)]
        all_domains: bool,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,

        /// User-Agent header to send
        #[arg(long)]
        user_agent: Option<String>,
    },

    /// Crawl an in-memory link graph
    ///
    /// Without --file, crawls a small built-in sample of golang.org pages.
    ///
    /// Example: link-crawler graph --file graph.json --root https://a/ --max-depth 3
    Graph {
        /// JSON file mapping each URL to {"body": "...", "links": [...]}
        #[arg(long)]
        file: Option<PathBuf>,

        /// URL to start from (defaults to the sample graph's root)
        #[arg(long)]
        root: Option<String>,

        /// Maximum crawl depth
        #[arg(long, default_value_t = 4)]
        max_depth: usize,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_site_defaults() {
        let cli = Cli::parse_from(["link-crawler", "site", "https://example.com"]);
        match cli.command {
            Commands::Site {
                website_url,
                max_depth,
                json,
                all_domains,
                timeout_secs,
                user_agent,
            } => {
                assert_eq!(website_url, "https://example.com");
                assert_eq!(max_depth, 2);
                assert!(!json);
                assert!(!all_domains);
                assert_eq!(timeout_secs, 10);
                assert!(user_agent.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_graph_args() {
        let cli = Cli::parse_from([
            "link-crawler",
            "graph",
            "--file",
            "g.json",
            "--root",
            "root",
            "--max-depth",
            "1",
            "--json",
        ]);
        match cli.command {
            Commands::Graph {
                file,
                root,
                max_depth,
                json,
            } => {
                assert_eq!(file, Some(PathBuf::from("g.json")));
                assert_eq!(root.as_deref(), Some("root"));
                assert_eq!(max_depth, 1);
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
