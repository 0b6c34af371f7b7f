// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging and parse command-line arguments using clap
// 2. Build the right fetcher for the subcommand (live HTTP or in-memory graph)
// 3. Run the concurrent crawl and collect what it reports
// 4. Print the results and exit with a proper code
//    (0 = every page fetched, 1 = some fetches failed, 2 = error)
// =============================================================================

mod cli;       // src/cli.rs - command-line parsing
mod crawl;     // src/crawl/ - the concurrent crawl engine
mod fetcher;   // src/fetcher/ - how pages are fetched
mod telemetry; // src/telemetry.rs - logging setup

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use crawl::{CollectingReporter, CrawlEvent};
use fetcher::{FetchOptions, Fetcher, GraphFetcher, HttpFetcher, SAMPLE_ROOT};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    telemetry::init_telemetry();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Site {
            website_url,
            max_depth,
            json,
            all_domains,
            timeout_secs,
            user_agent,
        } => {
            let mut options = FetchOptions {
                timeout: Duration::from_secs(timeout_secs),
                same_domain: !all_domains,
                ..FetchOptions::default()
            };
            if let Some(user_agent) = user_agent {
                options.user_agent = user_agent;
            }
            handle_site_crawl(&website_url, max_depth, json, &options).await
        }
        Commands::Graph {
            file,
            root,
            max_depth,
            json,
        } => handle_graph_crawl(file, root, max_depth, json).await,
    }
}

// Handles the 'site' subcommand
async fn handle_site_crawl(
    website_url: &str,
    max_depth: usize,
    json: bool,
    options: &FetchOptions,
) -> Result<i32> {
    let fetcher = HttpFetcher::for_site(website_url, options)?;

    if !json {
        println!("🔍 Crawling website: {}", website_url);
        println!("📊 Max crawl depth: {}", max_depth);
    }

    let events = crawl_and_collect(website_url, max_depth, Arc::new(fetcher)).await;
    report(&events, json)
}

// Handles the 'graph' subcommand
async fn handle_graph_crawl(
    file: Option<PathBuf>,
    root: Option<String>,
    max_depth: usize,
    json: bool,
) -> Result<i32> {
    let graph = match &file {
        Some(path) => GraphFetcher::from_json_file(path)?,
        None => GraphFetcher::sample(),
    };
    let root = root.unwrap_or_else(|| SAMPLE_ROOT.to_string());

    if graph.is_empty() {
        tracing::warn!("graph has no pages; every fetch will fail");
    }

    if !json {
        match &file {
            Some(path) => println!("🔍 Crawling graph {} ({} pages)", path.display(), graph.len()),
            None => println!("🔍 Crawling built-in sample graph ({} pages)", graph.len()),
        }
        println!("📊 Root: {}, max crawl depth: {}", root, max_depth);
    }

    let events = crawl_and_collect(&root, max_depth, Arc::new(graph)).await;
    report(&events, json)
}

async fn crawl_and_collect(
    root: &str,
    max_depth: usize,
    fetcher: Arc<dyn Fetcher>,
) -> Vec<CrawlEvent> {
    let reporter = Arc::new(CollectingReporter::new());
    crawl::run_crawl(root, max_depth, fetcher, reporter.clone()).await;

    let mut events = reporter.events();
    // Arrival order is whatever the scheduler did; print by depth, then URL
    events.sort_by(|a, b| a.depth().cmp(&b.depth()).then_with(|| a.url().cmp(b.url())));
    events
}

// Prints the results and picks the exit code
fn report(events: &[CrawlEvent], json: bool) -> Result<i32> {
    if json {
        println!("{}", serde_json::to_string_pretty(events)?);
    } else {
        print_table(events);
    }

    let failed = events.iter().filter(|e| !e.is_ok()).count();
    Ok(if failed > 0 { 1 } else { 0 })
}

// Prints results as a human-readable table in the terminal
fn print_table(events: &[CrawlEvent]) {
    println!();
    println!("{:<6} {:<60} {:<12} {:<30}", "DEPTH", "URL", "STATUS", "DETAIL");
    println!("{}", "=".repeat(110));

    for event in events {
        let url = event.url();
        let url_display = if url.chars().count() > 57 {
            format!("{}...", url.chars().take(57).collect::<String>())
        } else {
            url.to_string()
        };

        let (status, detail) = match event {
            CrawlEvent::Visited {
                body_len, links, ..
            } => ("✅ OK", format!("{} bytes, {} links", body_len, links)),
            CrawlEvent::Failed { error, .. } => ("❌ FAILED", error.clone()),
        };

        println!(
            "{:<6} {:<60} {:<12} {:<30}",
            event.depth(),
            url_display,
            status,
            detail
        );
    }

    println!();

    let ok_count = events.iter().filter(|e| e.is_ok()).count();
    let failed_count = events.len() - ok_count;

    println!("📊 Summary:");
    println!("   ✅ Visited: {}", ok_count);
    println!("   ❌ Failed: {}", failed_count);
    println!("   📋 Total: {}", events.len());
}
