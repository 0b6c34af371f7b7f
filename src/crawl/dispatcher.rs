// src/crawl/dispatcher.rs
// =============================================================================
// This module implements the concurrent crawl itself.
//
// How it works:
// 1. The caller's task claims the root URL, registers it with the completion
//    tracker and visits it directly
// 2. Visiting a URL fetches it, reports the result, then claims each link it
//    found. Every link that is newly claimed gets registered and spawned as
//    its own tokio task, with one less unit of depth budget
// 3. A task with no depth budget left returns without fetching
// 4. The caller waits on the tracker until every spawned task has finished
//
// Ordering rules:
// - A child is registered BEFORE it is spawned, never after
// - Each task's guard is dropped exactly once, whatever path it exits by
// - Fetch failures are reported and end that branch only
//
// Rust concepts:
// - Arc: One CrawlContext per crawl, shared by all of its tasks
// - BoxFuture: `visit` returns a boxed future so it can spawn itself
// - tokio::spawn: Runs each visit concurrently on the runtime
// =============================================================================

use super::claims::ClaimSet;
use super::report::CrawlReporter;
use super::tracker::{CompletionTracker, TaskGuard};
use crate::fetcher::Fetcher;
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tracing::{debug, debug_span, Instrument};

// Everything one crawl run shares between its tasks
//
// A fresh context is built for each `run_crawl` call, so two crawls running
// at the same time never see each other's claims or counts.
struct CrawlContext {
    max_depth: usize,
    claims: ClaimSet,
    tracker: Arc<CompletionTracker>,
    fetcher: Arc<dyn Fetcher>,
    reporter: Arc<dyn CrawlReporter>,
}

/// Crawls the link graph reachable from `root`, visiting every URL at most
/// once and following at most `max_depth` levels (the root is level one).
///
/// Resolves when every spawned visit has finished. Outcomes are delivered
/// through `reporter`; a failed fetch never aborts the rest of the crawl.
pub async fn run_crawl(
    root: &str,
    max_depth: usize,
    fetcher: Arc<dyn Fetcher>,
    reporter: Arc<dyn CrawlReporter>,
) {
    let ctx = Arc::new(CrawlContext {
        max_depth,
        claims: ClaimSet::new(),
        tracker: CompletionTracker::new(),
        fetcher,
        reporter,
    });

    ctx.claims.try_claim(root);
    let guard = ctx.tracker.register();
    visit(Arc::clone(&ctx), root.to_string(), max_depth, guard).await;

    ctx.tracker.wait_idle().await;
    debug_assert_eq!(ctx.tracker.outstanding(), 0);
    debug!(root, max_depth, claimed = ctx.claims.len(), "crawl finished");
}

// Visits one claimed URL with `remaining` levels of depth budget
//
// `guard` is this task's unit in the completion tracker; it is released when
// the returned future completes or is dropped.
fn visit(
    ctx: Arc<CrawlContext>,
    url: String,
    remaining: usize,
    guard: TaskGuard,
) -> BoxFuture<'static, ()> {
    let span = debug_span!("visit", url = %url, remaining);

    async move {
        let _guard = guard;

        if remaining == 0 {
            debug!("depth budget exhausted");
            return;
        }

        let depth = ctx.max_depth - remaining;

        let page = match ctx.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(error) => {
                ctx.reporter.failed(&url, depth, &error);
                return;
            }
        };

        ctx.reporter.visited(&url, depth, &page);

        for link in page.links {
            if !ctx.claims.try_claim(&link) {
                debug!(link = %link, "already claimed");
                continue;
            }

            let child = ctx.tracker.register();
            tokio::spawn(visit(Arc::clone(&ctx), link, remaining - 1, child));
        }
    }
    .instrument(span)
    .boxed()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does `visit` return BoxFuture instead of being an `async fn`?
//    - `visit` spawns more `visit`s, so its future type would contain itself
//    - Boxing gives the future a fixed, nameable type: Pin<Box<dyn Future>>
//    - `.boxed()` also requires the future to be Send, which tokio::spawn needs
//
// 2. Why is `let _guard = guard;` the first line of the async block?
//    - It moves the guard into the task so it lives until the task ends
//    - `let _ = guard;` would drop it immediately (a different thing!)
//
// 3. What does `Arc::clone(&ctx)` cost?
//    - One atomic increment; the context itself is not copied
//
// 4. Why `remaining - 1` and not `remaining.saturating_sub(1)`?
//    - We only get here when `remaining` is at least 1
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::report::{CollectingReporter, CrawlEvent};
    use crate::fetcher::{FetchError, FetchedPage, GraphFetcher};
    use async_trait::async_trait;
    use dashmap::DashMap;
    use std::collections::BTreeSet;
    use std::time::Duration;
    use tokio::time::timeout;

    // Wraps a graph and counts how often each URL is fetched
    #[derive(Default)]
    struct CountingFetcher {
        graph: GraphFetcher,
        fetches: DashMap<String, usize>,
        delay: Option<Duration>,
        panic_on: Option<String>,
    }

    impl CountingFetcher {
        fn new(graph: GraphFetcher) -> Arc<Self> {
            Arc::new(Self {
                graph,
                ..Self::default()
            })
        }

        fn count(&self, url: &str) -> usize {
            self.fetches.get(url).map(|n| *n).unwrap_or(0)
        }

        fn fetched(&self) -> BTreeSet<String> {
            self.fetches.iter().map(|e| e.key().clone()).collect()
        }

        fn max_fetches(&self) -> usize {
            self.fetches.iter().map(|e| *e.value()).max().unwrap_or(0)
        }
    }

    #[async_trait]
    impl Fetcher for CountingFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
            *self.fetches.entry(url.to_string()).or_insert(0) += 1;
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.panic_on.as_deref() == Some(url) {
                panic!("fetcher crashed on {url}");
            }
            self.graph.fetch(url).await
        }
    }

    // root -> [a, b], a -> [root, b], b -> [root]
    fn small_cycle() -> GraphFetcher {
        GraphFetcher::new()
            .with_page("root", "Root", ["a", "b"])
            .with_page("a", "A", ["root", "b"])
            .with_page("b", "B", ["root"])
    }

    // n0 -> n1 -> ... -> n{len-1}
    fn chain(len: usize) -> GraphFetcher {
        (0..len).fold(GraphFetcher::new(), |graph, i| {
            let links: Vec<String> = if i + 1 < len {
                vec![format!("n{}", i + 1)]
            } else {
                Vec::new()
            };
            graph.with_page(&format!("n{i}"), "", links)
        })
    }

    // Every node links to every node, including itself
    fn complete(size: usize) -> GraphFetcher {
        let names: Vec<String> = (0..size).map(|i| format!("k{i}")).collect();
        names.iter().fold(GraphFetcher::new(), |graph, name| {
            graph.with_page(name, name, names.clone())
        })
    }

    async fn crawl(
        root: &str,
        max_depth: usize,
        fetcher: &Arc<CountingFetcher>,
    ) -> Vec<CrawlEvent> {
        let reporter = Arc::new(CollectingReporter::new());
        timeout(
            Duration::from_secs(10),
            run_crawl(
                root,
                max_depth,
                Arc::clone(fetcher) as Arc<dyn Fetcher>,
                Arc::clone(&reporter) as Arc<dyn CrawlReporter>,
            ),
        )
        .await
        .expect("crawl should terminate");
        reporter.events()
    }

    fn urls(events: &[CrawlEvent], ok: bool) -> BTreeSet<String> {
        events
            .iter()
            .filter(|e| e.is_ok() == ok)
            .map(|e| e.url().to_string())
            .collect()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_cycle_visits_each_once() {
        let fetcher = CountingFetcher::new(small_cycle());
        let events = crawl("root", 4, &fetcher).await;

        assert_eq!(fetcher.fetched(), set(&["root", "a", "b"]));
        assert_eq!(fetcher.max_fetches(), 1);
        assert_eq!(urls(&events, true), set(&["root", "a", "b"]));
        assert_eq!(events.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_depth_one_fetches_only_root() {
        let fetcher = CountingFetcher::new(small_cycle());
        let events = crawl("root", 1, &fetcher).await;

        assert_eq!(fetcher.fetched(), set(&["root"]));
        assert_eq!(fetcher.count("a"), 0);
        assert_eq!(fetcher.count("b"), 0);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].depth(), 0);
    }

    #[tokio::test]
    async fn test_depth_zero_fetches_nothing() {
        let fetcher = CountingFetcher::new(small_cycle());
        let events = crawl("root", 0, &fetcher).await;

        assert!(fetcher.fetched().is_empty());
        assert!(events.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_failure_is_isolated() {
        // Same shape as small_cycle, but "b" does not exist
        let graph = GraphFetcher::new()
            .with_page("root", "Root", ["a", "b"])
            .with_page("a", "A", ["root", "b"]);
        let fetcher = CountingFetcher::new(graph);
        let events = crawl("root", 4, &fetcher).await;

        assert_eq!(urls(&events, true), set(&["root", "a"]));
        assert_eq!(urls(&events, false), set(&["b"]));
        assert_eq!(fetcher.count("b"), 1);

        let failure = events.iter().find(|e| !e.is_ok()).unwrap();
        assert_eq!(
            failure,
            &CrawlEvent::Failed {
                url: "b".to_string(),
                depth: 1,
                error: "not found: b".to_string(),
            }
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_every_branch_failing_still_completes() {
        let graph = GraphFetcher::new().with_page("root", "Root", ["x", "y", "z"]);
        let fetcher = CountingFetcher::new(graph);
        let events = crawl("root", 3, &fetcher).await;

        assert_eq!(urls(&events, false), set(&["x", "y", "z"]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_root_failure_completes() {
        let fetcher = CountingFetcher::new(GraphFetcher::new());
        let events = crawl("missing", 5, &fetcher).await;

        assert_eq!(urls(&events, false), set(&["missing"]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_depth_bound_on_chain() {
        let fetcher = CountingFetcher::new(chain(10));
        let events = crawl("n0", 3, &fetcher).await;

        assert_eq!(fetcher.fetched(), set(&["n0", "n1", "n2"]));
        let depths: Vec<usize> = {
            let mut d: Vec<usize> = events.iter().map(CrawlEvent::depth).collect();
            d.sort_unstable();
            d
        };
        assert_eq!(depths, vec![0, 1, 2]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_dense_graph_never_fetches_twice() {
        let fetcher = Arc::new(CountingFetcher {
            graph: complete(40),
            delay: Some(Duration::from_millis(1)),
            ..CountingFetcher::default()
        });

        crawl("k0", 6, &fetcher).await;

        assert_eq!(fetcher.fetched().len(), 40);
        assert_eq!(fetcher.max_fetches(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_sample_graph() {
        let fetcher = CountingFetcher::new(GraphFetcher::sample());
        let events = crawl("https://golang.org/", 4, &fetcher).await;

        assert_eq!(
            urls(&events, true),
            set(&[
                "https://golang.org/",
                "https://golang.org/pkg/",
                "https://golang.org/pkg/fmt/",
                "https://golang.org/pkg/os/",
            ])
        );
        assert_eq!(urls(&events, false), set(&["https://golang.org/cmd/"]));
        assert_eq!(fetcher.max_fetches(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_crawls_do_not_share_state() {
        let fetcher = Arc::new(CountingFetcher {
            graph: small_cycle(),
            delay: Some(Duration::from_millis(2)),
            ..CountingFetcher::default()
        });

        let (first, second) = tokio::join!(
            crawl("root", 4, &fetcher),
            crawl("root", 4, &fetcher)
        );

        // Each crawl saw the whole graph on its own
        assert_eq!(urls(&first, true), set(&["root", "a", "b"]));
        assert_eq!(urls(&second, true), set(&["root", "a", "b"]));
        assert_eq!(fetcher.count("root"), 2);
        assert_eq!(fetcher.count("a"), 2);
        assert_eq!(fetcher.count("b"), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_panicking_child_does_not_hang_crawl() {
        let fetcher = Arc::new(CountingFetcher {
            graph: small_cycle(),
            panic_on: Some("a".to_string()),
            ..CountingFetcher::default()
        });

        let events = crawl("root", 4, &fetcher).await;

        assert!(urls(&events, true).contains("root"));
        assert!(!urls(&events, true).contains("a"));
        assert_eq!(fetcher.count("a"), 1);
    }
}
