// src/fetcher/html.rs
// =============================================================================
// This module extracts the links a crawled HTML page points to.
//
// We use the `scraper` crate to parse the HTML and find <a href> elements,
// and the `url` crate to turn relative hrefs into absolute URLs.
//
// Rules:
// - Anchors (#...), mailto:, tel: and javascript: links are skipped
// - Only http/https links are kept
// - The #fragment part is dropped (same page, different scroll position)
// - Optionally, only links on one host are kept
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

// Extracts all crawlable links from an HTML page
//
// Parameters:
//   html: the page content
//   page_url: the URL the page was fetched from (for resolving relative links)
//   host: when Some, only links on this exact host are returned
//
// Returns: absolute URLs in document order (duplicates included; the crawl
// engine's claim set deals with those)
pub fn extract_links(html: &str, page_url: &str, host: Option<&str>) -> Vec<String> {
    let mut links = Vec::new();

    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!(page_url, error = %e, "cannot resolve links against invalid page URL");
            return links;
        }
    };

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    let document = Html::parse_document(html);

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(resolved) = resolve_link(&base, href) else {
            continue;
        };

        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }

        if let Some(host) = host {
            if resolved.host_str() != Some(host) {
                continue;
            }
        }

        links.push(resolved.to_string());
    }

    links
}

// Resolves a link (possibly relative) to an absolute URL without its fragment
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    // Skip anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    // join() handles both absolute and relative hrefs
    let mut url = base.join(href).ok()?;
    url.set_fragment(None);
    Some(url)
}
