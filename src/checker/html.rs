// src/checker/html.rs
// =============================================================================
// This module extracts links and images from HTML pages.
//
// We use the `scraper` crate to parse the document and select elements, and
// the `url` crate to resolve relative references against the page's own URL.
//
// What comes out:
// - anchors: absolute href values of <a href>, without mailto: and tel:
// - images:  absolute src values of <img src>
//
// Both lists keep document order and drop duplicates. Values that cannot be
// resolved against the page URL are skipped.
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Links discovered on one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLinks {
    pub anchors: Vec<String>,
    pub images: Vec<String>,
}

/// Schemes that are never crawled or checked
const SKIPPED_SCHEMES: [&str; 2] = ["mailto:", "tel:"];

// Extracts anchor and image URLs from an HTML document
//
// Parameters:
//   html: the document source
//   page_url: the URL the document was fetched from
//
// Example:
//   html = "<a href='/docs'>Docs</a><img src='logo.png'>"
//   page_url = "https://example.com/"
//   anchors = ["https://example.com/docs"], images = ["https://example.com/logo.png"]
pub fn extract_page_links(html: &str, page_url: &str) -> PageLinks {
    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(e) => {
            log::warn!("Invalid page URL {}: {}", page_url, e);
            return PageLinks::default();
        }
    };

    let document = Html::parse_document(html);

    // Both selectors are constants known to be valid
    let anchor_selector = Selector::parse("a[href]").unwrap();
    let image_selector = Selector::parse("img[src]").unwrap();

    let anchors = collect_unique(
        document
            .select(&anchor_selector)
            .filter_map(|el| el.value().attr("href"))
            .filter_map(|href| resolve_url(&base, href))
            .filter(|url| !is_skipped_scheme(url)),
    );

    let images = collect_unique(
        document
            .select(&image_selector)
            .filter_map(|el| el.value().attr("src"))
            .filter_map(|src| resolve_url(&base, src)),
    );

    PageLinks { anchors, images }
}

// Resolves a possibly-relative reference to an absolute URL
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs" -> Some("https://example.com/docs")
//   href = "../other" -> Some("https://example.com/other")
//   href = "https://other.com" -> Some("https://other.com/")
//   href = "" -> None
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    base.join(href).ok().map(|url| url.to_string())
}

fn is_skipped_scheme(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    SKIPPED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
}

// Keeps the first occurrence of every URL, in order
fn collect_unique(urls: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.filter(|url| seen.insert(url.clone())).collect()
}
