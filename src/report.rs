// src/report.rs
// =============================================================================
// Crawl results and the ways we print them.
//
// The engine hands over a `CrawlReport` once the crawl has completed. All
// renderers here are plain formatting over that data:
// - render_table: the terminal summary
// - JSON: `CrawlReport` derives Serialize (visited URL sets are left out)
// - render_html: standalone broken-links.html document
// =============================================================================

use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write;
use std::time::Duration;

use crate::crawl::BrokenLink;

/// Counters derived from the dedup sets and the registry after a crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub start_url: String,
    /// Internal URLs visited
    pub internal_links: usize,
    /// External URLs checked
    pub external_links: usize,
    /// Pages with at least one broken link
    pub broken_pages: usize,
    pub broken_links: usize,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

/// Everything a crawl produced
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub summary: CrawlSummary,
    /// Referring page -> broken links found on it, in discovery order.
    /// The start URL's own failure is listed under the empty page.
    pub broken: BTreeMap<String, Vec<BrokenLink>>,
    #[serde(skip)]
    pub visited_internal: BTreeSet<String>,
    #[serde(skip)]
    pub checked_external: BTreeSet<String>,
}

impl CrawlReport {
    pub fn has_broken_links(&self) -> bool {
        self.summary.broken_links > 0
    }

    pub fn broken_on(&self, page: &str) -> &[BrokenLink] {
        self.broken.get(page).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn serialize_millis<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis() as u64)
}

/// Crawl time as "Xm Ys"
pub fn format_duration(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs();
    format!("{}m {}s", seconds / 60, seconds % 60)
}

fn page_label(page: &str) -> &str {
    if page.is_empty() {
        "(start URL)"
    } else {
        page
    }
}

/// Human-readable table for the terminal
pub fn render_table(report: &CrawlReport) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    if report.broken.is_empty() {
        let _ = writeln!(out, "✅ No broken links found");
    } else {
        let _ = writeln!(out, "{:<60} {:<8} {:<10}", "URL", "STATUS", "TYPE");
        let _ = writeln!(out, "{}", "=".repeat(80));

        for (page, links) in &report.broken {
            let _ = writeln!(out, "📄 {}", page_label(page));
            for link in links {
                let _ = writeln!(
                    out,
                    "{:<60} {:<8} {:<10}",
                    truncate(&link.url, 57),
                    link.status,
                    link.kind
                );
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "📊 Summary for {}:", summary.start_url);
    let _ = writeln!(out, "   🔗 Internal links crawled: {}", summary.internal_links);
    let _ = writeln!(out, "   🌐 External links checked: {}", summary.external_links);
    let _ = writeln!(out, "   📄 Pages with broken links: {}", summary.broken_pages);
    let _ = writeln!(out, "   ❌ Broken links: {}", summary.broken_links);
    let _ = writeln!(out, "   ⏱️  Crawl time: {}", format_duration(summary.elapsed));
    out
}

fn truncate(url: &str, max: usize) -> String {
    if url.chars().count() > max {
        let head: String = url.chars().take(max).collect();
        format!("{}...", head)
    } else {
        url.to_string()
    }
}

/// Standalone HTML report
pub fn render_html(report: &CrawlReport) -> String {
    let summary = &report.summary;
    let mut out = String::new();

    out.push_str("<!DOCTYPE html><html><head><meta charset='UTF-8'>");
    out.push_str("<title>Broken Links Report</title>");
    out.push_str("<style>body { font-family: sans-serif; } li { margin: 4px 0; }</style>");
    out.push_str("</head><body>");
    out.push_str("<h2>Broken Links Report</h2>");

    let rows = [
        ("Start-url", escape_html(&summary.start_url)),
        ("Internal links crawled", summary.internal_links.to_string()),
        ("External links crawled", summary.external_links.to_string()),
        ("Number of Broken pages", summary.broken_pages.to_string()),
        ("Number of broken links", summary.broken_links.to_string()),
        ("Total crawl time", format_duration(summary.elapsed)),
    ];
    out.push_str("<table>");
    for (label, value) in rows {
        let _ = write!(out, "<tr><td>{}</td><td>{}</td></tr>", label, value);
    }
    out.push_str("</table>\n");

    for (page, links) in &report.broken {
        let page = escape_html(page_label(page));
        let _ = writeln!(out, "<h3>Source: <a href='{0}'>{0}</a></h3>", page);
        out.push_str("<ul>\n");
        for link in links {
            let url = escape_html(&link.url);
            let _ = writeln!(
                out,
                "<li>🔗 <a href='{0}'>{0}</a> (Status: {1}, Type: {2})</li>",
                url, link.status, link.kind
            );
        }
        out.push_str("</ul>\n");
    }

    out.push_str("</body></html>");
    out
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
