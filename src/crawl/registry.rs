// src/crawl/registry.rs
// =============================================================================
// Broken links, grouped by the page that referenced them.
//
// Workers append concurrently, possibly under the same page. DashMap's
// `entry` holds the shard lock for the duration of the push, so appends to
// one page are never lost and keep the order in which they happened.
//
// The registry is only read after the crawl has completed.
// =============================================================================

use dashmap::DashMap;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::checker::LinkKind;

/// A link whose status check came back >= 400
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    pub url: String,
    pub status: u16,
    pub kind: LinkKind,
}

impl BrokenLink {
    pub fn new(url: impl Into<String>, status: u16, kind: LinkKind) -> Self {
        Self {
            url: url.into(),
            status,
            kind,
        }
    }
}

#[derive(Debug, Default)]
pub struct BrokenLinkRegistry {
    by_page: DashMap<String, Vec<BrokenLink>>,
}

impl BrokenLinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, from_page: &str, link: BrokenLink) {
        self.by_page
            .entry(from_page.to_string())
            .or_default()
            .push(link);
    }

    /// Number of pages with at least one broken link
    pub fn page_count(&self) -> usize {
        self.by_page.len()
    }

    /// Total number of broken links across all pages
    pub fn link_count(&self) -> usize {
        self.by_page.iter().map(|entry| entry.value().len()).sum()
    }

    /// Copy of the full mapping, pages sorted by URL.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<BrokenLink>> {
        self.by_page
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}
