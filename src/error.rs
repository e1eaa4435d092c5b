// src/error.rs
// =============================================================================
// Error types for the crawl engine.
//
// Only a few things can actually fail a crawl: a start URL we cannot parse,
// an HTTP client we cannot build, a bad configuration, failing to seed the
// first task, or the wait being interrupted. Everything that goes wrong
// inside a single task (probe failures, page fetch failures) is recovered
// where it happens and never shows up here.
// =============================================================================

use thiserror::Error;

/// Errors that end a crawl run.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The start URL could not be parsed
    #[error("invalid start URL '{url}': {source}")]
    InvalidStartUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The shared HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// The configuration is unusable
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The very first task could not be handed to the worker pool
    #[error("failed to seed crawl with {url}")]
    Seed { url: String },

    /// The caller stopped waiting before the crawl completed
    #[error("crawl interrupted: {reason}")]
    Interrupted { reason: String },
}

impl CrawlError {
    pub fn is_interrupted(&self) -> bool {
        matches!(self, CrawlError::Interrupted { .. })
    }
}

/// Errors while fetching the content of a page already known to be live.
///
/// These are logged by the worker and mean "this page contributes no
/// further links". They never mark the page itself as broken.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("not an HTML document ({content_type})")]
    NotHtml { content_type: String },

    #[error("failed to read body: {0}")]
    Body(#[source] reqwest::Error),
}
