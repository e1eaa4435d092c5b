// src/lib.rs
// =============================================================================
// link-sentinel crawls one website from a start page, checks that every
// internal and external link it can reach answers with a non-error status,
// and reports broken links grouped by the page that referenced them.
//
// Modules:
// - checker: link classification, status probes, HTML link extraction
// - crawl: the concurrent crawl engine
// - config: crawl settings
// - error: error types
// - report: crawl results and renderers
// =============================================================================

pub mod checker;
pub mod config;
pub mod crawl;
pub mod error;
pub mod report;

pub use config::CrawlConfig;
pub use crawl::{BrokenLink, Orchestrator};
pub use error::CrawlError;
pub use report::{CrawlReport, CrawlSummary};
