// src/crawl/mod.rs
// =============================================================================
// This module holds the concurrent crawl engine.
//
// Features:
// - A fixed pool of workers fed by one shared queue
// - Exactly-once processing of every URL, even when many pages link to it
// - Completion detection over a graph that is discovered while crawling
// - A politeness delay before each internal page fetch
// - Broken links collected per referring page
// =============================================================================

mod inflight;
mod orchestrator;
mod registry;
mod task;
mod worker;

pub use inflight::{InFlight, TaskGuard};
pub use orchestrator::Orchestrator;
pub use registry::{BrokenLink, BrokenLinkRegistry};
pub use task::CrawlTask;
