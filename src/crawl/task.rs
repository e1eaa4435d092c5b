// src/crawl/task.rs

use super::inflight::TaskGuard;

/// One URL to process, and the page it was found on.
///
/// `from_page` is empty for the start URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: String,
    pub from_page: String,
}

impl CrawlTask {
    pub fn new(url: impl Into<String>, from_page: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            from_page: from_page.into(),
        }
    }

    pub fn is_seed(&self) -> bool {
        self.from_page.is_empty()
    }
}

/// A task waiting in the pool queue, holding its in-flight unit.
///
/// Dropping a queued task without running it (for example when the queue
/// is closed) releases the unit as well.
#[derive(Debug)]
pub(crate) struct QueuedTask {
    pub task: CrawlTask,
    pub guard: TaskGuard,
}
