// src/crawl/worker.rs
// =============================================================================
// What a worker does with one task.
//
// 1. Claim the URL in the matching dedup set, or stop if someone else has
// 2. Check its status; record it as broken (>= 400) and stop
// 3. External links stop here
// 4. Internal links: wait the politeness delay, fetch the page, and if it
//    is HTML submit every anchor as a new task and check every image
//
// Failures while fetching or parsing a page that is already known to be
// live are logged and end the task. They do not make the page broken.
// =============================================================================

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

use super::orchestrator::CrawlState;
use super::registry::BrokenLink;
use super::task::{CrawlTask, QueuedTask};
use crate::checker::{extract_page_links, LinkKind, BROKEN_THRESHOLD};
use crate::error::FetchError;

pub(crate) type TaskQueue = Arc<Mutex<mpsc::UnboundedReceiver<QueuedTask>>>;

/// Pulls tasks from the shared queue until it is closed or the worker is
/// aborted.
pub(crate) async fn run_worker(worker_id: usize, state: Arc<CrawlState>, queue: TaskQueue) {
    log::debug!("Worker {} started", worker_id);

    loop {
        let next = { queue.lock().await.recv().await };
        let Some(QueuedTask { task, guard }) = next else {
            break;
        };

        let result = AssertUnwindSafe(process_task(&state, &task))
            .catch_unwind()
            .await;
        if result.is_err() {
            log::error!("Worker {}: task for {} panicked", worker_id, task.url);
        }

        // Every child of this task has been submitted by now.
        drop(guard);
    }

    log::debug!("Worker {} finished", worker_id);
}

pub(crate) async fn process_task(state: &CrawlState, task: &CrawlTask) {
    let url = task.url.as_str();
    if url.trim().is_empty() {
        return;
    }

    let kind = state.classifier.classify(url);
    if !state.claim(url, kind) {
        log::trace!("Already seen: {}", url);
        return;
    }

    match kind {
        LinkKind::Internal => log::info!("Visiting internal: {}", url),
        LinkKind::External => log::info!("Checking external: {}", url),
    }

    let status = state.prober.check_status(url).await;
    if status >= BROKEN_THRESHOLD {
        log::warn!("Broken link: {} (Status: {}) on {}", url, status, display_page(&task.from_page));
        state
            .registry
            .record(&task.from_page, BrokenLink::new(url, status, kind));
        return;
    }

    if kind == LinkKind::External {
        return;
    }

    if !state.politeness_delay.is_zero() {
        tokio::time::sleep(state.politeness_delay).await;
    }

    let page = match state.prober.fetch_page(url).await {
        Ok(page) => page,
        Err(FetchError::NotHtml { content_type }) => {
            log::debug!("Skipping content (not HTML): {} ({})", url, content_type);
            return;
        }
        Err(e) => {
            log::warn!("Error fetching {}: {}", url, e);
            return;
        }
    };

    let links = extract_page_links(&page.html, url);
    log::debug!(
        "{}: {} link(s), {} image(s)",
        url,
        links.anchors.len(),
        links.images.len()
    );

    for anchor in &links.anchors {
        state.submit(anchor, url);
    }

    for image in &links.images {
        check_image(state, image, url).await;
    }
}

// Images are checked where they are found and never queued as tasks
async fn check_image(state: &CrawlState, image_url: &str, from_page: &str) {
    let status = state.prober.check_status(image_url).await;
    if status >= BROKEN_THRESHOLD {
        log::warn!("Broken image: {} (Status: {}) on {}", image_url, status, from_page);
        let kind = state.classifier.classify(image_url);
        state
            .registry
            .record(from_page, BrokenLink::new(image_url, status, kind));
    }
}

fn display_page(from_page: &str) -> &str {
    if from_page.is_empty() {
        "(start)"
    } else {
        from_page
    }
}
