// src/crawl/orchestrator.rs
// =============================================================================
// The crawl orchestrator: turns "process one URL" into "process every URL
// reachable from the start page".
//
// How it works:
// 1. W worker tasks are spawned into a JoinSet. They share one unbounded
//    channel, which is the pool's queue.
// 2. The start URL is submitted as the only seed (no referrer).
// 3. Workers run tasks (see worker.rs). Each task may submit more tasks.
// 4. The in-flight counter (see inflight.rs) reaches zero only when no
//    task is running or queued. That fires the completion signal.
// 5. The workers are shut down and the report is built from the dedup
//    sets and the broken link registry.
//
// Shared state is confined to the two dedup sets, the in-flight counter,
// and the registry. Nothing else is locked, apart from the queue receiver
// while a worker waits on it.
// =============================================================================

use dashmap::DashSet;
use std::collections::BTreeSet;
use std::future::{self, Future};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use url::Url;

use super::inflight::InFlight;
use super::registry::BrokenLinkRegistry;
use super::task::{CrawlTask, QueuedTask};
use super::worker::{run_worker, TaskQueue};
use crate::checker::{HttpProber, LinkClassifier, LinkKind};
use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::report::{CrawlReport, CrawlSummary};

/// Everything the workers share during one crawl
#[derive(Debug)]
pub(crate) struct CrawlState {
    pub classifier: LinkClassifier,
    pub prober: HttpProber,
    pub politeness_delay: Duration,
    pub registry: BrokenLinkRegistry,
    visited_internal: DashSet<String>,
    checked_external: DashSet<String>,
    in_flight: InFlight,
    queue: mpsc::UnboundedSender<QueuedTask>,
}

impl CrawlState {
    /// Hands a discovered URL to the pool. Never blocks.
    ///
    /// The in-flight unit is taken here, before the hand-off, so a task
    /// submitting children keeps the counter above zero until it finishes.
    /// Blank URLs are ignored. Returns whether the task was queued.
    pub fn submit(&self, url: &str, from_page: &str) -> bool {
        let url = url.trim();
        if url.is_empty() {
            return false;
        }

        let queued = QueuedTask {
            task: CrawlTask::new(url, from_page),
            guard: self.in_flight.acquire(),
        };

        // On failure the rejected task (and its guard) is dropped here.
        match self.queue.send(queued) {
            Ok(()) => true,
            Err(rejected) => {
                log::error!("Worker pool is gone, dropping {}", rejected.0.task.url);
                false
            }
        }
    }

    /// Atomically claims `url` for processing in the set matching `kind`.
    /// Only the first claim of a URL succeeds.
    pub fn claim(&self, url: &str, kind: LinkKind) -> bool {
        match kind {
            LinkKind::Internal => self.visited_internal.insert(url.to_string()),
            LinkKind::External => self.checked_external.insert(url.to_string()),
        }
    }

    fn report(&self, start_url: &str, elapsed: Duration) -> CrawlReport {
        let broken = self.registry.snapshot();
        let summary = CrawlSummary {
            start_url: start_url.to_string(),
            internal_links: self.visited_internal.len(),
            external_links: self.checked_external.len(),
            broken_pages: broken.len(),
            broken_links: broken.values().map(Vec::len).sum(),
            elapsed,
        };

        CrawlReport {
            summary,
            broken,
            visited_internal: sorted(&self.visited_internal),
            checked_external: sorted(&self.checked_external),
        }
    }
}

fn sorted(set: &DashSet<String>) -> BTreeSet<String> {
    set.iter().map(|url| url.key().clone()).collect()
}

/// Runs one crawl. `start` consumes the orchestrator, so each instance
/// crawls exactly once.
#[derive(Debug)]
pub struct Orchestrator {
    state: Arc<CrawlState>,
    receiver: mpsc::UnboundedReceiver<QueuedTask>,
    workers: usize,
}

impl Orchestrator {
    /// Builds an orchestrator whose base domain is taken from `base_url`.
    pub fn new(base_url: &str, config: CrawlConfig) -> Result<Self, CrawlError> {
        config.validate()?;

        Url::parse(base_url).map_err(|source| CrawlError::InvalidStartUrl {
            url: base_url.to_string(),
            source,
        })?;

        let classifier = LinkClassifier::new(base_url);
        if classifier.base_domain().is_empty() {
            return Err(CrawlError::InvalidStartUrl {
                url: base_url.to_string(),
                source: url::ParseError::EmptyHost,
            });
        }

        let prober = HttpProber::new(&config)?;
        let (queue, receiver) = mpsc::unbounded_channel();

        let state = CrawlState {
            classifier,
            prober,
            politeness_delay: config.politeness_delay,
            registry: BrokenLinkRegistry::new(),
            visited_internal: DashSet::new(),
            checked_external: DashSet::new(),
            in_flight: InFlight::new(),
            queue,
        };

        Ok(Self {
            state: Arc::new(state),
            receiver,
            workers: config.workers,
        })
    }

    pub fn base_domain(&self) -> &str {
        self.state.classifier.base_domain()
    }

    /// Crawls from `start_url` and waits until no work is left.
    pub async fn start(self, start_url: &str) -> Result<CrawlReport, CrawlError> {
        self.start_with_shutdown(start_url, future::pending::<()>())
            .await
    }

    /// Like `start`, but gives up with `CrawlError::Interrupted` as soon as
    /// `shutdown` completes.
    pub async fn start_with_shutdown<F>(
        self,
        start_url: &str,
        shutdown: F,
    ) -> Result<CrawlReport, CrawlError>
    where
        F: Future<Output = ()>,
    {
        let Orchestrator {
            state,
            receiver,
            workers,
        } = self;

        let started = Instant::now();
        let mut done = state.in_flight.subscribe();

        let queue: TaskQueue = Arc::new(Mutex::new(receiver));
        let mut pool = JoinSet::new();
        for worker_id in 0..workers {
            pool.spawn(run_worker(worker_id, Arc::clone(&state), Arc::clone(&queue)));
        }
        log::info!(
            "Crawling {} with {} workers (base domain {})",
            start_url,
            workers,
            state.classifier.base_domain()
        );

        if !state.submit(start_url, "") {
            pool.shutdown().await;
            return Err(CrawlError::Seed {
                url: start_url.to_string(),
            });
        }

        let outcome = tokio::select! {
            finished = done.wait_for(|complete| *complete) => match finished {
                Ok(_) => Ok(()),
                Err(_) => Err(CrawlError::Interrupted {
                    reason: "completion signal was dropped".to_string(),
                }),
            },
            _ = shutdown => Err(CrawlError::Interrupted {
                reason: "shutdown requested".to_string(),
            }),
        };

        pool.shutdown().await;
        outcome?;

        let elapsed = started.elapsed();
        let report = state.report(start_url, elapsed);
        log::info!(
            "Crawl finished: {} internal, {} external, {} broken link(s) in {:?}",
            report.summary.internal_links,
            report.summary.external_links,
            report.summary.broken_links,
            elapsed
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> CrawlConfig {
        CrawlConfig::new()
            .with_workers(2)
            .with_politeness_delay(Duration::ZERO)
            .with_timeouts(Duration::from_secs(1))
    }

    #[test]
    fn test_new_rejects_invalid_start_url() {
        let result = Orchestrator::new("not a url", test_config());
        assert!(matches!(result, Err(CrawlError::InvalidStartUrl { .. })));
    }

    #[test]
    fn test_new_rejects_hostless_url() {
        let result = Orchestrator::new("mailto:someone@example.com", test_config());
        assert!(matches!(result, Err(CrawlError::InvalidStartUrl { .. })));
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let result = Orchestrator::new("https://example.com", test_config().with_workers(0));
        assert!(matches!(result, Err(CrawlError::Config(_))));
    }

    #[test]
    fn test_base_domain_from_start_url() {
        let orchestrator = Orchestrator::new("https://WWW.Example.com/start", test_config()).unwrap();
        assert_eq!(orchestrator.base_domain(), "example.com");
    }

    #[tokio::test]
    async fn test_blank_seed_is_reported() {
        let orchestrator = Orchestrator::new("https://example.com", test_config()).unwrap();
        let result = orchestrator.start("   ").await;
        assert!(matches!(result, Err(CrawlError::Seed { .. })));
    }

    #[test]
    fn test_submit_blank_is_noop() {
        let orchestrator = Orchestrator::new("https://example.com", test_config()).unwrap();
        assert!(!orchestrator.state.submit("", "https://example.com/"));
        assert!(!orchestrator.state.submit("  \t", "https://example.com/"));
        assert_eq!(orchestrator.state.in_flight.in_flight(), 0);
    }

    #[test]
    fn test_submit_after_pool_is_gone_releases_unit() {
        let Orchestrator { state, receiver, .. } =
            Orchestrator::new("https://example.com", test_config()).unwrap();
        drop(receiver);
        assert!(!state.submit("https://example.com/page", ""));
        assert_eq!(state.in_flight.in_flight(), 0);
    }

    #[test]
    fn test_claim_is_exclusive_per_url() {
        let orchestrator = Orchestrator::new("https://example.com", test_config()).unwrap();
        let state = &orchestrator.state;
        assert!(state.claim("https://example.com/a", LinkKind::Internal));
        assert!(!state.claim("https://example.com/a", LinkKind::Internal));
        assert!(state.claim("https://other.test/", LinkKind::External));
        assert!(!state.claim("https://other.test/", LinkKind::External));
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_crawl() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(1500)))
            .mount(&server)
            .await;

        let start = format!("{}/", server.uri());
        let orchestrator = Orchestrator::new(&start, test_config()).unwrap();
        let result = orchestrator
            .start_with_shutdown(&start, tokio::time::sleep(Duration::from_millis(50)))
            .await;
        assert!(matches!(result, Err(ref e) if e.is_interrupted()));
    }
}
