// src/crawl/inflight.rs
// =============================================================================
// Termination detection for the crawl.
//
// The crawl graph is discovered while we walk it, so there is no queue we
// can watch for "empty". Instead every task holds one unit of an atomic
// in-flight counter from the moment it is submitted until it has finished
// running, and the completion signal fires once, when the counter drops
// from 1 to 0.
//
// Ordering rule: a task submits all of its children (each child takes its
// own unit first) before it releases its own unit. Releasing is therefore
// the last thing a task does. With that rule the counter can only reach 0
// when nothing is running and nothing is queued. Breaking it (for example
// releasing the parent before submitting a child) lets the counter hit a
// false zero and the crawl ends early with pages never visited.
//
// Units are held by `TaskGuard`, which releases on drop. A task that fails
// or panics still drops its guard.
// =============================================================================

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug)]
struct Inner {
    count: AtomicUsize,
    fired: AtomicBool,
    done: watch::Sender<bool>,
}

/// In-flight task counter with a one-shot completion signal
#[derive(Debug, Clone)]
pub struct InFlight {
    inner: Arc<Inner>,
}

impl Default for InFlight {
    fn default() -> Self {
        Self::new()
    }
}

impl InFlight {
    pub fn new() -> Self {
        let (done, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                count: AtomicUsize::new(0),
                fired: AtomicBool::new(false),
                done,
            }),
        }
    }

    /// Takes one unit. Must happen before the task is handed to the pool.
    pub fn acquire(&self) -> TaskGuard {
        self.inner.count.fetch_add(1, Ordering::AcqRel);
        TaskGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Number of tasks submitted and not yet finished
    pub fn in_flight(&self) -> usize {
        self.inner.count.load(Ordering::Acquire)
    }

    /// Whether the completion signal has fired
    pub fn is_complete(&self) -> bool {
        self.inner.fired.load(Ordering::Acquire)
    }

    /// Receiver that observes `true` once the crawl has completed.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.inner.done.subscribe()
    }
}

/// One unit of in-flight work, released when dropped
#[derive(Debug)]
pub struct TaskGuard {
    inner: Arc<Inner>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        if self.inner.count.fetch_sub(1, Ordering::AcqRel) == 1
            && !self.inner.fired.swap(true, Ordering::AcqRel)
        {
            self.inner.done.send_replace(true);
        }
    }
}
