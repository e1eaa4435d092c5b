// src/config.rs
// =============================================================================
// Crawl configuration.
//
// The defaults match the behaviour the tool has always had: 10 workers,
// 200ms politeness delay before each content fetch, 5s connect and 5s read
// timeouts, and a browser-like User-Agent.
// =============================================================================

use std::time::Duration;

use crate::error::CrawlError;

pub const DEFAULT_WORKERS: usize = 10;
pub const DEFAULT_POLITENESS_DELAY_MS: u64 = 200;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Settings for one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Number of parallel workers in the pool
    pub workers: usize,
    /// Pause before fetching the content of an internal page
    pub politeness_delay: Duration,
    /// Connection establishment timeout for every request
    pub connect_timeout: Duration,
    /// Time allowed to receive the response once connected
    pub read_timeout: Duration,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Redirects followed before a request is treated as failed
    pub max_redirects: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            politeness_delay: Duration::from_millis(DEFAULT_POLITENESS_DELAY_MS),
            connect_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl CrawlConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_politeness_delay(mut self, delay: Duration) -> Self {
        self.politeness_delay = delay;
        self
    }

    /// Sets both the connect and the read timeout.
    pub fn with_timeouts(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self.read_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// Upper bound for a whole request. reqwest 0.11 only offers a connect
    /// timeout and a total timeout, so the total is connect + read.
    pub fn request_timeout(&self) -> Duration {
        self.connect_timeout + self.read_timeout
    }

    pub fn validate(&self) -> Result<(), CrawlError> {
        if self.workers == 0 {
            return Err(CrawlError::Config("workers must be greater than 0".into()));
        }
        if self.connect_timeout.is_zero() || self.read_timeout.is_zero() {
            return Err(CrawlError::Config("timeouts must be greater than 0".into()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(CrawlError::Config("user agent must not be empty".into()));
        }
        Ok(())
    }
}
