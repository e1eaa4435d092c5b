// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI is a struct, each field an argument, and
// the #[arg(...)] attributes configure flags and defaults.
// =============================================================================

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use link_sentinel::config::{
    CrawlConfig, DEFAULT_POLITENESS_DELAY_MS, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
    DEFAULT_WORKERS,
};

#[derive(Parser, Debug)]
#[command(
    name = "link-sentinel",
    version,
    about = "Crawl a website and report every broken link, grouped by the page that links to it",
    long_about = "link-sentinel starts from one page, follows every link on the same site, and \
                  checks every internal and external link and image it finds. Links answering \
                  with a status of 400 or above, or not answering at all, are reported under \
                  the page that references them."
)]
pub struct Cli {
    /// Website URL to start crawling from (e.g., https://example.com)
    pub start_url: String,

    /// Number of parallel workers
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Pause before fetching each internal page, in milliseconds
    #[arg(long, default_value_t = DEFAULT_POLITENESS_DELAY_MS)]
    pub delay_ms: u64,

    /// Connect and read timeout for every request, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Also write an HTML report to this file (e.g., broken-links.html)
    #[arg(long, value_name = "PATH")]
    pub html_report: Option<PathBuf>,

    /// Logging level; RUST_LOG overrides it
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig::new()
            .with_workers(self.workers)
            .with_politeness_delay(Duration::from_millis(self.delay_ms))
            .with_timeouts(Duration::from_secs(self.timeout_secs))
            .with_user_agent(self.user_agent.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}
