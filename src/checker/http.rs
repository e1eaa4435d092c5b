// src/checker/http.rs
// =============================================================================
// This module talks HTTP for the crawler.
//
// Key functionality:
// - Status probes: a HEAD request, retried once as GET when the server
//   answers 403 or 405 (some servers reject HEAD but serve GET)
// - Page fetches: a GET that only returns a body for HTML documents
//
// Network failures do not produce a status code of their own. The probe
// keeps the cause in `ProbeOutcome::Failed`, and `code()` folds it into the
// 500 sentinel, which the crawler treats like any other status >= 400. A
// real 500 from the server and "could not reach the server" are therefore
// indistinguishable in the report.
// =============================================================================

use reqwest::header::CONTENT_TYPE;
use reqwest::{redirect, Client, StatusCode};
use std::fmt;

use crate::config::CrawlConfig;
use crate::error::FetchError;

/// Status reported for URLs whose probe failed at the network level
pub const PROBE_FAILURE_STATUS: u16 = 500;

/// Lowest status code considered broken
pub const BROKEN_THRESHOLD: u16 = 400;

/// Why a probe produced no status code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// Connect or read timeout elapsed
    Timeout,
    /// Redirect limit exceeded
    TooManyRedirects,
    /// DNS failure, refused or reset connection
    Connect(String),
    /// Malformed URL, protocol error, anything else
    Other(String),
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeFailure::Timeout => write!(f, "request timed out"),
            ProbeFailure::TooManyRedirects => write!(f, "too many redirects"),
            ProbeFailure::Connect(msg) => write!(f, "connection failed: {}", msg),
            ProbeFailure::Other(msg) => write!(f, "{}", msg),
        }
    }
}

/// Result of a status probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The server answered with this status code
    Status(u16),
    /// No status could be determined
    Failed(ProbeFailure),
}

impl ProbeOutcome {
    /// Status code as reported to the crawler, 500 for failed probes
    pub fn code(&self) -> u16 {
        match self {
            ProbeOutcome::Status(code) => *code,
            ProbeOutcome::Failed(_) => PROBE_FAILURE_STATUS,
        }
    }

    pub fn is_broken(&self) -> bool {
        self.code() >= BROKEN_THRESHOLD
    }
}

/// An HTML document fetched for link extraction
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub content_type: String,
    pub html: String,
}

/// HTTP client shared by every worker
///
/// reqwest's `Client` is reference counted internally, so cloning the
/// prober is cheap and all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .redirect(redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client })
    }

    /// Probes `url` and returns its status or the reason there is none.
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        let status = match self.client.head(url).send().await {
            Ok(response) => response.status(),
            Err(e) => return ProbeOutcome::Failed(categorize_error(&e)),
        };

        if status == StatusCode::FORBIDDEN || status == StatusCode::METHOD_NOT_ALLOWED {
            log::debug!("HEAD {} answered {}, retrying with GET", url, status.as_u16());
            return match self.client.get(url).send().await {
                Ok(response) => ProbeOutcome::Status(response.status().as_u16()),
                Err(e) => ProbeOutcome::Failed(categorize_error(&e)),
            };
        }

        ProbeOutcome::Status(status.as_u16())
    }

    /// Status code for `url`, with network failures reported as 500.
    pub async fn check_status(&self, url: &str) -> u16 {
        let outcome = self.probe(url).await;
        if let ProbeOutcome::Failed(reason) = &outcome {
            log::warn!("Could not check: {} - {}", url, reason);
        }
        outcome.code()
    }

    /// Fetches `url` and returns its body if it is an HTML document.
    pub async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Request)?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html(&content_type) {
            return Err(FetchError::NotHtml {
                content_type: if content_type.is_empty() {
                    "no content type".to_string()
                } else {
                    content_type
                },
            });
        }

        let html = response.text().await.map_err(FetchError::Body)?;

        Ok(FetchedPage {
            url: url.to_string(),
            content_type,
            html,
        })
    }
}

fn is_html(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

// Sorts reqwest errors into the failure kinds we report
fn categorize_error(error: &reqwest::Error) -> ProbeFailure {
    if error.is_timeout() {
        ProbeFailure::Timeout
    } else if error.is_redirect() {
        ProbeFailure::TooManyRedirects
    } else if error.is_connect() {
        ProbeFailure::Connect(error.to_string())
    } else {
        ProbeFailure::Other(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn prober() -> HttpProber {
        let config = CrawlConfig::new().with_timeouts(Duration::from_secs(1));
        HttpProber::new(&config).unwrap()
    }

    #[test]
    fn test_outcome_codes() {
        assert_eq!(ProbeOutcome::Status(200).code(), 200);
        assert!(!ProbeOutcome::Status(399).is_broken());
        assert!(ProbeOutcome::Status(400).is_broken());
        let failed = ProbeOutcome::Failed(ProbeFailure::Timeout);
        assert_eq!(failed.code(), 500);
        assert!(failed.is_broken());
    }

    #[test]
    fn test_is_html() {
        assert!(is_html("text/html"));
        assert!(is_html("text/html; charset=utf-8"));
        assert!(is_html("Text/HTML"));
        assert!(!is_html("image/png"));
        assert!(!is_html(""));
    }

    #[tokio::test]
    async fn test_head_ok() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let outcome = prober().probe(&format!("{}/ok", server.uri())).await;
        assert_eq!(outcome, ProbeOutcome::Status(200));
    }

    #[tokio::test]
    async fn test_head_404_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let status = prober().check_status(&format!("{}/missing", server.uri())).await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn test_forbidden_head_falls_back_to_get() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/guarded"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/guarded"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = prober().probe(&format!("{}/guarded", server.uri())).await;
        assert_eq!(outcome, ProbeOutcome::Status(200));
        assert!(!outcome.is_broken());
    }

    #[tokio::test]
    async fn test_method_not_allowed_uses_get_status() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/no-head"))
            .respond_with(ResponseTemplate::new(405))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/no-head"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&server)
            .await;

        let status = prober().check_status(&format!("{}/no-head", server.uri())).await;
        assert_eq!(status, 410);
    }

    #[tokio::test]
    async fn test_timeout_reports_sentinel() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(4)))
            .mount(&server)
            .await;

        let outcome = prober().probe(&format!("{}/slow", server.uri())).await;
        assert_eq!(outcome, ProbeOutcome::Failed(ProbeFailure::Timeout));
        assert_eq!(outcome.code(), PROBE_FAILURE_STATUS);
    }

    #[tokio::test]
    async fn test_malformed_url_reports_sentinel() {
        let outcome = prober().probe("this is not a url").await;
        assert!(matches!(outcome, ProbeOutcome::Failed(_)));
        assert_eq!(outcome.code(), 500);
    }

    #[tokio::test]
    async fn test_fetch_page_html() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<a href=\"/x\">x</a>", "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let page = prober()
            .fetch_page(&format!("{}/page", server.uri()))
            .await
            .unwrap();
        assert!(page.html.contains("href"));
        assert!(page.content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_fetch_page_rejects_non_html() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
            )
            .mount(&server)
            .await;

        let result = prober()
            .fetch_page(&format!("{}/data.json", server.uri()))
            .await;
        assert!(matches!(result, Err(FetchError::NotHtml { .. })));
    }
}
