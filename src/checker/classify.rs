// src/checker/classify.rs
// =============================================================================
// Decides whether a URL belongs to the site being crawled.
//
// A URL is internal when its host, minus one leading "www." label, matches
// the base domain case-insensitively. The port is not part of the host, so
// http://example.com:8080/ is internal to http://example.com/.
//
// A URL whose host cannot be parsed has an empty domain. An empty domain is
// never internal: such links are status-checked but never crawled.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Where a link points relative to the crawled site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    Internal,
    External,
}

impl LinkKind {
    pub fn is_internal(self) -> bool {
        self == LinkKind::Internal
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkKind::Internal => write!(f, "Internal"),
            LinkKind::External => write!(f, "External"),
        }
    }
}

/// Classifies URLs against a base domain fixed at construction.
#[derive(Debug, Clone)]
pub struct LinkClassifier {
    base_domain: String,
}

impl LinkClassifier {
    /// The base domain is computed once from `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_domain: domain_of(base_url),
        }
    }

    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    pub fn classify(&self, url: &str) -> LinkKind {
        let domain = domain_of(url);
        if !domain.is_empty() && domain.eq_ignore_ascii_case(&self.base_domain) {
            LinkKind::Internal
        } else {
            LinkKind::External
        }
    }
}

/// Host of `url` without a leading "www.", lowercased.
/// Returns an empty string when the URL has no parsable host.
pub fn domain_of(url: &str) -> String {
    let host = match Url::parse(url.trim()) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.to_ascii_lowercase(),
            None => return String::new(),
        },
        Err(_) => return String::new(),
    };

    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_strips_single_www() {
        assert_eq!(domain_of("https://www.example.com/page"), "example.com");
        assert_eq!(domain_of("https://www.www.example.com/"), "www.example.com");
        assert_eq!(domain_of("https://docs.example.com/"), "docs.example.com");
    }

    #[test]
    fn test_domain_of_malformed_is_empty() {
        assert_eq!(domain_of("not a url"), "");
        assert_eq!(domain_of(""), "");
        assert_eq!(domain_of("mailto:someone@example.com"), "");
    }

    #[test]
    fn test_classify_ignores_case_and_www() {
        let classifier = LinkClassifier::new("http://example.com/");
        assert_eq!(classifier.base_domain(), "example.com");
        assert_eq!(classifier.classify("HTTP://WWW.Example.com/x"), LinkKind::Internal);
        assert_eq!(classifier.classify("http://example.com/x"), LinkKind::Internal);
        assert_eq!(
            classifier.classify("HTTP://WWW.Example.com/x"),
            classifier.classify("http://example.com/x")
        );
    }

    #[test]
    fn test_classify_ignores_port() {
        let classifier = LinkClassifier::new("http://127.0.0.1:4000/");
        assert_eq!(classifier.classify("http://127.0.0.1:5000/a"), LinkKind::Internal);
        assert_eq!(classifier.classify("http://localhost:4000/a"), LinkKind::External);
    }

    #[test]
    fn test_subdomain_is_external() {
        let classifier = LinkClassifier::new("https://www.example.com");
        assert_eq!(classifier.classify("https://blog.example.com/"), LinkKind::External);
        assert_eq!(classifier.classify("https://other.test/page"), LinkKind::External);
    }

    #[test]
    fn test_malformed_url_is_external() {
        let classifier = LinkClassifier::new("https://example.com");
        assert_eq!(classifier.classify("::::"), LinkKind::External);
        assert_eq!(classifier.classify("javascript:void(0)"), LinkKind::External);
    }

    #[test]
    fn test_hostless_base_never_matches() {
        let classifier = LinkClassifier::new("not a url");
        assert_eq!(classifier.base_domain(), "");
        assert_eq!(classifier.classify("also not a url"), LinkKind::External);
    }
}
