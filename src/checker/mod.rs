// src/checker/mod.rs
// =============================================================================
// Link-level logic: deciding where a link points, probing its status, and
// pulling links out of HTML pages.
//
// Submodules:
// - classify: internal vs external links
// - http: status probes and page fetches
// - html: anchor and image extraction
// =============================================================================

mod classify;
mod html;
mod http;

pub use classify::{domain_of, LinkClassifier, LinkKind};
pub use html::{extract_page_links, PageLinks};
pub use http::{
    FetchedPage, HttpProber, ProbeFailure, ProbeOutcome, BROKEN_THRESHOLD, PROBE_FAILURE_STATUS,
};
