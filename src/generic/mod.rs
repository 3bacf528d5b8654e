//! Fallback parser for job postings from unknown sources.
//!
//! Runs extraction strategies in priority order and keeps whatever each
//! one finds, so partially filled records are the norm rather than an
//! error.

mod extractors;

use scraper::Html;
use tracing::{debug, info, warn};

use crate::jsonld;
use crate::record::{JobRecord, Source};

/// Parse a job posting with the fallback strategy cascade.
///
/// Strategies, in priority order: JSON-LD JobPosting, OpenGraph meta
/// tags, standard meta tags, title-tag splitting, common HTML patterns,
/// and last-resort heuristics. Earlier strategies win because fields are
/// never overwritten once set.
pub fn parse(doc: &Html, url: &str) -> JobRecord {
    let mut rec = JobRecord::new(Source::Generic, url);

    if let Some(posting) = jsonld::extract_json_ld(doc) {
        jsonld::fill_record(&posting, &mut rec);
        if rec.title.is_some() || rec.company.is_some() || rec.description.is_some() {
            rec.extraction_methods.push("json-ld");
            debug!("generic parser: extracted data via JSON-LD");
        }
    }

    if extractors::opengraph(doc, &mut rec) {
        rec.extraction_methods.push("opengraph");
        debug!("generic parser: extracted data via OpenGraph");
    }

    if extractors::meta_tags(doc, &mut rec) {
        rec.extraction_methods.push("meta-tags");
        debug!("generic parser: extracted data via meta tags");
    }

    if extractors::title_tag(doc, &mut rec) {
        rec.extraction_methods.push("title-tag");
        debug!("generic parser: extracted data via title tag");
    }

    if extractors::html_patterns(doc, &mut rec) {
        rec.extraction_methods.push("html-patterns");
        debug!("generic parser: extracted data via HTML patterns");
    }

    if extractors::heuristics(doc, url, &mut rec) {
        rec.extraction_methods.push("heuristics");
        debug!("generic parser: applied heuristic extraction");
    }

    if extractors::is_search_results_page(doc, url) {
        rec.is_search_results_page = true;
        warn!("generic parser: {url} looks like a search results page, not a single posting");
    }

    if rec.extraction_methods.is_empty() {
        warn!("generic parser: no structured data found for {url}");
    } else {
        info!(
            "generic parser: extracted data for {url} using methods: {}",
            rec.extraction_methods.join(", ")
        );
    }
    // The method list is diagnostic only; it never leaves this function.
    rec.extraction_methods.clear();

    rec
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_ld_wins_over_meta_tags() {
        let html = r#"<html><head>
            <meta property="og:title" content="Other Title">
            <script type="application/ld+json">
            {"@type": "JobPosting", "title": "Rust Engineer",
             "hiringOrganization": {"@type": "Organization", "name": "Crab Systems"}}
            </script>
            </head><body></body></html>"#;
        let doc = Html::parse_document(html);
        let rec = parse(&doc, "https://jobs.example.de/123");
        assert_eq!(rec.title.as_deref(), Some("Rust Engineer"));
        assert_eq!(rec.company.as_deref(), Some("Crab Systems"));
        assert!(rec.extraction_methods.is_empty());
    }

    #[test]
    fn cascade_fills_gaps_from_later_strategies() {
        let html = r#"<html><head>
            <meta property="og:title" content="Rust Engineer">
            <meta name="author" content="Crab Systems">
            </head><body>
            <div class="job-location">Berlin</div>
            </body></html>"#;
        let doc = Html::parse_document(html);
        let rec = parse(&doc, "https://crab-systems.de/jobs/1");
        assert_eq!(rec.title.as_deref(), Some("Rust Engineer"));
        assert_eq!(rec.company.as_deref(), Some("Crab Systems"));
        assert_eq!(rec.location.as_deref(), Some("Berlin"));
    }

    #[test]
    fn empty_document_yields_empty_record() {
        let doc = Html::parse_document("<html><body></body></html>");
        let rec = parse(&doc, "https://jobs.example.de/123");
        assert!(rec.title.is_none());
        assert!(rec.company.is_none());
        assert!(rec.description.is_none());
        assert!(!rec.is_search_results_page);
    }

    #[test]
    fn search_results_page_is_flagged() {
        let html = r#"<html><body>
            <p>1234 Jobs gefunden</p>
            <div class="job-card">A</div><div class="job-card">B</div>
            <div class="job-card">C</div><div class="job-card">D</div>
            </body></html>"#;
        let doc = Html::parse_document(html);
        let rec = parse(&doc, "https://jobs.example.de/search?q=rust");
        assert!(rec.is_search_results_page);
    }

    #[test]
    fn single_posting_is_not_flagged() {
        let html = r#"<html><body><h1>Rust Engineer</h1>
            <div class="job-card">related</div></body></html>"#;
        let doc = Html::parse_document(html);
        let rec = parse(&doc, "https://crab-systems.de/jobs/1");
        assert!(!rec.is_search_results_page);
    }
}
