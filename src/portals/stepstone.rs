use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use super::{PortalParser, find_contact_email, find_labeled_section, hostname, url_path};
use crate::dom;
use crate::jsonld;
use crate::record::{JobRecord, Source};

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("selector"));
static OG_SITE_NAME: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:site_name"]"#).expect("selector"));
static CONTENT_FALLBACK: Lazy<Vec<Selector>> = Lazy::new(|| {
    vec![
        Selector::parse("article").expect("selector"),
        Selector::parse("main").expect("selector"),
    ]
});
static REQUIREMENTS_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(Anforderungen|Requirements|Profil)").expect("regex"));

/// Parser for StepStone.de job postings.
pub struct StepStone;

impl PortalParser for StepStone {
    fn source(&self) -> Source {
        Source::Stepstone
    }

    fn matches_url(&self, url: &str) -> bool {
        // Job-detail URLs use the /stellenangebote--<slug> path; search
        // pages on the same host do not.
        hostname(url).is_some_and(|h| h == "stepstone.de")
            && url_path(url).is_some_and(|p| p.contains("/stellenangebote--"))
    }

    fn parse(&self, doc: &Html, url: &str) -> JobRecord {
        let mut rec = JobRecord::new(Source::Stepstone, url);
        if let Some(posting) = jsonld::extract_json_ld(doc) {
            jsonld::fill_record(&posting, &mut rec);
        }
        fill_from_html(doc, &mut rec);
        rec
    }
}

fn fill_from_html(doc: &Html, rec: &mut JobRecord) {
    if rec.title.is_none()
        && let Some(h1) = doc.select(&H1).next()
    {
        rec.fill_title(&dom::element_text(&h1));
    }

    if rec.company.is_none() {
        if let Some(el) = dom::find_attr_eq(doc, "data-at", "header-company-name") {
            rec.fill_company(&dom::element_text(&el));
        } else if let Some(meta) = doc.select(&OG_SITE_NAME).next()
            && let Some(content) = meta.value().attr("content")
        {
            rec.fill_company(content);
        }
    }

    if rec.location.is_none()
        && let Some(el) = dom::find_attr_eq(doc, "data-at", "header-job-location")
    {
        rec.fill_location(&dom::element_text(&el));
    }

    if rec.description.is_none() {
        if let Some(el) = dom::find_attr_eq(doc, "data-at", "job-ad-content") {
            rec.fill_description(&dom::block_text(&el));
        } else if let Some(el) = dom::first_select(doc, &CONTENT_FALLBACK) {
            rec.fill_description(&dom::block_text(&el));
        }
    }

    if rec.requirements.is_none()
        && let Some(section) = find_labeled_section(doc, &REQUIREMENTS_LABEL)
    {
        rec.fill_requirements(&section);
    }

    if rec.contact_email.is_none()
        && let Some(email) = find_contact_email(doc, &["support@stepstone"])
    {
        rec.fill_contact_email(&email);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_only_job_detail_urls() {
        let parser = StepStone;
        assert!(parser.matches_url(
            "https://www.stepstone.de/stellenangebote--Backend-Developer-Berlin--123.html"
        ));
        assert!(!parser.matches_url("https://www.stepstone.de/jobs/rust"));
        assert!(!parser.matches_url("https://example.com/stellenangebote--foo"));
    }

    #[test]
    fn prefers_json_ld_over_html() {
        let html = r#"<html><head>
            <script type="application/ld+json">
            {"@type": "JobPosting", "title": "Python Backend Developer",
             "hiringOrganization": {"name": "Tech Startup GmbH"},
             "jobLocation": {"address": {"addressLocality": "Berlin"}}}
            </script></head>
            <body><h1>Wrong HTML Title</h1></body></html>"#;
        let doc = Html::parse_document(html);
        let rec = StepStone.parse(&doc, "https://www.stepstone.de/stellenangebote--x--1.html");
        assert_eq!(rec.source, Source::Stepstone);
        assert_eq!(rec.title.as_deref(), Some("Python Backend Developer"));
        assert_eq!(rec.company.as_deref(), Some("Tech Startup GmbH"));
        assert_eq!(rec.location.as_deref(), Some("Berlin"));
    }

    #[test]
    fn html_fallback_uses_data_at_attributes() {
        let html = r#"<html><body>
            <h1>Senior Rust Engineer (m/w/d)</h1>
            <span data-at="header-company-name">Ferris GmbH</span>
            <span data-at="header-job-location">Hamburg</span>
            <div data-at="job-ad-content">Wir suchen eine erfahrene Entwicklerin.</div>
            </body></html>"#;
        let doc = Html::parse_document(html);
        let rec = StepStone.parse(&doc, "https://www.stepstone.de/stellenangebote--x--1.html");
        assert_eq!(rec.title.as_deref(), Some("Senior Rust Engineer (m/w/d)"));
        assert_eq!(rec.company.as_deref(), Some("Ferris GmbH"));
        assert_eq!(rec.location.as_deref(), Some("Hamburg"));
        assert_eq!(
            rec.description.as_deref(),
            Some("Wir suchen eine erfahrene Entwicklerin.")
        );
    }
}
