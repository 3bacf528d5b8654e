//! Routes a URL to the right parser.

use scraper::Html;
use tracing::debug;

use crate::generic;
use crate::portals::PORTAL_PARSERS;
use crate::record::JobRecord;

/// Parse a job posting document, using the portal parser whose URL
/// pattern matches, or the generic fallback cascade for unknown sites.
pub fn extract(url: &str, doc: &Html) -> JobRecord {
    for parser in PORTAL_PARSERS {
        if parser.matches_url(url) {
            debug!("dispatch: {url} handled by {} parser", parser.name());
            return parser.parse(doc, url);
        }
    }
    debug!("dispatch: {url} handled by generic parser");
    generic::parse(doc, url)
}

/// Name of the portal parser that would handle `url`, if any.
pub fn detect_portal(url: &str) -> Option<&'static str> {
    PORTAL_PARSERS
        .iter()
        .find(|p| p.matches_url(url))
        .map(|p| p.name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Source;

    #[test]
    fn portal_urls_route_to_their_parser() {
        let cases = [
            ("https://de.indeed.com/viewjob?jk=abc", "indeed"),
            (
                "https://www.stepstone.de/stellenangebote--Rust-Engineer--1.html",
                "stepstone",
            ),
            ("https://www.xing.com/jobs/berlin-rust-123", "xing"),
            ("https://acme.softgarden.io/job/456", "softgarden"),
            (
                "https://www.arbeitsagentur.de/jobsuche/jobdetail/789",
                "arbeitsagentur",
            ),
        ];
        for (url, expected) in cases {
            assert_eq!(detect_portal(url), Some(expected), "{url}");
        }
    }

    #[test]
    fn at_most_one_portal_matches() {
        let urls = [
            "https://de.indeed.com/viewjob?jk=abc",
            "https://www.stepstone.de/stellenangebote--Rust--1.html",
            "https://www.xing.com/jobs/rust-123",
            "https://acme.softgarden.io/job/456",
            "https://www.arbeitsagentur.de/jobsuche/jobdetail/789",
            "https://careers.example.com/openings/42",
        ];
        for url in urls {
            let matches = PORTAL_PARSERS
                .iter()
                .filter(|p| p.matches_url(url))
                .count();
            assert!(matches <= 1, "{url} matched {matches} parsers");
        }
    }

    #[test]
    fn unknown_urls_fall_back_to_generic() {
        assert_eq!(detect_portal("https://careers.example.com/openings/42"), None);
        let doc = Html::parse_document("<html><body><h1>Rust Engineer</h1></body></html>");
        let rec = extract("https://careers.example.com/openings/42", &doc);
        assert_eq!(rec.source, Source::Generic);
        assert_eq!(rec.title.as_deref(), Some("Rust Engineer"));
    }

    #[test]
    fn invalid_urls_do_not_panic() {
        let doc = Html::parse_document("<html></html>");
        let rec = extract("not a url", &doc);
        assert_eq!(rec.source, Source::Generic);
    }
}
