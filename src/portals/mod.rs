// Portal-specific parsers for known job boards.
//
// Every portal follows the same skeleton: JSON-LD first, then HTML
// selector fallbacks for whatever the structured data left unset. The
// skeleton pieces shared by all portals (employment-type keyword scan,
// contact-email discovery, labeled requirements/date sections) live here;
// the per-portal modules contribute only their URL predicate and their
// selector tables.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::dom;
use crate::record::{JobRecord, Source};
use scraper::Html;

pub mod arbeitsagentur;
pub mod indeed;
pub mod softgarden;
pub mod stepstone;
pub mod xing;

/// A parser for one known job board.
pub trait PortalParser: Send + Sync {
    fn source(&self) -> Source;

    /// Stable name for logs and the `detect` command.
    fn name(&self) -> &'static str {
        self.source().as_str()
    }

    /// Cheap predicate: does this parser claim the URL? Combines a
    /// hostname allowlist with path/query patterns so that search and
    /// listing pages on the same domain are not claimed.
    fn matches_url(&self, url: &str) -> bool;

    /// Parse the posting. Never fails: missing selectors leave fields
    /// unset and extraction proceeds.
    fn parse(&self, doc: &Html, url: &str) -> JobRecord;
}

/// Registered portal parsers in priority order. The dispatcher takes the
/// first match; order matters only when hostnames overlap.
pub static PORTAL_PARSERS: [&dyn PortalParser; 5] = [
    &indeed::Indeed,
    &stepstone::StepStone,
    &xing::Xing,
    &softgarden::Softgarden,
    &arbeitsagentur::Arbeitsagentur,
];

/// Lowercased hostname with a leading "www." stripped.
pub(crate) fn hostname(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    Some(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

pub(crate) fn url_path(url: &str) -> Option<String> {
    Url::parse(url).ok().map(|u| u.path().to_string())
}

pub(crate) fn url_query(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.query().map(str::to_string))
}

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("email regex")
});

/// Email patterns that are never a human contact.
const EMAIL_BLOCKLIST: [&str; 3] = ["noreply", "no-reply", "newsletter"];

/// Scan the full page text for a contact email, skipping the default
/// blocklist plus portal-specific noise addresses.
pub(crate) fn find_contact_email(doc: &Html, extra_blocked: &[&str]) -> Option<String> {
    let text = dom::page_text(doc);
    for m in EMAIL.find_iter(&text) {
        let email = m.as_str();
        let lower = email.to_lowercase();
        let blocked = EMAIL_BLOCKLIST
            .iter()
            .chain(extra_blocked)
            .any(|b| lower.contains(b));
        if !blocked {
            return Some(email.to_string());
        }
    }
    None
}

/// Scan elements whose class matches `class_re` for employment-type
/// keywords. All distinct labels found in the first matching element are
/// comma-joined, in the order of the keyword table.
pub(crate) fn employment_types(
    doc: &Html,
    class_re: &Regex,
    keywords: &[(&str, &str)],
) -> Option<String> {
    for el in dom::all_class_regex(doc, class_re) {
        let text = dom::element_text(&el).to_lowercase();
        let mut labels: Vec<&str> = Vec::new();
        for &(keyword, label) in keywords {
            if text.contains(keyword) && !labels.contains(&label) {
                labels.push(label);
            }
        }
        if !labels.is_empty() {
            return Some(labels.join(", "));
        }
    }
    None
}

/// Requirements sections are announced by a heading like "Anforderungen"
/// or "Ihr Profil". Returns the text of the following sibling block, or of
/// the labeled container itself, when long enough to be a real section.
pub(crate) fn find_labeled_section(doc: &Html, label: &Regex) -> Option<String> {
    let parent = dom::find_label_parent(doc, label, &["div", "section", "li", "h2", "h3"])?;
    let text = match dom::next_sibling_named(parent, &["div", "section", "ul", "p"]) {
        Some(sibling) => dom::block_text(&sibling),
        None => dom::block_text(&parent),
    };
    if text.len() >= 20 { Some(text) } else { None }
}

static DATE_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(Online seit|Eingestellt am|Veröffentlicht|Datum|Posted)").expect("regex")
});
static GERMAN_DATE_ANYWHERE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,2}\.\d{1,2}\.\d{4}").expect("regex"));

/// Posted date from a labeled element ("Online seit: 12.03.2024").
/// Returns the raw `DD.MM.YYYY` match for the record to normalize.
pub(crate) fn posted_date_near_label(doc: &Html) -> Option<String> {
    let parent = dom::find_label_parent(doc, &DATE_LABEL, &["div", "p", "span", "dt", "li"])?;
    let text = dom::element_text(&parent);
    GERMAN_DATE_ANYWHERE
        .find(&text)
        .map(|m| m.as_str().to_string())
}

/// German city names used by portals that render the location as plain
/// text inside a meta/info element.
pub(crate) static GERMAN_CITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(Berlin|Hamburg|München|Köln|Frankfurt|Stuttgart|Düsseldorf|Leipzig|Dresden|Hannover|Bremen|Nürnberg|Essen|Dortmund)\b",
    )
    .expect("city regex")
});

/// "some-company" -> "Some Company".
pub(crate) fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
