use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use super::{
    GERMAN_CITY, PortalParser, employment_types, find_contact_email, find_labeled_section,
    hostname, url_path,
};
use crate::dom;
use crate::jsonld;
use crate::record::{JobRecord, Source};

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("selector"));
static COMPANY_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"/companies/").expect("regex"));
static PROFILE_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"/profile/").expect("regex"));
static COMPANY_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)company|employer").expect("regex"));
static LOCATION_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)location|city").expect("regex"));
static META_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)meta|info").expect("regex"));
static CONTACT_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)contact|recruiter|ansprechpartner").expect("regex"));
static CONTACT_PREFIX: Lazy<Regex> =
    Lazy::new(|| {
        Regex::new(r"(?i)^(Recruiter(in)?|Ansprechpartner(in)?|Contact|Kontakt)[:\s]*")
            .expect("regex")
    });
static DESCRIPTION_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)description|job-details").expect("regex"));
static REQUIREMENTS_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(Anforderungen|Requirements|Profil|Qualifikation)").expect("regex")
});
static EMPLOYMENT_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)meta|info|type|tag").expect("regex"));

const EMPLOYMENT_KEYWORDS: [(&str, &str); 10] = [
    ("vollzeit", "Vollzeit"),
    ("full-time", "Vollzeit"),
    ("teilzeit", "Teilzeit"),
    ("part-time", "Teilzeit"),
    ("festanstellung", "Festanstellung"),
    ("befristet", "Befristet"),
    ("praktikum", "Praktikum"),
    ("werkstudent", "Werkstudent"),
    ("remote", "Remote"),
    ("homeoffice", "Homeoffice"),
];

/// Parser for XING job postings (xing.com/jobs/...).
pub struct Xing;

impl PortalParser for Xing {
    fn source(&self) -> Source {
        Source::Xing
    }

    fn matches_url(&self, url: &str) -> bool {
        let Some(host) = hostname(url) else {
            return false;
        };
        if host != "xing.com" && !host.ends_with(".xing.com") {
            return false;
        }
        url_path(url).unwrap_or_default().contains("/jobs/")
    }

    fn parse(&self, doc: &Html, url: &str) -> JobRecord {
        let mut rec = JobRecord::new(Source::Xing, url);
        if let Some(posting) = jsonld::extract_json_ld(doc) {
            jsonld::fill_record(&posting, &mut rec);
            if let Some(profile) = posting.company_profile() {
                rec.fill_company_profile_url(profile);
            }
        }
        fill_from_html(doc, &mut rec);
        rec
    }
}

fn fill_from_html(doc: &Html, rec: &mut JobRecord) {
    if rec.title.is_none()
        && let Some(el) = doc.select(&H1).next()
    {
        rec.fill_title(&dom::element_text(&el));
    }

    if rec.company.is_none() {
        let el = dom::find_link_href(doc, &COMPANY_LINK)
            .or_else(|| dom::find_class_regex(doc, &COMPANY_CLASS));
        if let Some(el) = el {
            rec.fill_company(&dom::element_text(&el));
        }
    }

    // The company profile link is relative on XING's own pages.
    if rec.company_profile_url.is_none()
        && let Some(link) = dom::find_link_href(doc, &COMPANY_LINK)
        && let Some(href) = link.value().attr("href")
    {
        let absolute = if href.starts_with("http") {
            href.to_string()
        } else {
            format!("https://www.xing.com{href}")
        };
        rec.fill_company_profile_url(&absolute);
    }

    if rec.location.is_none() {
        if let Some(el) = dom::find_class_regex(doc, &LOCATION_CLASS) {
            rec.fill_location(&dom::element_text(&el));
        } else {
            // Some layouts only mention the city inside a meta line.
            for el in dom::all_class_regex(doc, &META_CLASS) {
                let text = dom::element_text(&el);
                if let Some(m) = GERMAN_CITY.find(&text) {
                    rec.fill_location(m.as_str());
                    break;
                }
            }
        }
    }

    if rec.description.is_none()
        && let Some(el) = dom::find_class_regex(doc, &DESCRIPTION_CLASS)
    {
        rec.fill_description(&dom::block_text(&el));
    }

    if rec.requirements.is_none()
        && let Some(section) = find_labeled_section(doc, &REQUIREMENTS_LABEL)
    {
        rec.fill_requirements(&section);
    }

    if rec.contact_person.is_none() {
        let el = dom::find_class_regex(doc, &CONTACT_CLASS)
            .or_else(|| dom::find_link_href(doc, &PROFILE_LINK));
        if let Some(el) = el {
            let text = dom::element_text(&el);
            let name = CONTACT_PREFIX.replace(&text, "");
            let name = name.trim();
            if name.len() > 2 {
                rec.fill_contact_person(name);
            }
        }
    }

    if rec.employment_type.is_none()
        && let Some(types) = employment_types(doc, &EMPLOYMENT_CLASS, &EMPLOYMENT_KEYWORDS)
    {
        rec.fill_employment_type(&types);
    }

    if rec.contact_email.is_none()
        && let Some(email) = find_contact_email(
            doc,
            &[
                "support@xing",
                "info@xing",
                "kundenservice@xing",
                "werbung@xing",
            ],
        )
    {
        rec.fill_contact_email(&email);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_only_job_paths() {
        let parser = Xing;
        assert!(parser.matches_url("https://www.xing.com/jobs/berlin-rust-developer-12345"));
        assert!(parser.matches_url("https://xing.com/jobs/abc"));
        assert!(!parser.matches_url("https://www.xing.com/companies/crabsystems"));
        assert!(!parser.matches_url("https://notxing.com/jobs/abc"));
    }

    #[test]
    fn company_profile_link_is_absolutized() {
        let html = r#"<html><body>
            <h1>Rust Engineer</h1>
            <a href="/companies/crab-systems">Crab Systems GmbH</a>
            </body></html>"#;
        let doc = Html::parse_document(html);
        let rec = Xing.parse(&doc, "https://www.xing.com/jobs/1");
        assert_eq!(rec.company.as_deref(), Some("Crab Systems GmbH"));
        assert_eq!(
            rec.company_profile_url.as_deref(),
            Some("https://www.xing.com/companies/crab-systems")
        );
    }

    #[test]
    fn contact_person_strips_role_prefix() {
        let html = r#"<body>
            <div class="job-contact">Ansprechpartnerin: Maria Schmidt</div>
            </body>"#;
        let doc = Html::parse_document(html);
        let rec = Xing.parse(&doc, "https://www.xing.com/jobs/1");
        assert_eq!(rec.contact_person.as_deref(), Some("Maria Schmidt"));
    }

    #[test]
    fn city_found_in_meta_line() {
        let html = r#"<body>
            <span class="job-meta">Vollzeit, Hamburg, ab sofort</span>
            </body>"#;
        let doc = Html::parse_document(html);
        let rec = Xing.parse(&doc, "https://www.xing.com/jobs/1");
        assert_eq!(rec.location.as_deref(), Some("Hamburg"));
        assert_eq!(rec.employment_type.as_deref(), Some("Vollzeit"));
    }
}
