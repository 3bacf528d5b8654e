use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use super::{
    GERMAN_CITY, PortalParser, employment_types, find_contact_email, find_labeled_section,
    hostname, posted_date_near_label, title_case, url_path,
};
use crate::dom;
use crate::jsonld;
use crate::record::{JobRecord, Source};

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("selector"));
static COMPANY_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)company|employer|firma").expect("regex"));
static LOCATION_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)location|standort|arbeitsort").expect("regex"));
static META_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)meta|info|detail").expect("regex"));
static DESCRIPTION_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)description|job-content").expect("regex"));
static MAIN_CONTENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)content|body").expect("regex"));
static ARTICLE_OR_MAIN: Lazy<[Selector; 2]> = Lazy::new(|| {
    [
        Selector::parse("article").expect("selector"),
        Selector::parse("main").expect("selector"),
    ]
});
static REQUIREMENTS_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(Anforderungen|Requirements|Ihr Profil|Was Sie mitbringen|Qualifikation)")
        .expect("regex")
});
static EMPLOYMENT_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)meta|info|type|tag|detail").expect("regex"));
static CONTACT_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)contact|ansprechpartner|recruiter").expect("regex"));
const CONTACT_LABEL: &str = r"(?:Ihr Ansprechpartner|Ansprechpartner(?:in)?|Kontakt)";
static SALARY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(\d{1,3}(?:\.\d{3})*(?:,\d{2})?\s*(?:[-–]|bis)\s*\d{1,3}(?:\.\d{3})*(?:,\d{2})?\s*(?:€|EUR|Euro))|((?:ab\s+)?\d{1,3}(?:\.\d{3})*(?:,\d{2})?\s*(?:€|EUR|Euro))",
    )
    .expect("regex")
});

const EMPLOYMENT_KEYWORDS: [(&str, &str); 12] = [
    ("vollzeit", "Vollzeit"),
    ("full time", "Vollzeit"),
    ("teilzeit", "Teilzeit"),
    ("part time", "Teilzeit"),
    ("unbefristet", "Unbefristet"),
    ("befristet", "Befristet"),
    ("festanstellung", "Festanstellung"),
    ("praktikum", "Praktikum"),
    ("working student", "Werkstudent"),
    ("werkstudent", "Werkstudent"),
    ("hybrid", "Hybrid"),
    ("remote", "Remote"),
];

/// Parser for Softgarden-hosted career pages (company.softgarden.io/job/...).
pub struct Softgarden;

impl PortalParser for Softgarden {
    fn source(&self) -> Source {
        Source::Softgarden
    }

    fn matches_url(&self, url: &str) -> bool {
        let Some(host) = hostname(url) else {
            return false;
        };
        if host != "softgarden.io" && !host.ends_with(".softgarden.io") {
            return false;
        }
        url_path(url).unwrap_or_default().contains("/job/")
    }

    fn parse(&self, doc: &Html, url: &str) -> JobRecord {
        let mut rec = JobRecord::new(Source::Softgarden, url);
        if let Some(posting) = jsonld::extract_json_ld(doc) {
            jsonld::fill_record(&posting, &mut rec);
        }
        fill_from_html(doc, url, &mut rec);
        rec
    }
}

/// "crab-systems.softgarden.io" -> "Crab Systems". Used when the page
/// itself never names the employer.
fn company_from_subdomain(url: &str) -> Option<String> {
    let host = hostname(url)?;
    let subdomain = host.strip_suffix(".softgarden.io")?;
    if subdomain.is_empty() {
        return None;
    }
    Some(title_case(&subdomain.replace('-', " ")))
}

fn fill_from_html(doc: &Html, url: &str, rec: &mut JobRecord) {
    if rec.title.is_none()
        && let Some(el) = doc.select(&H1).next()
    {
        rec.fill_title(&dom::element_text(&el));
    }

    if rec.company.is_none() {
        if let Some(el) = dom::find_class_regex(doc, &COMPANY_CLASS) {
            rec.fill_company(&dom::element_text(&el));
        } else if let Some(name) = company_from_subdomain(url) {
            rec.fill_company(&name);
        }
    }

    if rec.location.is_none() {
        let el = dom::find_class_regex(doc, &LOCATION_CLASS)
            .or_else(|| dom::find_attr_eq(doc, "data-testid", "job-location"));
        if let Some(el) = el {
            rec.fill_location(&dom::element_text(&el));
        } else {
            for el in dom::all_class_regex(doc, &META_CLASS) {
                let text = dom::element_text(&el);
                if let Some(m) = GERMAN_CITY.find(&text) {
                    rec.fill_location(m.as_str());
                    break;
                }
            }
        }
    }

    if rec.description.is_none() {
        let el = dom::find_class_regex(doc, &DESCRIPTION_CLASS)
            .or_else(|| dom::first_select(doc, &*ARTICLE_OR_MAIN))
            .or_else(|| dom::find_class_regex(doc, &MAIN_CONTENT));
        if let Some(el) = el {
            rec.fill_description(&dom::block_text(&el));
        }
    }

    if rec.requirements.is_none()
        && let Some(section) = find_labeled_section(doc, &REQUIREMENTS_LABEL)
    {
        rec.fill_requirements(&section);
    }

    if rec.contact_person.is_none() {
        if let Some(el) = dom::find_class_regex(doc, &CONTACT_CLASS) {
            let text = dom::element_text(&el);
            if (3..100).contains(&text.len()) {
                rec.fill_contact_person(&text);
            }
        } else if let Some(value) =
            dom::find_label_value(doc, CONTACT_LABEL, &["div", "p", "span", "section"])
            && (3..100).contains(&value.len())
        {
            rec.fill_contact_person(&value);
        }
    }

    if rec.employment_type.is_none()
        && let Some(types) = employment_types(doc, &EMPLOYMENT_CLASS, &EMPLOYMENT_KEYWORDS)
    {
        rec.fill_employment_type(&types);
    }

    if rec.salary.is_none() {
        let text = dom::page_text(doc);
        if let Some(m) = SALARY.find(&text) {
            rec.fill_salary(m.as_str());
        }
    }

    if rec.posted_date.is_none()
        && let Some(date) = posted_date_near_label(doc)
    {
        rec.fill_posted_date(&date);
    }

    if rec.contact_email.is_none()
        && let Some(email) = find_contact_email(
            doc,
            &[
                "support@softgarden",
                "info@softgarden",
                "datenschutz",
                "privacy",
                "tracking",
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
    fn matches_subdomain_job_pages() {
        let parser = Softgarden;
        assert!(parser.matches_url("https://crab-systems.softgarden.io/job/12345"));
        assert!(parser.matches_url("https://softgarden.io/job/1"));
        assert!(!parser.matches_url("https://crab-systems.softgarden.io/about"));
        assert!(!parser.matches_url("https://softgarden.example.com/job/1"));
    }

    #[test]
    fn company_falls_back_to_subdomain() {
        let html = "<html><body><h1>Rust Engineer</h1></body></html>";
        let doc = Html::parse_document(html);
        let rec = Softgarden.parse(&doc, "https://crab-systems.softgarden.io/job/1");
        assert_eq!(rec.company.as_deref(), Some("Crab Systems"));
    }

    #[test]
    fn named_company_element_wins_over_subdomain() {
        let html = r#"<body><div class="company-name">Crab Systems GmbH</div></body>"#;
        let doc = Html::parse_document(html);
        let rec = Softgarden.parse(&doc, "https://crab-systems.softgarden.io/job/1");
        assert_eq!(rec.company.as_deref(), Some("Crab Systems GmbH"));
    }

    #[test]
    fn salary_range_found_in_page_text() {
        let html = r#"<body><p>Wir bieten 55.000 – 70.000 € im Jahr.</p></body>"#;
        let doc = Html::parse_document(html);
        let rec = Softgarden.parse(&doc, "https://x.softgarden.io/job/1");
        assert_eq!(rec.salary.as_deref(), Some("55.000 – 70.000 €"));
    }

    #[test]
    fn posted_date_is_normalized() {
        let html = r#"<body><span>Online seit: 12.03.2024</span></body>"#;
        let doc = Html::parse_document(html);
        let rec = Softgarden.parse(&doc, "https://x.softgarden.io/job/1");
        assert_eq!(rec.posted_date.as_deref(), Some("2024-03-12"));
    }
}
