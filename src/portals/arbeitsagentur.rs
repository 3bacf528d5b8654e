use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use super::{
    PortalParser, employment_types, find_contact_email, find_labeled_section, hostname, url_path,
};
use crate::dom;
use crate::jsonld;
use crate::record::{JobRecord, Source};

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("selector"));
static H2: Lazy<Selector> = Lazy::new(|| Selector::parse("h2").expect("selector"));
static TITLE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)job-title|jobtitle|stellentitel").expect("regex"));
static COMPANY_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)arbeitgeber|employer|company|firma").expect("regex"));
static COMPANY_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^Arbeitgeber\s*:\s*").expect("regex"));
static LOCATION_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)arbeitsort|location|standort").expect("regex"));
static REFERENCE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)referenz|reference|stellennummer").expect("regex"));
static REFERENCE_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Referenz(?:nummer)?|Stellen(?:nummer)?)[:\s]+([A-Z0-9\-/]+)")
        .expect("regex")
});
static CONTACT_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ansprechpartner|kontakt|contact-person").expect("regex"));
static PHONE_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)telefon|phone").expect("regex"));
static PHONE_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Tel(?:efon)?\.?\s*:?\s*((?:\+49|0)[\s\-/]*(?:\(\d+\)|\d+)[\s\-/]*[\d\s\-/]{6,})")
        .expect("regex")
});
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("regex"));
static DESCRIPTION_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)beschreibung|description|stellenbeschreibung").expect("regex"));
static REQUIREMENTS_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(Anforderungen|Ihr Profil|Qualifikation|Voraussetzung)").expect("regex")
});
static EMPLOYMENT_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)meta|info|type|tag|arbeitszeit|befristung").expect("regex"));

const EMPLOYMENT_KEYWORDS: [(&str, &str); 8] = [
    ("vollzeit", "Vollzeit"),
    ("teilzeit", "Teilzeit"),
    ("unbefristet", "Unbefristet"),
    ("befristet", "Befristet"),
    ("ausbildung", "Ausbildung"),
    ("praktikum", "Praktikum"),
    ("minijob", "Minijob"),
    ("heimarbeit", "Homeoffice"),
];

/// Parser for the Bundesagentur für Arbeit job board
/// (arbeitsagentur.de/jobsuche/...).
pub struct Arbeitsagentur;

impl PortalParser for Arbeitsagentur {
    fn source(&self) -> Source {
        Source::Arbeitsagentur
    }

    fn matches_url(&self, url: &str) -> bool {
        let Some(host) = hostname(url) else {
            return false;
        };
        if host != "arbeitsagentur.de" && !host.ends_with(".arbeitsagentur.de") {
            return false;
        }
        let path = url_path(url).unwrap_or_default();
        path.contains("/jobsuche/")
            || path.contains("/jobboerse/")
            || path.contains("/stellenangebot/")
            || path.contains("stelle")
    }

    fn parse(&self, doc: &Html, url: &str) -> JobRecord {
        let mut rec = JobRecord::new(Source::Arbeitsagentur, url);
        if let Some(posting) = jsonld::extract_json_ld(doc) {
            jsonld::fill_record(&posting, &mut rec);
            if let Some(reference) = posting.reference() {
                rec.fill_reference_number(reference);
            }
        }
        fill_from_html(doc, &mut rec);
        rec
    }
}

fn fill_from_html(doc: &Html, rec: &mut JobRecord) {
    if rec.title.is_none() {
        let el = dom::find_attr_eq(doc, "data-testid", "job-title")
            .or_else(|| dom::find_class_regex(doc, &TITLE_CLASS));
        if let Some(el) = el {
            rec.fill_title(&dom::element_text(&el));
        } else if let Some(h1) = doc.select(&H1).next() {
            let text = dom::element_text(&h1);
            // The detail view renders a generic h1 and puts the job title
            // in the first h2.
            if text.to_lowercase().contains("detailansicht") {
                if let Some(h2) = doc.select(&H2).next() {
                    rec.fill_title(&dom::element_text(&h2));
                }
            } else {
                rec.fill_title(&text);
            }
        }
    }

    if rec.company.is_none() {
        let el = dom::find_attr_eq(doc, "data-testid", "company-name")
            .or_else(|| dom::find_class_regex(doc, &COMPANY_CLASS));
        if let Some(el) = el {
            let text = dom::element_text(&el);
            rec.fill_company(COMPANY_PREFIX.replace(&text, "").trim());
        } else if let Some(value) =
            dom::find_label_value(doc, "Arbeitgeber", &["div", "p", "span", "dt", "li", "h3"])
        {
            rec.fill_company(&value);
        }
    }

    if rec.location.is_none() {
        let el = dom::find_attr_eq(doc, "data-testid", "job-location")
            .or_else(|| dom::find_class_regex(doc, &LOCATION_CLASS));
        if let Some(el) = el {
            rec.fill_location(&dom::element_text(&el));
        } else if let Some(value) =
            dom::find_label_value(doc, "Arbeitsorte?", &["div", "p", "span", "dt", "li"])
        {
            rec.fill_location(&value);
        }
    }

    if rec.reference_number.is_none() {
        if let Some(el) = dom::find_class_regex(doc, &REFERENCE_CLASS) {
            let text = dom::element_text(&el);
            match REFERENCE_TEXT.captures(&text) {
                Some(caps) => rec.fill_reference_number(&caps[1]),
                None => rec.fill_reference_number(&text),
            };
        } else if let Some(value) = dom::find_label_value(
            doc,
            r"(?:Referenz|Stellen)nummer",
            &["div", "p", "span", "dt", "li"],
        ) {
            rec.fill_reference_number(&value);
        } else if let Some(caps) = REFERENCE_TEXT.captures(&dom::page_text(doc)) {
            rec.fill_reference_number(&caps[1]);
        }
    }

    if rec.contact_person.is_none() {
        if let Some(el) = dom::find_class_regex(doc, &CONTACT_CLASS) {
            rec.fill_contact_person(&dom::element_text(&el));
        } else if let Some(value) = dom::find_label_value(
            doc,
            r"(?:Ihr )?Ansprechpartner(?:in)?",
            &["div", "p", "span", "dt", "li"],
        ) {
            rec.fill_contact_person(&value);
        }
    }

    if rec.contact_phone.is_none() {
        if let Some(el) = dom::find_class_regex(doc, &PHONE_CLASS) {
            rec.fill_contact_phone(&dom::element_text(&el));
        } else if let Some(value) =
            dom::find_label_value(doc, "Telefon", &["div", "p", "span", "dt", "li"])
        {
            rec.fill_contact_phone(&value);
        } else if let Some(caps) = PHONE_TEXT.captures(&dom::page_text(doc)) {
            let number = WHITESPACE.replace_all(caps[1].trim(), " ").to_string();
            if number.len() >= 8 {
                rec.fill_contact_phone(&number);
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

    if rec.employment_type.is_none()
        && let Some(types) = employment_types(doc, &EMPLOYMENT_CLASS, &EMPLOYMENT_KEYWORDS)
    {
        rec.fill_employment_type(&types);
    }

    if rec.contact_email.is_none()
        && let Some(email) =
            find_contact_email(doc, &["@arbeitsagentur.de", "support@", "info@arbeitsagentur"])
    {
        rec.fill_contact_email(&email);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_job_board_urls() {
        let parser = Arbeitsagentur;
        assert!(parser.matches_url("https://www.arbeitsagentur.de/jobsuche/jobdetail/123"));
        assert!(parser.matches_url("https://con.arbeitsagentur.de/prod/jobboerse/jobsuche-ui/"));
        assert!(!parser.matches_url("https://www.arbeitsagentur.de/karriere"));
        assert!(!parser.matches_url("https://example.de/jobsuche/123"));
    }

    #[test]
    fn detail_view_title_comes_from_h2() {
        let html = r#"<body>
            <h1>Detailansicht Stellenangebot</h1>
            <h2>Fachinformatiker/in - Anwendungsentwicklung</h2>
            </body>"#;
        let doc = Html::parse_document(html);
        let rec = Arbeitsagentur.parse(&doc, "https://www.arbeitsagentur.de/jobsuche/jobdetail/1");
        assert_eq!(
            rec.title.as_deref(),
            Some("Fachinformatiker/in - Anwendungsentwicklung")
        );
    }

    #[test]
    fn labeled_fields_are_extracted() {
        let html = r#"<body>
            <h1>Softwareentwickler/in</h1>
            <p>Arbeitgeber: Crab Systems GmbH</p>
            <p>Arbeitsort: Nürnberg</p>
            <p>Referenznummer: 10000-1199571095-S</p>
            </body>"#;
        let doc = Html::parse_document(html);
        let rec = Arbeitsagentur.parse(&doc, "https://www.arbeitsagentur.de/jobsuche/jobdetail/1");
        assert_eq!(rec.company.as_deref(), Some("Crab Systems GmbH"));
        assert_eq!(rec.location.as_deref(), Some("Nürnberg"));
        assert_eq!(rec.reference_number.as_deref(), Some("10000-1199571095-S"));
    }

    #[test]
    fn location_testid_wins_over_class_probe() {
        let html = r#"<body>
            <h1>Softwareentwickler/in</h1>
            <span class="job-location-hint">Deutschlandweit</span>
            <span data-testid="job-location">Nürnberg</span>
            </body>"#;
        let doc = Html::parse_document(html);
        let rec = Arbeitsagentur.parse(&doc, "https://www.arbeitsagentur.de/jobsuche/jobdetail/1");
        assert_eq!(rec.location.as_deref(), Some("Nürnberg"));
    }

    #[test]
    fn phone_number_from_page_text() {
        let html = r#"<body><p>Fragen beantwortet Ihnen Frau Kern, Tel.: 0911 529-3010</p></body>"#;
        let doc = Html::parse_document(html);
        let rec = Arbeitsagentur.parse(&doc, "https://www.arbeitsagentur.de/jobsuche/jobdetail/1");
        assert_eq!(rec.contact_phone.as_deref(), Some("0911 529-3010"));
    }
}
