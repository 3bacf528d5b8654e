use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use super::{PortalParser, employment_types, find_contact_email, hostname, url_path, url_query};
use crate::dom;
use crate::jsonld;
use crate::record::{JobRecord, Source};

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("selector"));
static HEADER_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"jobsearch-JobInfoHeader").expect("regex"));
static COMPANY_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"companyName").expect("regex"));
static LOCATION_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"companyLocation").expect("regex"));
static DESCRIPTION_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"jobsearch-jobDescriptionText").expect("regex"));
static SALARY_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)salary|gehalt").expect("regex"));
static ATTRIBUTE_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"attribute").expect("regex"));
static SALARY_RANGE_HINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+.*[-–]\s*\d+").expect("regex"));
static SALARY_EURO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d{1,3}(?:\.\d{3})*(?:,\d{2})?\s*[-–]\s*\d{1,3}(?:\.\d{3})*(?:,\d{2})?\s*€)")
        .expect("regex")
});

const EMPLOYMENT_KEYWORDS: [(&str, &str); 14] = [
    ("vollzeit", "Vollzeit"),
    ("full-time", "Vollzeit"),
    ("teilzeit", "Teilzeit"),
    ("part-time", "Teilzeit"),
    ("festanstellung", "Festanstellung"),
    ("permanent", "Festanstellung"),
    ("befristet", "Befristet"),
    ("temporary", "Befristet"),
    ("minijob", "Minijob"),
    ("praktikum", "Praktikum"),
    ("internship", "Praktikum"),
    ("freelance", "Freelance"),
    ("remote", "Remote"),
    ("homeoffice", "Homeoffice"),
];

/// Parser for Indeed (de.indeed.com / indeed.de) job postings.
pub struct Indeed;

impl PortalParser for Indeed {
    fn source(&self) -> Source {
        Source::Indeed
    }

    fn matches_url(&self, url: &str) -> bool {
        let Some(host) = hostname(url) else {
            return false;
        };
        let is_indeed = matches!(host.as_str(), "de.indeed.com" | "indeed.com" | "indeed.de");
        if !is_indeed {
            return false;
        }
        let path = url_path(url).unwrap_or_default();
        let query = url_query(url).unwrap_or_default();
        // /viewjob and jk= identify single postings; /job(s)/ covers the
        // alternative detail URL formats.
        path.contains("/viewjob")
            || path.contains("/job/")
            || path.contains("/jobs/")
            || query.contains("jk=")
    }

    fn parse(&self, doc: &Html, url: &str) -> JobRecord {
        let mut rec = JobRecord::new(Source::Indeed, url);
        if let Some(posting) = jsonld::extract_json_ld(doc) {
            jsonld::fill_record(&posting, &mut rec);
        }
        fill_from_html(doc, &mut rec);
        rec
    }
}

fn fill_from_html(doc: &Html, rec: &mut JobRecord) {
    if rec.title.is_none() {
        let el = dom::find_attr_eq(doc, "data-testid", "jobsearch-JobInfoHeader-title")
            .or_else(|| dom::find_named_class_regex(doc, "h1", &HEADER_CLASS))
            .or_else(|| doc.select(&H1).next());
        if let Some(el) = el {
            rec.fill_title(&dom::element_text(&el));
        }
    }

    if rec.company.is_none() {
        let el = dom::find_attr_eq(doc, "data-testid", "inlineHeader-companyName")
            .or_else(|| dom::find_attr_eq(doc, "data-testid", "company-name"))
            .or_else(|| dom::find_class_regex(doc, &COMPANY_CLASS));
        if let Some(el) = el {
            // The company name is often wrapped in a profile link.
            let text = match dom::descendant_named(el, "a") {
                Some(link) => dom::element_text(&link),
                None => dom::element_text(&el),
            };
            rec.fill_company(&text);
        }
    }

    if rec.location.is_none() {
        let el = dom::find_attr_eq(doc, "data-testid", "inlineHeader-companyLocation")
            .or_else(|| dom::find_attr_eq(doc, "data-testid", "job-location"))
            .or_else(|| dom::find_class_regex(doc, &LOCATION_CLASS));
        if let Some(el) = el {
            rec.fill_location(&dom::element_text(&el));
        }
    }

    if rec.salary.is_none() {
        if let Some(el) = dom::find_attr_eq(doc, "data-testid", "attribute_snippet_testid") {
            let text = dom::element_text(&el);
            if text.contains('€') || text.contains("EUR") || SALARY_RANGE_HINT.is_match(&text) {
                rec.fill_salary(&text);
            }
        }
        if rec.salary.is_none() {
            for el in dom::all_class_regex(doc, &SALARY_CLASS) {
                let text = dom::element_text(&el);
                if let Some(caps) = SALARY_EURO.captures(&text) {
                    rec.fill_salary(&caps[1]);
                    break;
                }
            }
        }
    }

    if rec.employment_type.is_none() {
        if let Some(el) = dom::find_attr_eq(doc, "data-testid", "jobsearch-JobMetadataFooter") {
            let text = dom::element_text(&el).to_lowercase();
            let mut labels: Vec<&str> = Vec::new();
            for (keyword, label) in EMPLOYMENT_KEYWORDS {
                if text.contains(keyword) && !labels.contains(&label) {
                    labels.push(label);
                }
            }
            if !labels.is_empty() {
                rec.fill_employment_type(&labels.join(", "));
            }
        }
        if rec.employment_type.is_none()
            && let Some(types) = employment_types(doc, &ATTRIBUTE_CLASS, &EMPLOYMENT_KEYWORDS)
        {
            rec.fill_employment_type(&types);
        }
    }

    if rec.description.is_none() {
        let el = dom::find_attr_eq(doc, "id", "jobDescriptionText")
            .or_else(|| dom::find_attr_eq(doc, "data-testid", "jobDescriptionText"))
            .or_else(|| dom::find_class_regex(doc, &DESCRIPTION_CLASS));
        if let Some(el) = el {
            rec.fill_description(&dom::block_text(&el));
        }
    }

    if rec.contact_email.is_none()
        && let Some(email) = find_contact_email(doc, &["support@indeed", "info@indeed"])
    {
        rec.fill_contact_email(&email);
    }
}
