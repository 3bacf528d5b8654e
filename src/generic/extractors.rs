//! Extraction strategies for the fallback parser.
//!
//! Every function fills whatever gaps it can in the record and reports
//! whether it contributed anything.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};

use crate::dom;
use crate::record::JobRecord;

fn meta_content<'a>(doc: &'a Html, selector: &Selector) -> Option<&'a str> {
    doc.select(selector).next()?.value().attr("content")
}

static OG_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:title"]"#).expect("selector"));
static OG_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:description"]"#).expect("selector"));
static OG_SITE_NAME: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:site_name"]"#).expect("selector"));

/// OpenGraph meta tags: og:title, og:description, og:site_name.
pub(super) fn opengraph(doc: &Html, rec: &mut JobRecord) -> bool {
    let mut extracted = false;
    if rec.title.is_none()
        && let Some(content) = meta_content(doc, &OG_TITLE)
    {
        extracted |= rec.fill_title(content);
    }
    if rec.description.is_none()
        && let Some(content) = meta_content(doc, &OG_DESCRIPTION)
    {
        extracted |= rec.fill_description(content);
    }
    if rec.company.is_none()
        && let Some(content) = meta_content(doc, &OG_SITE_NAME)
    {
        extracted |= rec.fill_company(content);
    }
    extracted
}

static META_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="title"]"#).expect("selector"));
static META_DESCRIPTION: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="description"]"#).expect("selector"));
static META_AUTHOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="author"]"#).expect("selector"));

/// Standard meta tags: title, description, author (as company).
pub(super) fn meta_tags(doc: &Html, rec: &mut JobRecord) -> bool {
    let mut extracted = false;
    if rec.title.is_none()
        && let Some(content) = meta_content(doc, &META_TITLE)
    {
        extracted |= rec.fill_title(content);
    }
    if rec.description.is_none()
        && let Some(content) = meta_content(doc, &META_DESCRIPTION)
    {
        extracted |= rec.fill_description(content);
    }
    if rec.company.is_none()
        && let Some(content) = meta_content(doc, &META_AUTHOR)
    {
        extracted |= rec.fill_company(content);
    }
    extracted
}

static TITLE_TAG: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("selector"));
static COMPANY_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*[-–|]\s*(Jobs?|Karriere|Career|Stellenangebote?).*$").expect("regex")
});
static AT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(.+?)\s+(?:at|bei|@)\s+(.+?)(?:\s*[-|–].*)?$").expect("regex")
});
static TITLE_CLEANUP: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\s*\|\s*aktuell\s+\d+\s+offen",
        r"(?i)\s*\|\s*karriere\.at",
        r"(?i)\s*\|\s*stepstone\.at",
        r"(?i)\s*\|\s*stepstone\.de",
        r"(?i)\s+Jobs?\s+in\s+[\wäöüÄÖÜß]+(\s|$)",
        r"(?i)\s*[-–|]\s*(Jobs?|Karriere|Career|Stellenangebote?|Apply|Bewerben).*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("regex"))
    .collect()
});

const TITLE_SEPARATORS: [&str; 5] = [" - ", " | ", " – ", " — ", " · "];

/// Split the `<title>` tag into job title and company.
///
/// Handles "Title - Company", "Title | Company" and "Title at/bei
/// Company"; as a last resort the whole tag becomes the title after
/// portal boilerplate is stripped.
pub(super) fn title_tag(doc: &Html, rec: &mut JobRecord) -> bool {
    if rec.title.is_some() && rec.company.is_some() {
        return false;
    }
    let Some(el) = doc.select(&TITLE_TAG).next() else {
        return false;
    };
    let text = dom::element_text(&el);
    if text.is_empty() {
        return false;
    }

    let mut extracted = false;

    for sep in TITLE_SEPARATORS {
        if !text.contains(sep) {
            continue;
        }
        let parts: Vec<&str> = text.split(sep).collect();
        if parts.len() >= 2 {
            if rec.title.is_none() {
                extracted |= rec.fill_title(parts[0]);
            }
            if rec.company.is_none() {
                let part = if parts.len() > 2 {
                    parts[parts.len() - 1]
                } else {
                    parts[1]
                };
                let company = COMPANY_SUFFIX.replace(part, "");
                if !company.is_empty() {
                    extracted |= rec.fill_company(&company);
                }
            }
        }
        break;
    }

    if (rec.title.is_none() || rec.company.is_none())
        && let Some(caps) = AT_PATTERN.captures(&text)
    {
        if rec.title.is_none() {
            extracted |= rec.fill_title(&caps[1]);
        }
        if rec.company.is_none() {
            extracted |= rec.fill_company(&caps[2]);
        }
    }

    if rec.title.is_none() {
        let mut cleaned = text.clone();
        for pattern in TITLE_CLEANUP.iter() {
            cleaned = pattern.replace_all(&cleaned, "").into_owned();
        }
        extracted |= rec.fill_title(&cleaned);
    }

    extracted
}

static TESTID_TITLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)job[-_]?title").expect("regex"));
static CLASS_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)job[-_]?title|position[-_]?title|posting[-_]?title").expect("regex")
});
static TESTID_COMPANY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)company[-_]?name|employer").expect("regex"));
static CLASS_COMPANY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)company[-_]?name|employer[-_]?name|hiring[-_]?company").expect("regex")
});
static QA_COMPANY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)company").expect("regex"));
static TESTID_LOCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)job[-_]?location|location").expect("regex"));
static CLASS_LOCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)job[-_]?location|location|arbeitsort|standort").expect("regex"));
static TESTID_DESCRIPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)job[-_]?description|description").expect("regex"));
static CLASS_DESCRIPTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)job[-_]?description|description[-_]?content|posting[-_]?description")
        .expect("regex")
});
static ID_DESCRIPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)job[-_]?description").expect("regex"));
static ARTICLE_MAIN: Lazy<[Selector; 2]> = Lazy::new(|| {
    [
        Selector::parse("article").expect("selector"),
        Selector::parse("main").expect("selector"),
    ]
});
static EMPLOYMENT_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)type|tag|badge|chip|label|employment").expect("regex"));
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("regex")
});

const EMPLOYMENT_KEYWORDS: [(&str, &str); 18] = [
    ("vollzeit", "Vollzeit"),
    ("full-time", "Full-time"),
    ("full time", "Full-time"),
    ("teilzeit", "Teilzeit"),
    ("part-time", "Part-time"),
    ("part time", "Part-time"),
    ("festanstellung", "Festanstellung"),
    ("permanent", "Permanent"),
    ("befristet", "Befristet"),
    ("temporary", "Temporary"),
    ("remote", "Remote"),
    ("homeoffice", "Homeoffice"),
    ("hybrid", "Hybrid"),
    ("freelance", "Freelance"),
    ("praktikum", "Praktikum"),
    ("internship", "Internship"),
    ("werkstudent", "Werkstudent"),
    ("minijob", "Minijob"),
];

/// Emails that are boilerplate rather than a recruiting contact. Unknown
/// sites get a stricter list than the known portals.
const EMAIL_BLOCKLIST: [&str; 11] = [
    "noreply",
    "no-reply",
    "newsletter",
    "support@",
    "info@",
    "privacy",
    "datenschutz",
    "tracking",
    "analytics",
    "example.com",
    "test.com",
];

/// Common HTML patterns: data-testid and class-name conventions shared by
/// many career sites, plus schema.org microdata attributes.
pub(super) fn html_patterns(doc: &Html, rec: &mut JobRecord) -> bool {
    let mut extracted = false;

    if rec.title.is_none() {
        let el = dom::find_attr_regex(doc, "data-testid", &TESTID_TITLE)
            .or_else(|| dom::find_class_regex(doc, &CLASS_TITLE))
            .or_else(|| dom::find_attr_eq(doc, "itemprop", "title"))
            .or_else(|| dom::find_attr_regex(doc, "data-qa", &TESTID_TITLE));
        if let Some(el) = el {
            extracted |= rec.fill_title(&dom::element_text(&el));
        }
    }

    if rec.company.is_none() {
        let el = dom::find_attr_regex(doc, "data-testid", &TESTID_COMPANY)
            .or_else(|| dom::find_class_regex(doc, &CLASS_COMPANY))
            .or_else(|| dom::find_attr_eq(doc, "itemprop", "hiringOrganization"))
            .or_else(|| dom::find_attr_present(doc, "data-company"))
            .or_else(|| dom::find_attr_regex(doc, "data-qa", &QA_COMPANY));
        if let Some(el) = el {
            // Microdata containers carry the name in a nested itemprop.
            let text = match dom::descendant_attr_eq(el, "itemprop", "name") {
                Some(name_el) => dom::element_text(&name_el),
                None => dom::element_text(&el),
            };
            extracted |= rec.fill_company(&text);
        }
    }

    if rec.location.is_none() {
        let el = dom::find_attr_regex(doc, "data-testid", &TESTID_LOCATION)
            .or_else(|| dom::find_class_regex(doc, &CLASS_LOCATION))
            .or_else(|| dom::find_attr_eq(doc, "itemprop", "jobLocation"))
            .or_else(|| dom::find_attr_present(doc, "data-location"));
        if let Some(el) = el {
            let text = match dom::descendant_attr_eq(el, "itemprop", "address") {
                Some(addr_el) => dom::element_text(&addr_el),
                None => dom::element_text(&el),
            };
            extracted |= rec.fill_location(&text);
        }
    }

    if rec.description.is_none() {
        let el = dom::find_attr_regex(doc, "data-testid", &TESTID_DESCRIPTION)
            .or_else(|| dom::find_class_regex(doc, &CLASS_DESCRIPTION))
            .or_else(|| dom::find_attr_eq(doc, "itemprop", "description"))
            .or_else(|| dom::find_attr_regex(doc, "id", &ID_DESCRIPTION));
        if let Some(el) = el {
            extracted |= rec.fill_description(&dom::block_text(&el));
        } else if let Some(el) = dom::first_select(doc, &*ARTICLE_MAIN) {
            let text = dom::block_text(&el);
            if text.len() > 200 {
                extracted |= rec.fill_description(&text);
            }
        }
    }

    if rec.employment_type.is_none() {
        'outer: for el in dom::all_class_regex(doc, &EMPLOYMENT_CLASS) {
            let text = dom::element_text(&el).to_lowercase();
            for (keyword, label) in EMPLOYMENT_KEYWORDS {
                if text.contains(keyword) {
                    extracted |= rec.fill_employment_type(label);
                    break 'outer;
                }
            }
        }
    }

    if rec.contact_email.is_none() {
        let text = dom::page_text(doc);
        for m in EMAIL.find_iter(&text) {
            let lower = m.as_str().to_lowercase();
            if !EMAIL_BLOCKLIST.iter().any(|b| lower.contains(b)) {
                extracted |= rec.fill_contact_email(m.as_str());
                break;
            }
        }
    }

    extracted
}

static H1: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("selector"));
static SALARY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\d{1,3}(?:[.,]\d{3})*\s*[-–bis]+\s*\d{1,3}(?:[.,]\d{3})*\s*(?:€|EUR|Euro)",
        r"(?i)(?:ab|from|starting)\s+\d{1,3}(?:[.,]\d{3})*\s*(?:€|EUR|Euro)",
        r"(?i)\d{1,3}\s*[-–]\s*\d{1,3}\s*(?:€|EUR)/\s*(?:h|Stunde|hour)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("regex"))
    .collect()
});

/// Headings that are navigation, not a job title.
const GENERIC_HEADINGS: [&str; 5] = ["jobs", "karriere", "career", "stellenangebote", "home"];

/// Domains whose name is a job board, not an employer.
const JOB_BOARD_DOMAINS: [&str; 19] = [
    "indeed",
    "stepstone",
    "xing",
    "linkedin",
    "glassdoor",
    "monster",
    "lever",
    "greenhouse",
    "workday",
    "smartrecruiters",
    "softgarden",
    "arbeitsagentur",
    "jobs",
    "careers",
    "karriere",
    "jobware",
    "stellenanzeigen",
    "hokify",
    "willhaben",
];

/// Last-resort heuristics: first h1 as the title, the domain name as the
/// company, and a page-wide salary scan.
pub(super) fn heuristics(doc: &Html, url: &str, rec: &mut JobRecord) -> bool {
    let mut used = false;

    if rec.title.is_none()
        && let Some(h1) = doc.select(&H1).next()
    {
        let text = dom::element_text(&h1);
        if text.len() > 3 && !GENERIC_HEADINGS.contains(&text.to_lowercase().as_str()) {
            used |= rec.fill_title(&text);
        }
    }

    if rec.company.is_none()
        && let Some(host) = crate::portals::hostname(url)
    {
        let parts: Vec<&str> = host.split('.').collect();
        if parts.len() >= 2 && !JOB_BOARD_DOMAINS.contains(&parts[0]) {
            let name =
                crate::portals::title_case(&parts[0].replace(['-', '_'], " "));
            used |= rec.fill_company(&name);
        }
    }

    if rec.salary.is_none() {
        let text = dom::page_text(doc);
        for pattern in SALARY_PATTERNS.iter() {
            if let Some(m) = pattern.find(&text) {
                used |= rec.fill_salary(m.as_str());
                break;
            }
        }
    }

    used
}

static JOB_CARDS: Lazy<Vec<Selector>> = Lazy::new(|| {
    [
        "[data-job-id]",
        ".job-card",
        ".job-listing",
        ".job-item",
        "[data-testid*='job-card']",
        ".search-result",
        ".stellenangebot",
    ]
    .iter()
    .map(|s| Selector::parse(s).expect("selector"))
    .collect()
});
static SEARCH_TEXT: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)aktuell\s+\d+\s+offen",
        r"(?i)\d+\s+jobs?\s+gefunden",
        r"(?i)\d+\s+ergebnisse",
        r"(?i)showing\s+\d+\s+of\s+\d+",
        r"(?i)\d+\s+results?\s+found",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("regex"))
    .collect()
});

const URL_SEARCH_MARKERS: [&str; 6] = ["/search", "/jobs?", "/suche", "?q=", "&q=", "/results"];

/// Detect a search results page rather than a single posting. Three
/// independent signals are checked; two must agree.
pub(super) fn is_search_results_page(doc: &Html, url: &str) -> bool {
    let mut indicators = 0;

    let url_lower = url.to_lowercase();
    if URL_SEARCH_MARKERS.iter().any(|m| url_lower.contains(m)) {
        indicators += 1;
    }

    if JOB_CARDS
        .iter()
        .any(|sel| doc.select(sel).count() > 3)
    {
        indicators += 1;
    }

    let text = dom::page_text(doc);
    if SEARCH_TEXT.iter().any(|re| re.is_match(&text)) {
        indicators += 1;
    }

    indicators >= 2
}
