use serde::Serialize;

use crate::normalize::{clean_text, parse_date};

/// Which parser produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Indeed,
    Stepstone,
    Xing,
    Softgarden,
    Arbeitsagentur,
    Generic,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Indeed => "indeed",
            Source::Stepstone => "stepstone",
            Source::Xing => "xing",
            Source::Softgarden => "softgarden",
            Source::Arbeitsagentur => "arbeitsagentur",
            Source::Generic => "generic",
        }
    }
}

/// Canonical output of the extraction pipeline.
///
/// Every field except `source` and `url` is optional; absence is an
/// expected state, not an error. Fields are populated by successive
/// extraction strategies through the `fill_*` setters, which enforce the
/// two record invariants in one place: a strategy never overwrites a field
/// an earlier strategy filled, and text never lands in the record without
/// passing the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    pub source: Source,
    pub url: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub contact_email: Option<String>,
    pub contact_person: Option<String>,
    pub contact_phone: Option<String>,
    pub posted_date: Option<String>,
    pub application_deadline: Option<String>,
    pub employment_type: Option<String>,
    pub salary: Option<String>,
    pub reference_number: Option<String>,
    pub company_profile_url: Option<String>,
    /// Strategy names that contributed at least one field. Diagnostic only;
    /// the generic parser logs and clears this before returning.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extraction_methods: Vec<&'static str>,
    /// Advisory: the page looks like a multi-result listing rather than a
    /// single posting. Does not suppress field population.
    pub is_search_results_page: bool,
}

macro_rules! fill_text {
    ($(#[$meta:meta])* $name:ident, $field:ident) => {
        $(#[$meta])*
        pub fn $name(&mut self, raw: &str) -> bool {
            if self.$field.is_some() {
                return false;
            }
            match clean_text(raw) {
                Some(v) => {
                    self.$field = Some(v);
                    true
                }
                None => false,
            }
        }
    };
}

macro_rules! fill_date {
    ($name:ident, $field:ident) => {
        /// Parses the raw date string; leaves the field unset on failure.
        pub fn $name(&mut self, raw: &str) -> bool {
            if self.$field.is_some() {
                return false;
            }
            match parse_date(raw) {
                Some(v) => {
                    self.$field = Some(v);
                    true
                }
                None => false,
            }
        }
    };
}

impl JobRecord {
    pub fn new(source: Source, url: &str) -> Self {
        Self {
            source,
            url: url.to_string(),
            title: None,
            company: None,
            location: None,
            description: None,
            requirements: None,
            contact_email: None,
            contact_person: None,
            contact_phone: None,
            posted_date: None,
            application_deadline: None,
            employment_type: None,
            salary: None,
            reference_number: None,
            company_profile_url: None,
            extraction_methods: Vec::new(),
            is_search_results_page: false,
        }
    }

    fill_text!(fill_title, title);
    fill_text!(fill_company, company);
    fill_text!(fill_location, location);
    fill_text!(fill_description, description);
    fill_text!(fill_requirements, requirements);
    fill_text!(fill_contact_email, contact_email);
    fill_text!(fill_contact_person, contact_person);
    fill_text!(fill_contact_phone, contact_phone);
    fill_text!(fill_employment_type, employment_type);
    fill_text!(fill_salary, salary);
    fill_text!(fill_reference_number, reference_number);
    fill_text!(fill_company_profile_url, company_profile_url);

    fill_date!(fill_posted_date, posted_date);
    fill_date!(fill_application_deadline, application_deadline);
}
