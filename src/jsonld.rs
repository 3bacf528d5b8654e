// Structured-data extractor for Schema.org JobPosting JSON-LD.
//
// JSON-LD in the wild is polymorphic: most fields can be a string, an
// object, or an array depending on the publisher. Instead of chasing raw
// Value lookups, each polymorphic field is decoded into an untagged sum
// type with a catch-all variant, and nodes that do not conform to the
// JobPosting shape at all are skipped rather than failing the scan.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::record::JobRecord;

static LD_JSON_SCRIPTS: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("ld+json selector")
});

/// A decoded Schema.org JobPosting node.
#[derive(Debug, Clone, Deserialize)]
pub struct JobPosting {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "hiringOrganization", default)]
    pub hiring_organization: Option<Organization>,
    #[serde(rename = "jobLocation", default)]
    pub job_location: Option<LocationValue>,
    #[serde(rename = "datePosted", default)]
    pub date_posted: Option<String>,
    #[serde(rename = "validThrough", default)]
    pub valid_through: Option<String>,
    #[serde(rename = "employmentType", default)]
    pub employment_type: Option<EmploymentType>,
    #[serde(rename = "baseSalary", default)]
    pub base_salary: Option<BaseSalary>,
    #[serde(default)]
    pub identifier: Option<Identifier>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Organization {
    Name(String),
    Object {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        url: Option<String>,
        #[serde(rename = "sameAs", default)]
        same_as: Option<String>,
    },
    Other(Value),
}

/// `jobLocation` can be a bare string, a Place object, or a list of either.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LocationValue {
    Text(String),
    Place {
        #[serde(default)]
        address: Option<Address>,
    },
    Many(Vec<LocationValue>),
    Other(Value),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Address {
    Text(String),
    Fields {
        #[serde(rename = "streetAddress", default)]
        street_address: Option<AddressPart>,
        #[serde(rename = "postalCode", default)]
        postal_code: Option<AddressPart>,
        #[serde(rename = "addressLocality", default)]
        address_locality: Option<AddressPart>,
        #[serde(rename = "addressRegion", default)]
        address_region: Option<AddressPart>,
        #[serde(rename = "addressCountry", default)]
        address_country: Option<AddressPart>,
    },
    Other(Value),
}

/// Individual address components are usually strings but occasionally
/// nested objects with a `name` (e.g. `addressCountry`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AddressPart {
    Text(String),
    Named {
        #[serde(default)]
        name: Option<String>,
    },
    Other(Value),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EmploymentType {
    One(String),
    Many(Vec<String>),
    Other(Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct BaseSalary {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub value: Option<SalaryValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SalaryValue {
    Range {
        #[serde(rename = "minValue", default)]
        min_value: Option<Numberish>,
        #[serde(rename = "maxValue", default)]
        max_value: Option<Numberish>,
    },
    Scalar(Numberish),
    Other(Value),
}

/// Numbers sometimes arrive as JSON strings ("55000").
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Numberish {
    Num(f64),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Text(String),
    Object {
        #[serde(default)]
        value: Option<String>,
    },
    Other(Value),
}

/// Scan all `<script type="application/ld+json">` blocks for the first
/// decodable JobPosting. Malformed JSON and non-conforming nodes are
/// skipped; scanning continues with the next block.
pub fn extract_json_ld(doc: &Html) -> Option<JobPosting> {
    for script in doc.select(&LD_JSON_SCRIPTS) {
        let body: String = script.text().collect();
        let data: Value = match serde_json::from_str(&body) {
            Ok(v) => v,
            Err(e) => {
                debug!("Skipping malformed JSON-LD block: {e}");
                continue;
            }
        };
        if let Some(node) = find_job_posting(&data) {
            match serde_json::from_value::<JobPosting>(node.clone()) {
                Ok(posting) => return Some(posting),
                Err(e) => {
                    debug!("Skipping non-conforming JobPosting node: {e}");
                    continue;
                }
            }
        }
    }
    None
}

/// Locate a `"@type": "JobPosting"` node in a bare object, an array, or a
/// nested `@graph` array (searched recursively).
fn find_job_posting(data: &Value) -> Option<&Value> {
    match data {
        Value::Array(items) => items.iter().find_map(find_job_posting),
        Value::Object(map) => {
            if map.get("@type").and_then(Value::as_str) == Some("JobPosting") {
                return Some(data);
            }
            map.get("@graph").and_then(find_job_posting)
        }
        _ => None,
    }
}

/// Fill the fields every portal shares from a decoded JobPosting.
/// Portal-specific extras (company profile URL, reference number) stay in
/// the individual portal parsers.
pub fn fill_record(posting: &JobPosting, rec: &mut JobRecord) {
    if let Some(title) = &posting.title {
        rec.fill_title(title);
    }
    if let Some(desc) = &posting.description {
        rec.fill_description(desc);
    }
    if let Some(name) = posting.company_name() {
        rec.fill_company(name);
    }
    if let Some(location) = posting.location_label() {
        rec.fill_location(&location);
    }
    if let Some(date) = &posting.date_posted {
        rec.fill_posted_date(date);
    }
    if let Some(date) = &posting.valid_through {
        rec.fill_application_deadline(date);
    }
    if let Some(emp) = posting.employment_label() {
        rec.fill_employment_type(&emp);
    }
    if let Some(salary) = posting.salary_label() {
        rec.fill_salary(&salary);
    }
}

impl JobPosting {
    pub fn company_name(&self) -> Option<&str> {
        match self.hiring_organization.as_ref()? {
            Organization::Name(s) => Some(s),
            Organization::Object { name, .. } => name.as_deref(),
            Organization::Other(_) => None,
        }
    }

    /// Company profile link, when the publisher includes one (`url` wins
    /// over `sameAs`).
    pub fn company_profile(&self) -> Option<&str> {
        match self.hiring_organization.as_ref()? {
            Organization::Object { url, same_as, .. } => url.as_deref().or(same_as.as_deref()),
            _ => None,
        }
    }

    /// `identifier.value` (or a bare string identifier), used by portals
    /// that publish a reference number.
    pub fn reference(&self) -> Option<&str> {
        match self.identifier.as_ref()? {
            Identifier::Text(s) => Some(s),
            Identifier::Object { value } => value.as_deref(),
            Identifier::Other(_) => None,
        }
    }

    /// Human-readable comma-joined location string.
    pub fn location_label(&self) -> Option<String> {
        location_label(self.job_location.as_ref()?)
    }

    pub fn employment_label(&self) -> Option<String> {
        match self.employment_type.as_ref()? {
            EmploymentType::One(s) => Some(s.clone()),
            EmploymentType::Many(list) if !list.is_empty() => Some(list.join(", ")),
            _ => None,
        }
    }

    /// Salary label in one of the shapes "min-max CUR", "ab min CUR",
    /// "bis max CUR", or "value CUR". Currency defaults to EUR.
    pub fn salary_label(&self) -> Option<String> {
        let salary = self.base_salary.as_ref()?;
        let currency = salary.currency.as_deref().unwrap_or("EUR");
        match salary.value.as_ref()? {
            SalaryValue::Range {
                min_value,
                max_value,
            } => match (
                min_value.as_ref().map(Numberish::label),
                max_value.as_ref().map(Numberish::label),
            ) {
                (Some(min), Some(max)) => Some(format!("{min}-{max} {currency}")),
                (Some(min), None) => Some(format!("ab {min} {currency}")),
                (None, Some(max)) => Some(format!("bis {max} {currency}")),
                (None, None) => None,
            },
            SalaryValue::Scalar(value) => Some(format!("{} {currency}", value.label())),
            SalaryValue::Other(_) => None,
        }
    }
}

impl Numberish {
    /// Render without a trailing ".0" for whole numbers.
    fn label(&self) -> String {
        match self {
            Numberish::Num(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            Numberish::Num(n) => format!("{n}"),
            Numberish::Text(s) => s.trim().to_string(),
        }
    }
}

impl AddressPart {
    fn label(&self) -> Option<&str> {
        match self {
            AddressPart::Text(s) => Some(s),
            AddressPart::Named { name } => name.as_deref(),
            AddressPart::Other(_) => None,
        }
    }
}

fn location_label(location: &LocationValue) -> Option<String> {
    match location {
        LocationValue::Text(s) => Some(s.clone()),
        LocationValue::Place { address } => address.as_ref().and_then(address_label),
        LocationValue::Many(list) => {
            let parts: Vec<String> = list.iter().filter_map(location_label).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        LocationValue::Other(_) => None,
    }
}

fn address_label(address: &Address) -> Option<String> {
    match address {
        Address::Text(s) => Some(s.clone()),
        Address::Fields {
            street_address,
            postal_code,
            address_locality,
            address_region,
            address_country,
        } => {
            let mut parts: Vec<&str> = Vec::new();
            for field in [
                street_address,
                postal_code,
                address_locality,
                address_region,
                address_country,
            ] {
                if let Some(value) = field.as_ref().and_then(AddressPart::label)
                    && !value.is_empty()
                    && !parts.contains(&value)
                {
                    parts.push(value);
                }
            }
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        Address::Other(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with_ld(json: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><head><script type="application/ld+json">{json}</script></head><body></body></html>"#
        ))
    }

    #[test]
    fn extracts_bare_job_posting() {
        let doc = doc_with_ld(
            r#"{"@type": "JobPosting", "title": "Python Backend Developer",
                "hiringOrganization": {"@type": "Organization", "name": "Tech Startup GmbH"}}"#,
        );
        let posting = extract_json_ld(&doc).unwrap();
        assert_eq!(posting.title.as_deref(), Some("Python Backend Developer"));
        assert_eq!(posting.company_name(), Some("Tech Startup GmbH"));
    }

    #[test]
    fn extracts_from_array_and_graph() {
        let doc = doc_with_ld(
            r#"[{"@type": "WebPage"},
                {"@graph": [{"@type": "Organization"},
                            {"@type": "JobPosting", "title": "DevOps Engineer"}]}]"#,
        );
        let posting = extract_json_ld(&doc).unwrap();
        assert_eq!(posting.title.as_deref(), Some("DevOps Engineer"));
    }

    #[test]
    fn malformed_block_is_skipped() {
        let doc = Html::parse_document(
            r#"<html><head>
            <script type="application/ld+json">{not json at all</script>
            <script type="application/ld+json">{"@type": "JobPosting", "title": "QA Engineer"}</script>
            </head></html>"#,
        );
        let posting = extract_json_ld(&doc).unwrap();
        assert_eq!(posting.title.as_deref(), Some("QA Engineer"));
    }

    #[test]
    fn no_match_is_none() {
        let doc = doc_with_ld(r#"{"@type": "Article", "headline": "News"}"#);
        assert!(extract_json_ld(&doc).is_none());
    }

    #[test]
    fn location_from_address_object() {
        let doc = doc_with_ld(
            r#"{"@type": "JobPosting",
                "jobLocation": {"@type": "Place",
                    "address": {"streetAddress": "Torstr. 1", "postalCode": "10119",
                                "addressLocality": "Berlin",
                                "addressCountry": {"@type": "Country", "name": "DE"}}}}"#,
        );
        let posting = extract_json_ld(&doc).unwrap();
        assert_eq!(
            posting.location_label().as_deref(),
            Some("Torstr. 1, 10119, Berlin, DE")
        );
    }

    #[test]
    fn location_list_joins_all() {
        let doc = doc_with_ld(
            r#"{"@type": "JobPosting",
                "jobLocation": [
                    {"address": {"addressLocality": "Berlin"}},
                    {"address": {"addressLocality": "Hamburg"}},
                    "Remote"]}"#,
        );
        let posting = extract_json_ld(&doc).unwrap();
        assert_eq!(
            posting.location_label().as_deref(),
            Some("Berlin, Hamburg, Remote")
        );
    }

    #[test]
    fn salary_range_label() {
        let doc = doc_with_ld(
            r#"{"@type": "JobPosting",
                "baseSalary": {"currency": "EUR",
                    "value": {"minValue": 55000, "maxValue": 75000}}}"#,
        );
        let posting = extract_json_ld(&doc).unwrap();
        assert_eq!(posting.salary_label().as_deref(), Some("55000-75000 EUR"));
    }

    #[test]
    fn salary_open_ended_labels() {
        let doc = doc_with_ld(
            r#"{"@type": "JobPosting",
                "baseSalary": {"value": {"minValue": 48000}}}"#,
        );
        let posting = extract_json_ld(&doc).unwrap();
        assert_eq!(posting.salary_label().as_deref(), Some("ab 48000 EUR"));

        let doc = doc_with_ld(
            r#"{"@type": "JobPosting",
                "baseSalary": {"currency": "CHF", "value": {"maxValue": 90000}}}"#,
        );
        let posting = extract_json_ld(&doc).unwrap();
        assert_eq!(posting.salary_label().as_deref(), Some("bis 90000 CHF"));
    }

    #[test]
    fn salary_scalar_label() {
        let doc = doc_with_ld(
            r#"{"@type": "JobPosting", "baseSalary": {"currency": "EUR", "value": 60000}}"#,
        );
        let posting = extract_json_ld(&doc).unwrap();
        assert_eq!(posting.salary_label().as_deref(), Some("60000 EUR"));
    }

    #[test]
    fn employment_type_list_joins() {
        let doc = doc_with_ld(
            r#"{"@type": "JobPosting", "employmentType": ["FULL_TIME", "TEMPORARY"]}"#,
        );
        let posting = extract_json_ld(&doc).unwrap();
        assert_eq!(
            posting.employment_label().as_deref(),
            Some("FULL_TIME, TEMPORARY")
        );
    }

    #[test]
    fn fill_record_respects_existing_fields() {
        let doc = doc_with_ld(
            r#"{"@type": "JobPosting", "title": "Late Title", "description": "From JSON-LD"}"#,
        );
        let posting = extract_json_ld(&doc).unwrap();
        let mut rec = JobRecord::new(crate::record::Source::Generic, "https://example.com");
        rec.fill_title("Early Title");
        fill_record(&posting, &mut rec);
        assert_eq!(rec.title.as_deref(), Some("Early Title"));
        assert_eq!(rec.description.as_deref(), Some("From JSON-LD"));
    }
}
