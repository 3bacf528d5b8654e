// DOM lookup helpers over scraper::Html.
//
// Portal pages rarely offer stable CSS hooks, so most lookups here are
// regex probes over attributes and class names, walking the document in
// order and returning the first hit (mirroring how the portals' own
// markup is searched field by field).

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// All elements of the document in document order.
pub(crate) fn elements(doc: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    doc.root_element().descendants().filter_map(ElementRef::wrap)
}

/// First element matched by any selector in the list, in list priority
/// order (not document order across selectors).
pub(crate) fn first_select<'a>(doc: &'a Html, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors.iter().find_map(|sel| doc.select(sel).next())
}

/// First element whose `attr` value matches the regex.
pub(crate) fn find_attr_regex<'a>(doc: &'a Html, attr: &str, re: &Regex) -> Option<ElementRef<'a>> {
    elements(doc).find(|el| el.value().attr(attr).is_some_and(|v| re.is_match(v)))
}

/// First element with `attr` exactly equal to `value`.
pub(crate) fn find_attr_eq<'a>(doc: &'a Html, attr: &str, value: &str) -> Option<ElementRef<'a>> {
    elements(doc).find(|el| el.value().attr(attr) == Some(value))
}

/// First element carrying `attr` at all.
pub(crate) fn find_attr_present<'a>(doc: &'a Html, attr: &str) -> Option<ElementRef<'a>> {
    elements(doc).find(|el| el.value().attr(attr).is_some())
}

/// First element with any class name matching the regex.
pub(crate) fn find_class_regex<'a>(doc: &'a Html, re: &Regex) -> Option<ElementRef<'a>> {
    elements(doc).find(|el| el.value().classes().any(|c| re.is_match(c)))
}

/// All elements with any class name matching the regex, in document order.
pub(crate) fn all_class_regex<'a>(doc: &'a Html, re: &Regex) -> Vec<ElementRef<'a>> {
    elements(doc)
        .filter(|el| el.value().classes().any(|c| re.is_match(c)))
        .collect()
}

/// First element with the given tag name and a class matching the regex.
pub(crate) fn find_named_class_regex<'a>(
    doc: &'a Html,
    name: &str,
    re: &Regex,
) -> Option<ElementRef<'a>> {
    elements(doc).find(|el| {
        el.value().name() == name && el.value().classes().any(|c| re.is_match(c))
    })
}

/// First `<a>` whose href matches the regex.
pub(crate) fn find_link_href<'a>(doc: &'a Html, re: &Regex) -> Option<ElementRef<'a>> {
    elements(doc).find(|el| {
        el.value().name() == "a" && el.value().attr("href").is_some_and(|h| re.is_match(h))
    })
}

/// First descendant of `el` with `attr` exactly equal to `value`.
pub(crate) fn descendant_attr_eq<'a>(
    el: ElementRef<'a>,
    attr: &str,
    value: &str,
) -> Option<ElementRef<'a>> {
    el.descendants()
        .filter_map(ElementRef::wrap)
        .skip(1)
        .find(|d| d.value().attr(attr) == Some(value))
}

/// First descendant of `el` with the given tag name.
pub(crate) fn descendant_named<'a>(el: ElementRef<'a>, name: &str) -> Option<ElementRef<'a>> {
    el.descendants()
        .filter_map(ElementRef::wrap)
        .skip(1)
        .find(|d| d.value().name() == name)
}

/// Inline text of an element: trimmed text pieces joined by single spaces.
pub(crate) fn element_text(el: &ElementRef) -> String {
    let pieces: Vec<&str> = el.text().map(str::trim).filter(|t| !t.is_empty()).collect();
    pieces.join(" ")
}

/// Block text of an element: trimmed text pieces joined by newlines,
/// suitable for description/requirements sections.
pub(crate) fn block_text(el: &ElementRef) -> String {
    let pieces: Vec<&str> = el.text().map(str::trim).filter(|t| !t.is_empty()).collect();
    pieces.join("\n")
}

/// Concatenated text of the whole page, for full-text regex scans
/// (emails, salary patterns, phone numbers).
pub(crate) fn page_text(doc: &Html) -> String {
    doc.root_element().text().collect()
}

/// Nearest ancestor (with a tag name in `parent_tags`) of the first text
/// node matching `label`.
pub(crate) fn find_label_parent<'a>(
    doc: &'a Html,
    label: &Regex,
    parent_tags: &[&str],
) -> Option<ElementRef<'a>> {
    for node in doc.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        if !label.is_match(text) {
            continue;
        }
        let mut ancestor = node.parent();
        while let Some(parent) = ancestor {
            if let Some(el) = ElementRef::wrap(parent)
                && parent_tags.contains(&el.value().name())
            {
                return Some(el);
            }
            ancestor = parent.parent();
        }
        return None;
    }
    None
}

/// First following sibling element with a tag name in `names`.
pub(crate) fn next_sibling_named<'a>(
    el: ElementRef<'a>,
    names: &[&str],
) -> Option<ElementRef<'a>> {
    el.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sib| names.contains(&sib.value().name()))
}

/// Find a value adjacent to a label like "Arbeitgeber:".
///
/// Locates the label text and walks up to the nearest container in
/// `parent_tags`. "Arbeitgeber: ACME" inside one element yields the text
/// after the label; a bare "Arbeitgeber:" label yields the next sibling
/// element's text instead.
pub(crate) fn find_label_value(
    doc: &Html,
    label_pattern: &str,
    parent_tags: &[&str],
) -> Option<String> {
    let label = Regex::new(&format!(r"(?i){label_pattern}\s*:")).ok()?;
    let parent = find_label_parent(doc, &label, parent_tags)?;

    let strip = Regex::new(&format!(r"(?i)^{label_pattern}\s*:\s*")).ok()?;
    let text = element_text(&parent);
    if strip.is_match(&text) {
        let cleaned = strip.replace(&text, "").trim().to_string();
        if !cleaned.is_empty() {
            return Some(cleaned);
        }
    }

    if let Some(sibling) = next_sibling_named(parent, &["div", "p", "span", "dd"]) {
        let text = element_text(&sibling);
        if !text.is_empty() {
            return Some(text);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;

    static JOB_TITLE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)job[-_]?title").expect("regex"));

    #[test]
    fn class_regex_matches_single_class_token() {
        let doc = Html::parse_document(
            r#"<div class="header job-title large">Rust Engineer</div>"#,
        );
        let el = find_class_regex(&doc, &JOB_TITLE).unwrap();
        assert_eq!(element_text(&el), "Rust Engineer");
    }

    #[test]
    fn attr_regex_and_eq_lookup() {
        let doc = Html::parse_document(
            r#"<span data-testid="jobTitle-header">A</span><span data-testid="other">B</span>"#,
        );
        assert!(find_attr_regex(&doc, "data-testid", &JOB_TITLE).is_some());
        assert!(find_attr_eq(&doc, "data-testid", "other").is_some());
        assert!(find_attr_eq(&doc, "data-testid", "missing").is_none());
    }

    #[test]
    fn label_value_prefers_next_sibling() {
        let doc = Html::parse_document(
            r#"<dl><dt>Arbeitgeber:</dt><dd>ACME GmbH</dd></dl>"#,
        );
        let value = find_label_value(&doc, "Arbeitgeber", &["dt"]);
        assert_eq!(value.as_deref(), Some("ACME GmbH"));
    }

    #[test]
    fn label_value_strips_prefix_without_sibling() {
        let doc = Html::parse_document(r#"<p>Arbeitsort: Berlin Mitte</p>"#);
        let value = find_label_value(&doc, "Arbeitsort", &["div", "p", "span"]);
        assert_eq!(value.as_deref(), Some("Berlin Mitte"));
    }

    #[test]
    fn block_text_separates_elements() {
        let doc = Html::parse_document(r#"<article><h2>Aufgaben</h2><p>Rust schreiben</p></article>"#);
        let article = first_select(&doc, &[Selector::parse("article").unwrap()]).unwrap();
        assert_eq!(block_text(&article), "Aufgaben\nRust schreiben");
    }
}
