//! Term occurrences in a document.

use idlref_common::{Document, Element, ElementId};
use indexmap::IndexMap;
use tracing::debug;

/// One place in the document that should resolve against the term database.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermOccurrence {
    pub element: ElementId,
    pub term: String,
    /// Citation context of the nearest ancestor, in attribute order.
    pub specs: Vec<String>,
    /// Expected definition types. Never populated by [`collect_occurrences`].
    pub types: Vec<String>,
}

/// Occurrences grouped by normalised term, in first-seen order.
pub type TermGroups = IndexMap<String, Vec<TermOccurrence>>;

/// Trim, collapse internal whitespace, lower-case.
pub fn normalize_term(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Explicit `data-xref` markers, and compiler anchors that carry a
/// `data-xref-type` but no `href` yet.
fn is_occurrence_site(el: &Element) -> bool {
    el.has_attr("data-xref")
        || (el.tag == "a" && el.has_attr("data-xref-type") && !el.has_attr("href"))
}

/// Spec identifiers named by a `data-cite` value. Tokens may carry a path or
/// fragment (`HTML#the-body`); only the identifier is kept.
fn cite_specs(value: &str) -> Vec<String> {
    value
        .split_whitespace()
        .filter_map(|token| token.split(['#', '/']).next())
        .filter(|spec| !spec.is_empty())
        .map(str::to_string)
        .collect()
}

fn occurrence_term(doc: &Document, el: ElementId) -> String {
    let raw = match doc.attr(el, "data-xref") {
        Some(explicit) if !explicit.trim().is_empty() => explicit.to_string(),
        _ => match doc.attr(el, "data-lt") {
            Some(lt) => lt.split('|').next().unwrap_or_default().to_string(),
            None => doc.text_content(el),
        },
    };
    normalize_term(&raw)
}

#[tracing::instrument(level = "debug", skip_all)]
pub fn collect_occurrences(doc: &Document) -> TermGroups {
    let mut groups = TermGroups::new();
    for el in doc.select(doc.root(), is_occurrence_site) {
        let term = occurrence_term(doc, el);
        if term.is_empty() {
            continue;
        }
        let specs = doc
            .closest(el, |e| e.has_attr("data-cite"))
            .and_then(|cited| doc.attr(cited, "data-cite"))
            .map(cite_specs)
            .unwrap_or_default();
        groups.entry(term.clone()).or_default().push(TermOccurrence {
            element: el,
            term,
            specs,
            types: Vec::new(),
        });
    }
    debug!(terms = groups.len(), "collected term occurrences");
    groups
}
