use super::*;
use futures::executor::block_on;
use idlref_common::diagnostics::diagnostic_codes;
use idlref_common::{Diagnostics, Document, DocumentNode, ElementId};
use std::future::{Future, ready};

struct Unreachable;

impl XrefTransport for Unreachable {
    fn lookup(&self, _query: &XrefQuery) -> impl Future<Output = Result<XrefResponse, XrefError>> {
        ready(Err(XrefError::Transport("connection refused".to_string())))
    }
}

fn doc_from(json: &str) -> Document {
    let node: DocumentNode = serde_json::from_str(json).unwrap();
    Document::from_node(&node)
}

fn sites(doc: &Document) -> Vec<ElementId> {
    doc.select(doc.root(), |el| el.has_attr("data-xref"))
}

fn database(entries: &[(&str, &str, bool)]) -> StaticXrefDatabase {
    let mut db = StaticXrefDatabase::new();
    for &(term, spec, normative) in entries {
        db.insert(
            term,
            Candidate {
                uri: format!("{}.html#{term}", spec.to_lowercase()),
                spec: spec.to_string(),
                kind: "dfn".to_string(),
                normative,
            },
        );
    }
    db
}

fn run(doc: &mut Document, transport: &impl XrefTransport) -> (XrefStats, Diagnostics) {
    let mut diags = Diagnostics::new();
    let stats = block_on(XrefResolver::default().resolve(doc, &mut diags, transport));
    (stats, diags)
}

const TWO_CONTEXTS: &str = r#"{"tag": "body", "children": [
    {"tag": "section", "attrs": {"data-cite": "A"}, "children": [
        {"tag": "a", "attrs": {"data-xref": ""}, "children": ["widget"]}
    ]},
    {"tag": "section", "attrs": {"data-cite": "B"}, "children": [
        {"tag": "a", "attrs": {"data-xref": ""}, "children": ["Widget"]}
    ]}
]}"#;

#[test]
fn test_single_candidate_respects_each_occurrence_citation() {
    let mut doc = doc_from(TWO_CONTEXTS);
    let (stats, diags) = run(&mut doc, &database(&[("widget", "A", true)]));
    let [first, second] = sites(&doc)[..] else {
        panic!("expected two occurrences");
    };

    assert_eq!(doc.attr(first, "data-cite"), Some("A"));
    assert_eq!(doc.attr(first, "data-cite-path"), Some("a.html"));
    assert_eq!(doc.attr(first, "data-cite-frag"), Some("widget"));
    assert!(!doc.has_class(first, OFFENDING_CLASS));

    assert!(doc.has_class(second, OFFENDING_CLASS));
    assert!(!doc.has_attr(second, "data-cite-path"));
    let rejected = diags.with_code(diagnostic_codes::XREF_NO_MATCHING_SPEC);
    assert_eq!(rejected.len(), 1);
    assert_eq!(rejected[0].element, Some(second));
    assert!(rejected[0].message_text.contains("\"widget\""));
    assert!(rejected[0].message_text.ends_with(": B."));

    assert_eq!(stats.resolved, 1);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.terms, 1);
    assert_eq!(stats.occurrences, 2);
    assert_eq!(stats.query_keys, 2);
    assert!(doc.normative_references.contains("A"));
    assert!(doc.informative_references.is_empty());
}

#[test]
fn test_uncited_occurrence_accepts_single_candidate() {
    let mut doc = doc_from(
        r#"{"tag": "body", "children": [{"tag": "a", "attrs": {"data-xref": ""}, "children": ["widget"]}]}"#,
    );
    let (stats, diags) = run(&mut doc, &database(&[("widget", "B", true)]));
    assert_eq!(stats.resolved, 1);
    assert!(diags.is_empty());
    assert_eq!(doc.attr(sites(&doc)[0], "data-cite"), Some("B"));
}

#[test]
fn test_multiple_candidates_are_always_rejected() {
    let mut doc = doc_from(TWO_CONTEXTS);
    let (stats, diags) = run(&mut doc, &database(&[("widget", "A", true), ("widget", "B", true)]));
    assert_eq!(stats.ambiguous, 2);
    assert_eq!(stats.resolved, 0);
    for site in sites(&doc) {
        assert!(doc.has_class(site, OFFENDING_CLASS));
        assert!(!doc.has_attr(site, "data-cite-path"));
    }
    let ambiguous = diags.with_code(diagnostic_codes::XREF_AMBIGUOUS);
    assert_eq!(ambiguous.len(), 2);
    assert!(ambiguous[0].message_text.contains("A, B"));
    assert!(doc.normative_references.is_empty());
}

#[test]
fn test_unknown_terms_are_left_alone() {
    let mut doc = doc_from(TWO_CONTEXTS);
    let (stats, diags) = run(&mut doc, &StaticXrefDatabase::new());
    assert_eq!(stats.unmatched, 2);
    assert!(diags.is_empty());
    assert!(sites(&doc).iter().all(|&s| !doc.has_class(s, OFFENDING_CLASS)));
}

#[test]
fn test_informative_matches_depend_on_region() {
    let mut doc = doc_from(
        r#"{"tag": "body", "children": [
            {"tag": "div", "attrs": {"class": "note"}, "children": [
                {"tag": "a", "attrs": {"data-xref": ""}, "children": ["gizmo"]}
            ]},
            {"tag": "figure", "children": [
                {"tag": "a", "attrs": {"data-xref": ""}, "children": ["doohickey"]}
            ]},
            {"tag": "p", "children": [
                {"tag": "a", "attrs": {"data-xref": ""}, "children": ["thingamajig"]}
            ]}
        ]}"#,
    );
    let db = database(&[
        ("gizmo", "G", false),
        ("doohickey", "D", false),
        ("thingamajig", "T", false),
    ]);
    let (stats, diags) = run(&mut doc, &db);

    assert_eq!(stats.resolved, 3);
    let informative: Vec<&str> = doc.informative_references.iter().map(String::as_str).collect();
    assert_eq!(informative, vec!["G", "D"]);
    assert!(doc.normative_references.is_empty());

    let warnings = diags.with_code(diagnostic_codes::XREF_INFORMATIVE_IN_NORMATIVE);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message_text.contains("[T]"));
    assert_eq!(doc.attr(sites(&doc)[2], "data-cite"), Some("T"));
}

#[test]
fn test_failed_lookup_annotates_nothing() {
    let mut doc = doc_from(TWO_CONTEXTS);
    let before = doc.to_node(doc.root());
    let (stats, diags) = run(&mut doc, &Unreachable);

    assert!(stats.lookup_failed);
    assert_eq!(stats.resolved, 0);
    assert_eq!(doc.to_node(doc.root()), before);
    assert!(doc.normative_references.is_empty());
    let failed = diags.with_code(diagnostic_codes::XREF_LOOKUP_FAILED);
    assert_eq!(failed.len(), 1);
    assert!(failed[0].message_text.contains("connection refused"));
    assert!(!diags.has_errors());
}

#[test]
fn test_no_occurrences_skips_lookup() {
    let mut doc = doc_from(r#"{"tag": "body", "children": ["nothing to see"]}"#);
    let (stats, diags) = run(&mut doc, &Unreachable);
    assert_eq!(stats, XrefStats::default());
    assert!(diags.is_empty());
}
