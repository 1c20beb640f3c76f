use super::*;
use futures::executor::block_on;
use idlref_common::diagnostics::diagnostic_codes;
use idlref_common::ElementId;
use idlref_xref::{Candidate, StaticXrefDatabase, XrefStats};

fn add_block(doc: &mut Document, source: &str) -> ElementId {
    let pre = doc.create_element("pre");
    doc.set_attr(pre, "class", "idl");
    doc.set_text(pre, source);
    let root = doc.root();
    doc.append_child(root, pre);
    pre
}

fn count_dfns(doc: &Document, dfn_type: &str) -> usize {
    doc.select(doc.root(), |el| {
        el.tag == "dfn" && el.attr("data-dfn-type") == Some(dfn_type)
    })
    .len()
}

fn process(doc: &mut Document, options: ProcessOptions) -> ProcessReport {
    block_on(DocumentProcessor::new(options).process(doc, &StaticXrefDatabase::new()))
}

#[test]
fn test_overloads_resolve_to_distinct_anchors() {
    let mut doc = Document::new();
    add_block(
        &mut doc,
        "[Exposed=Window] interface Foo { undefined bar(); undefined bar(long x); };",
    );
    let report = process(&mut doc, ProcessOptions::default());

    assert!(report.diagnostics.is_empty());
    assert_eq!(report.blocks.len(), 1);
    assert_eq!(count_dfns(&doc, "interface"), 1);
    assert_eq!(count_dfns(&doc, "method"), 2);
    assert!(doc.find_by_anchor("idl-def-foo-bar").is_some());
    assert!(doc.find_by_anchor("idl-def-foo-bar!overload-1").is_some());
}

#[test]
fn test_validation_reports_without_touching_markup() {
    let mut doc = Document::new();
    let pre = add_block(&mut doc, "interface Foo { void bar(); void bar(long x); };");
    let report = process(&mut doc, ProcessOptions::default());

    assert_eq!(report.validation_issues, 3);
    assert!(report.has_errors());
    let validation = report.diagnostics.with_code(diagnostic_codes::IDL_VALIDATION);
    assert_eq!(validation.len(), 3);
    assert!(validation.iter().all(|d| d.element == Some(pre)));
    assert!(validation[2].detail.as_deref().unwrap().contains("undefined bar(long x);"));
    assert!(doc.text_content(pre).contains("void bar(long x);"));
}

#[test]
fn test_disabled_validation_reports_nothing() {
    let mut doc = Document::new();
    add_block(&mut doc, "interface Foo { void bar(); };");
    let options = ProcessOptions {
        validate: false,
        ..ProcessOptions::default()
    };
    let report = process(&mut doc, options);
    assert_eq!(report.validation_issues, 0);
    assert!(!report.has_errors());
}

#[test]
fn test_missing_definition_warns_once_without_synthesis() {
    let mut doc = Document::new();
    let pre = add_block(&mut doc, "[Exposed=Window] interface Baz {};");
    let options = ProcessOptions {
        synthesize_definitions: false,
        ..ProcessOptions::default()
    };
    let report = process(&mut doc, options);

    let missing = report
        .diagnostics
        .with_code(diagnostic_codes::MISSING_IDL_DEFINITION);
    assert_eq!(missing.len(), 1);
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(count_dfns(&doc, "interface"), 0);
    let anchors = doc.select(pre, |el| {
        el.tag == "a" && el.attr("data-title") == Some("Baz")
    });
    assert_eq!(anchors.len(), 1);
    assert_eq!(missing[0].element, Some(anchors[0]));
    assert!(!doc.has_attr(anchors[0], "href"));
}

#[test]
fn test_syntax_error_keeps_other_blocks() {
    let mut doc = Document::new();
    let broken = add_block(&mut doc, "interface {");
    add_block(&mut doc, "[Exposed=Window] interface Ok {};");
    let report = process(&mut doc, ProcessOptions::default());

    assert_eq!(report.blocks.len(), 1);
    let syntax = report.diagnostics.with_code(diagnostic_codes::IDL_SYNTAX_ERROR);
    assert_eq!(syntax.len(), 1);
    assert_eq!(syntax[0].element, Some(broken));
    assert_eq!(doc.text_content(broken), "interface {");
    assert!(doc.find_by_anchor("idl-def-ok").is_some());
}

#[test]
fn test_type_references_link_locally_before_xref() {
    let mut doc = Document::new();
    add_block(
        &mut doc,
        "[Exposed=Window] interface Foo { attribute Bar bar; };\n\
         [Exposed=Window] interface Bar {};",
    );
    let report = process(&mut doc, ProcessOptions::default());

    assert!(report.local_links >= 1);
    let bar_refs = doc.select(doc.root(), |el| {
        el.tag == "a" && el.attr("data-lt") == Some("Bar")
    });
    assert_eq!(bar_refs.len(), 1);
    let href = doc.attr(bar_refs[0], "href").unwrap();
    assert!(doc.find_by_anchor(&href[1..]).is_some());
    let stats = report.xref.unwrap();
    assert!(stats.terms >= 1);
}

#[test]
fn test_widget_resolves_per_citation_context() {
    let mut doc = Document::new();
    let root = doc.root();
    let mut cited_term = |spec: &str| {
        let section = doc.create_element("section");
        doc.set_attr(section, "data-cite", spec);
        doc.append_child(root, section);
        let a = doc.create_element("a");
        doc.set_attr(a, "data-xref", "");
        doc.set_text(a, "widget");
        doc.append_child(section, a);
        a
    };
    let first = cited_term("A");
    let second = cited_term("B");

    let mut db = StaticXrefDatabase::new();
    db.insert(
        "widget",
        Candidate {
            uri: "widgets.html#widget".to_string(),
            spec: "A".to_string(),
            kind: "dfn".to_string(),
            normative: true,
        },
    );
    let report = block_on(DocumentProcessor::default().process(&mut doc, &db));

    assert_eq!(doc.attr(first, "data-cite"), Some("A"));
    assert_eq!(doc.attr(first, "data-cite-frag"), Some("widget"));
    assert!(doc.has_class(second, "respec-offending-element"));
    assert!(doc.normative_references.contains("A"));
    let stats = report.xref.unwrap();
    assert_eq!((stats.resolved, stats.rejected), (1, 1));
    assert!(!report.has_errors());
}

#[test]
fn test_xref_can_be_disabled() {
    let mut doc = Document::new();
    let root = doc.root();
    let a = doc.create_element("a");
    doc.set_attr(a, "data-xref", "widget");
    doc.append_child(root, a);
    let options = ProcessOptions {
        xref: false,
        ..ProcessOptions::default()
    };
    let report = process(&mut doc, options);
    assert_eq!(report.xref, None::<XrefStats>);
    assert!(!doc.has_attr(a, "data-cite"));
}

#[test]
fn test_default_to_json_resolves_through_xref() {
    let mut doc = Document::new();
    add_block(
        &mut doc,
        "[Exposed=Window] interface Foo { [Default] object toJSON(); };",
    );
    let mut db = StaticXrefDatabase::new();
    db.insert(
        "default toJSON steps",
        Candidate {
            uri: "#default-tojson-steps".to_string(),
            spec: "WEBIDL".to_string(),
            kind: "dfn".to_string(),
            normative: true,
        },
    );
    let report = block_on(DocumentProcessor::default().process(&mut doc, &db));

    let steps = doc.select(doc.root(), |el| {
        el.tag == "a" && el.attr("data-lt") == Some("default toJSON steps")
    });
    assert_eq!(steps.len(), 1);
    assert_eq!(doc.attr(steps[0], "data-cite"), Some("WEBIDL"));
    assert_eq!(doc.attr(steps[0], "data-cite-frag"), Some("default-tojson-steps"));
    assert!(doc.normative_references.contains("WEBIDL"));
    assert_eq!(report.xref.unwrap().resolved, 1);
    assert!(!report.has_errors());
}

#[test]
fn test_type_reference_does_not_link_to_prose_concept() {
    let mut doc = Document::new();
    let root = doc.root();
    let dfn = doc.create_element("dfn");
    doc.set_attr(dfn, "id", "concept-request");
    doc.set_text(dfn, "request");
    doc.append_child(root, dfn);
    add_block(&mut doc, "[Exposed=Window] interface Fetcher { attribute Request r; };");
    let report = process(&mut doc, ProcessOptions::default());

    let request = doc.select(doc.root(), |el| {
        el.tag == "a" && el.attr("data-lt") == Some("Request")
    });
    assert_eq!(request.len(), 1);
    assert_eq!(doc.attr(request[0], "href"), None);
    assert_eq!(report.local_links, 0);
}
