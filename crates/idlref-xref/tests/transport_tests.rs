use super::*;
use futures::executor::block_on;

fn candidate(uri: &str, spec: &str) -> Candidate {
    Candidate {
        uri: uri.to_string(),
        spec: spec.to_string(),
        kind: "dfn".to_string(),
        normative: true,
    }
}

#[test]
fn test_cite_path_and_fragment() {
    assert_eq!(
        candidate("widgets.html#widget", "A").cite_path_and_fragment(),
        ("widgets.html", "widget")
    );
    assert_eq!(
        candidate("multipage/dom.html#the-body", "HTML").cite_path_and_fragment(),
        ("dom.html", "the-body")
    );
    assert_eq!(candidate("#frag", "A").cite_path_and_fragment(), ("", "frag"));
    assert_eq!(candidate("index.html", "A").cite_path_and_fragment(), ("index.html", ""));
}

#[test]
fn test_database_from_json_normalises_terms() {
    let db = StaticXrefDatabase::from_json(
        r##"{"Event  Target": [{"uri": "#eventtarget", "spec": "DOM", "type": "interface"}]}"##,
    )
    .unwrap();
    assert_eq!(db.len(), 1);
    let query = XrefQuery {
        keys: vec![QueryKey {
            term: "event target".to_string(),
            specs: Vec::new(),
            types: Vec::new(),
        }],
    };
    let response = block_on(db.lookup(&query)).unwrap();
    let found = response.candidates("event target");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].kind, "interface");
    assert!(!found[0].normative);
}

#[test]
fn test_database_answers_every_queried_term_once() {
    let mut db = StaticXrefDatabase::new();
    db.insert("widget", candidate("a.html#widget", "A"));
    db.insert("widget", candidate("b.html#widget", "B"));
    let key = |specs: &[&str]| QueryKey {
        term: "widget".to_string(),
        specs: specs.iter().map(|s| s.to_string()).collect(),
        types: Vec::new(),
    };
    let query = XrefQuery {
        keys: vec![key(&["A"]), key(&["B"]), QueryKey {
            term: "gadget".to_string(),
            specs: Vec::new(),
            types: Vec::new(),
        }],
    };
    let response = db.answer(&query);
    assert_eq!(response.candidates("widget").len(), 2);
    assert!(response.candidates("gadget").is_empty());
    assert!(response.candidates("unasked").is_empty());
}

#[test]
fn test_malformed_database_is_an_error() {
    let err = StaticXrefDatabase::from_json(r#"{"widget": [{"uri": 3}]}"#).unwrap_err();
    assert!(matches!(err, XrefError::Database(_)));
    assert!(err.to_string().starts_with("malformed term database"));
}
