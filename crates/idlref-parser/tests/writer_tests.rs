use super::*;

const CANONICAL: &str = "[Exposed=Window]
interface Foo : Bar {
  constructor(optional FooInit init = {});
  readonly attribute unsigned long length;
  getter DOMString (unsigned long index);
  undefined bar(long x, DOMString... rest);
  const short MAX = 10;
  iterable<DOMString>;
};

dictionary FooInit {
  required DOMString name;
  sequence<long>? items = null;
};

enum Mode {
  \"fast\",
  \"slow\"
};

Foo includes Mixin;";

#[test]
fn test_canonical_text_is_stable() {
    let mut arena = IdlArena::new();
    let defs = parse(CANONICAL, &mut arena).unwrap();
    assert_eq!(write(&arena, &defs), CANONICAL);
}

#[test]
fn test_write_normalises_layout() {
    let mut arena = IdlArena::new();
    let defs = parse(
        "[Exposed = ( Window , Worker )]interface   A{attribute(long or DOMString)? v;};",
        &mut arena,
    )
    .unwrap();
    assert_eq!(
        write(&arena, &defs),
        "[Exposed=(Window,Worker)]\ninterface A {\n  attribute (long or DOMString)? v;\n};"
    );
}

#[derive(Default)]
struct Recorder {
    names: Vec<(String, Option<NodeId>)>,
    references: Vec<String>,
    text: String,
}

impl Templates for Recorder {
    fn text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn reference(&mut self, name: &str, context: RefContext<'_>) {
        if context == RefContext::Type {
            self.references.push(name.to_string());
        }
        self.text(name);
    }

    fn name(&mut self, text: &str, _node: NodeId, parent: Option<NodeId>) {
        self.names.push((text.to_string(), parent));
        self.text(text);
    }
}

#[test]
fn test_templates_see_names_with_parents() {
    let mut arena = IdlArena::new();
    let defs = parse(
        "[Exposed=Window] interface A { attribute Node x; undefined f(); constructor(); };",
        &mut arena,
    )
    .unwrap();
    let mut recorder = Recorder::default();
    write_with(&arena, &defs, &mut recorder);

    let a = Some(defs[0]);
    assert_eq!(
        recorder.names,
        vec![
            ("A".to_string(), None),
            ("x".to_string(), a),
            ("f".to_string(), a),
            ("constructor".to_string(), a),
        ]
    );
    assert_eq!(recorder.references, vec!["Node", "undefined"]);
    assert_eq!(recorder.text, write(&arena, &defs));
}
