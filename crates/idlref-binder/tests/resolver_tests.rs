use super::*;
use idlref_parser::{IdlArena, NodeId, parse};

fn block(source: &str) -> (IdlArena, Vec<NodeId>) {
    let mut arena = IdlArena::new();
    let defs = parse(source, &mut arena).unwrap();
    (arena, defs)
}

#[test]
fn test_repeated_operations_become_overloads() {
    let (arena, defs) =
        block("interface P { undefined foo(); undefined foo(); undefined foo(); };");
    let mut resolver = IdentifierResolver::new();
    let resolved: Vec<ResolvedIdentity> = arena
        .members(defs[0])
        .iter()
        .map(|&m| resolver.resolve(&arena, m, Some("P")))
        .collect();

    let names: Vec<&str> = resolved.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["foo", "foo!overload-1", "foo!overload-2"]);
    let anchors: Vec<&str> = resolved.iter().map(|r| r.anchor_id.as_str()).collect();
    assert_eq!(
        anchors,
        vec!["idl-def-p-foo", "idl-def-p-foo!overload-1", "idl-def-p-foo!overload-2"]
    );
}

#[test]
fn test_overload_does_not_append_argument_segments() {
    let (arena, defs) = block("interface Foo { void bar(); void bar(long x); };");
    let mut resolver = IdentifierResolver::new();
    let members = arena.members(defs[0]);
    let first = resolver.resolve(&arena, members[0], Some("Foo"));
    let second = resolver.resolve(&arena, members[1], Some("Foo"));
    assert_eq!(first.anchor_id, "idl-def-foo-bar");
    assert_eq!(second.anchor_id, "idl-def-foo-bar!overload-1");
}

#[test]
fn test_partial_definitions_are_numbered_in_order() {
    let (arena, defs) = block("partial dictionary Bar {}; partial dictionary Bar {};");
    let mut resolver = IdentifierResolver::new();
    let first = resolver.resolve(&arena, defs[0], None);
    let second = resolver.resolve(&arena, defs[1], None);
    assert_eq!(first.name, "Bar");
    assert_eq!(first.anchor_id, "idl-def-bar-partial-1");
    assert_eq!(second.anchor_id, "idl-def-bar-partial-2");
    assert_eq!(resolver.partial_count("Bar"), 2);
}

#[test]
fn test_resolution_is_idempotent() {
    let (arena, defs) = block("interface P { undefined foo(); };");
    let member = arena.members(defs[0])[0];
    let mut resolver = IdentifierResolver::new();

    let first = resolver.resolve(&arena, member, Some("P"));
    let count = resolver.operation_count("P.foo");
    let again = resolver.resolve(&arena, member, Some("P"));

    assert_eq!(first, again);
    assert_eq!(resolver.operation_count("P.foo"), count);
    assert_eq!(resolver.operation_count("P.foo()"), 1);
    assert_eq!(resolver.get(member), Some(&first));
}

#[test]
fn test_arguments_extend_non_overloaded_anchor() {
    let (arena, defs) = block("interface A { undefined f(long x, DOMString Y); };");
    let mut resolver = IdentifierResolver::new();
    let resolved = resolver.resolve(&arena, arena.members(defs[0])[0], Some("A"));
    assert_eq!(resolved.name, "f");
    assert_eq!(resolved.anchor_id, "idl-def-a-f-x-y");
}

#[test]
fn test_nameless_nodes_fall_back_to_kind_or_keyword() {
    let (arena, defs) = block(
        "enum E { \"a b\" };\n\
         interface I { constructor(); getter long (unsigned long i); iterable<long>; };",
    );
    let mut resolver = IdentifierResolver::new();

    let value = resolver.resolve(&arena, arena.members(defs[0])[0], Some("E"));
    assert_eq!(value.name, "a b");
    assert_eq!(value.anchor_id, "idl-def-e-a b");

    let members = arena.members(defs[1]);
    let ctor = resolver.resolve(&arena, members[0], Some("I"));
    assert_eq!(ctor.name, "constructor");
    assert_eq!(ctor.anchor_id, "idl-def-i-constructor");

    let getter = resolver.resolve(&arena, members[1], Some("I"));
    assert_eq!(getter.name, "getter");
    assert_eq!(getter.anchor_id, "idl-def-i-anonymous-getter-i");

    let iterable = resolver.resolve(&arena, members[2], Some("I"));
    assert_eq!(iterable.anchor_id, "idl-def-i-iterable");
}

#[test]
fn test_duplicate_definitions_still_get_unique_anchors() {
    let (arena, defs) = block("interface X {}; interface X {}; interface X {};");
    let mut resolver = IdentifierResolver::new();
    let anchors: Vec<String> = defs
        .iter()
        .map(|&d| resolver.resolve(&arena, d, None).anchor_id)
        .collect();
    assert_eq!(anchors, vec!["idl-def-x", "idl-def-x-2", "idl-def-x-3"]);
}

#[test]
fn test_counters_are_scoped_to_one_resolver() {
    let (arena, defs) = block("partial interface W {};");
    let first = IdentifierResolver::new().resolve(&arena, defs[0], None);
    let second = IdentifierResolver::new().resolve(&arena, defs[0], None);
    assert_eq!(first.anchor_id, "idl-def-w-partial-1");
    assert_eq!(first, second);
}
