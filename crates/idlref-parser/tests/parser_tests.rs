use super::*;

fn parse_ok(source: &str) -> (IdlArena, Vec<NodeId>) {
    let mut arena = IdlArena::new();
    let defs = parse(source, &mut arena).unwrap();
    (arena, defs)
}

#[test]
fn test_parse_interface_with_overloads() {
    let (arena, defs) = parse_ok("interface Foo { void bar(); void bar(long x); };");
    assert_eq!(defs.len(), 1);
    let foo = arena.get(defs[0]);
    assert_eq!(foo.kind, NodeKind::Interface);
    assert_eq!(foo.name.as_deref(), Some("Foo"));
    assert_eq!(foo.members.len(), 2);

    let second = arena.get(foo.members[1]);
    assert_eq!(second.kind, NodeKind::Operation);
    assert_eq!(second.name.as_deref(), Some("bar"));
    assert!(second.idl_type.as_ref().unwrap().is_void());
    assert_eq!(second.arguments.len(), 1);
    assert_eq!(second.arguments[0].name, "x");
    assert_eq!(second.arguments[0].idl_type.as_named(), Some("long"));
}

#[test]
fn test_parse_partial_dictionary_fields() {
    let (arena, defs) =
        parse_ok("partial dictionary Bar { required DOMString a; long b = 5; };");
    let bar = arena.get(defs[0]);
    assert_eq!(bar.kind, NodeKind::Dictionary);
    assert!(bar.partial);

    let a = arena.get(bar.members[0]);
    assert_eq!(a.kind, NodeKind::Field);
    assert!(a.required);
    let b = arena.get(bar.members[1]);
    assert_eq!(b.default, Some(DefaultValue::Number("5".to_string())));
}

#[test]
fn test_parse_extended_attribute_forms() {
    let (arena, defs) = parse_ok(
        "[Exposed=(Window,Worker), SecureContext, LegacyFactoryFunction=Image(long w)] interface A {};",
    );
    let attrs = &arena.get(defs[0]).ext_attrs;
    assert_eq!(attrs.len(), 3);
    assert_eq!(
        attrs[0].rhs,
        Some(ExtAttrRhs::IdentifierList(vec![
            "Window".to_string(),
            "Worker".to_string()
        ]))
    );
    assert_eq!(attrs[1], ExtAttr::flag("SecureContext"));
    assert_eq!(attrs[2].rhs, Some(ExtAttrRhs::Identifier("Image".to_string())));
    assert_eq!(attrs[2].arguments.as_ref().map(Vec::len), Some(1));
}

#[test]
fn test_parse_enum_allows_trailing_comma() {
    let (arena, defs) = parse_ok("enum Mode { \"fast\", \"slow\", };");
    let values: Vec<&str> = arena
        .members(defs[0])
        .iter()
        .map(|&id| arena.get(id).value.as_deref().unwrap())
        .collect();
    assert_eq!(values, vec!["fast", "slow"]);
    assert_eq!(arena.get(arena.members(defs[0])[0]).kind, NodeKind::EnumValue);
}

#[test]
fn test_parse_top_level_forms() {
    let (arena, defs) = parse_ok(
        "typedef (DOMString or sequence<long>)? U;\n\
         callback Cb = undefined (any value);\n\
         interface mixin M {};\n\
         Foo includes M;\n\
         namespace N { readonly attribute long x; };",
    );
    let kinds: Vec<NodeKind> = defs.iter().map(|&id| arena.get(id).kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Typedef,
            NodeKind::Callback,
            NodeKind::InterfaceMixin,
            NodeKind::Includes,
            NodeKind::Namespace,
        ]
    );

    let typedef = arena.get(defs[0]).idl_type.as_ref().unwrap();
    assert!(typedef.nullable);
    assert_eq!(typedef.referenced_names(), vec!["DOMString", "long"]);

    let includes = arena.get(defs[3]);
    assert_eq!(includes.target.as_deref(), Some("Foo"));
    assert_eq!(includes.mixin.as_deref(), Some("M"));
}

#[test]
fn test_parse_special_and_keyword_members() {
    let (arena, defs) = parse_ok(
        "interface S {\n\
           getter DOMString (unsigned long index);\n\
           stringifier;\n\
           static S make();\n\
           readonly maplike<DOMString, long>;\n\
           async iterable<long>;\n\
         };",
    );
    let members: Vec<&IdlNode> = arena.members(defs[0]).iter().map(|&id| arena.get(id)).collect();

    assert_eq!(members[0].special, Some(Special::Getter));
    assert_eq!(members[0].name, None);
    assert_eq!(members[0].arguments[0].idl_type.as_named(), Some("unsigned long"));

    assert_eq!(members[1].special, Some(Special::Stringifier));
    assert!(members[1].idl_type.is_none());

    assert_eq!(members[2].special, Some(Special::Static));
    assert_eq!(members[2].name.as_deref(), Some("make"));

    assert_eq!(members[3].kind, NodeKind::Maplike);
    assert!(members[3].readonly);
    assert_eq!(members[3].type_args.len(), 2);

    assert_eq!(members[4].kind, NodeKind::AsyncIterable);
}

#[test]
fn test_parse_strips_escaping_underscore() {
    let (arena, defs) = parse_ok("interface _Foo { attribute long _interface; };");
    let foo = arena.get(defs[0]);
    assert_eq!(foo.name_str(), "Foo");
    assert_eq!(arena.get(foo.members[0]).name_str(), "interface");
}

#[test]
fn test_parse_error_reports_location_and_context() {
    let source = "interface Foo {\n  attribute long;\n};";
    let mut arena = IdlArena::new();
    let err = parse(source, &mut arena).unwrap_err();
    assert_eq!(err.line, 2);
    assert_eq!(err.column, 17);
    assert_eq!(err.message, "Unexpected `;`, expected an attribute name");
    assert!(err.context.ends_with('^'));
    assert!(err.to_string().starts_with("Syntax error at line 2, column 17"));
}

#[test]
fn test_parse_error_at_end_of_input() {
    let mut arena = IdlArena::new();
    let err = parse("interface Foo {", &mut arena).unwrap_err();
    assert!(err.message.starts_with("Unexpected end of input"));
}

#[test]
fn test_parse_rejects_unnamed_regular_operation() {
    let mut arena = IdlArena::new();
    assert!(parse("interface Foo { undefined (); };", &mut arena).is_err());
}

#[test]
fn test_maplike_requires_two_type_arguments() {
    let mut arena = IdlArena::new();
    let err = parse("interface Foo { maplike<long>; };", &mut arena).unwrap_err();
    assert!(err.message.contains("takes 2 type argument(s), found 1"));
}
