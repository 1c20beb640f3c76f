use super::*;
use idlref_parser::{IdlArena, NodeId, parse, write};

fn parse_blocks(arena: &mut IdlArena, sources: &[&str]) -> Vec<Vec<NodeId>> {
    sources
        .iter()
        .map(|src| parse(src, arena).unwrap())
        .collect()
}

fn rules_of(arena: &IdlArena, blocks: &[Vec<NodeId>]) -> Vec<&'static str> {
    let lists: Vec<&[NodeId]> = blocks.iter().map(Vec::as_slice).collect();
    validate(arena, &lists).into_iter().map(|i| i.rule).collect()
}

fn fix_all(arena: &mut IdlArena, blocks: &[Vec<NodeId>]) {
    let lists: Vec<&[NodeId]> = blocks.iter().map(Vec::as_slice).collect();
    for issue in validate(arena, &lists) {
        if let Some(fix) = issue.autofix {
            fix.apply(arena);
        }
    }
}

#[test]
fn test_clean_idl_has_no_issues() {
    let mut arena = IdlArena::new();
    let blocks = parse_blocks(
        &mut arena,
        &["[Exposed=Window] interface Foo { undefined bar(optional FooInit init = {}); };
           dictionary FooInit { long size; };
           interface mixin M {};
           Foo includes M;"],
    );
    assert!(rules_of(&arena, &blocks).is_empty());
}

#[test]
fn test_missing_exposed_and_void_are_reported_in_order() {
    let mut arena = IdlArena::new();
    let blocks = parse_blocks(&mut arena, &["interface Foo { void bar(); };"]);
    assert_eq!(
        rules_of(&arena, &blocks),
        vec![rule_names::REQUIRE_EXPOSED, rule_names::REPLACE_VOID]
    );
}

#[test]
fn test_partial_and_no_interface_object_do_not_need_exposed() {
    let mut arena = IdlArena::new();
    let blocks = parse_blocks(
        &mut arena,
        &["partial interface Foo {}; [LegacyNoInterfaceObject] interface Bar {};"],
    );
    assert!(rules_of(&arena, &blocks).is_empty());
}

#[test]
fn test_duplicate_across_blocks_points_at_second_block() {
    let mut arena = IdlArena::new();
    let blocks = parse_blocks(
        &mut arena,
        &[
            "[Exposed=Window] interface A {};",
            "[Exposed=Window] interface A {}; partial interface A {};",
        ],
    );
    let lists: Vec<&[NodeId]> = blocks.iter().map(Vec::as_slice).collect();
    let issues = validate(&arena, &lists);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].rule, rule_names::NO_DUPLICATE);
    assert_eq!(issues[0].block, 1);
    assert_eq!(issues[0].node, blocks[1][0]);
    assert!(issues[0].autofix.is_none());
}

#[test]
fn test_includes_of_unknown_mixin() {
    let mut arena = IdlArena::new();
    let blocks = parse_blocks(&mut arena, &["Window includes Missing;"]);
    let lists: Vec<&[NodeId]> = blocks.iter().map(Vec::as_slice).collect();
    let issues = validate(&arena, &lists);
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].rule, rule_names::UNKNOWN_INCLUDES);
    assert!(issues[0].message.contains("\"Missing\""));
}

#[test]
fn test_void_callback_is_fixed() {
    let mut arena = IdlArena::new();
    let blocks = parse_blocks(&mut arena, &["callback Done = void (long code);"]);
    assert_eq!(rules_of(&arena, &blocks), vec![rule_names::REPLACE_VOID]);
    fix_all(&mut arena, &blocks);
    assert_eq!(write(&arena, &blocks[0]), "callback Done = undefined (long code);");
}

#[test]
fn test_legacy_constructor_becomes_member() {
    let mut arena = IdlArena::new();
    let blocks = parse_blocks(
        &mut arena,
        &["[Exposed=Window, Constructor(long x)] interface C { attribute long x; };"],
    );
    assert_eq!(rules_of(&arena, &blocks), vec![rule_names::CONSTRUCTOR_MEMBER]);
    fix_all(&mut arena, &blocks);
    assert_eq!(
        write(&arena, &blocks[0]),
        "[Exposed=Window]\ninterface C {\n  constructor(long x);\n  attribute long x;\n};"
    );
}

#[test]
fn test_dictionary_arguments_across_blocks() {
    let mut arena = IdlArena::new();
    let blocks = parse_blocks(
        &mut arena,
        &[
            "dictionary Opts { long a; };",
            "[Exposed=Window] interface D {
               undefined f(Opts o);
               undefined g(optional Opts o);
               undefined h(Opts o, long n);
             };",
        ],
    );
    assert_eq!(
        rules_of(&arena, &blocks),
        vec![rule_names::DICT_ARG_OPTIONAL, rule_names::DICT_ARG_DEFAULT]
    );
    fix_all(&mut arena, &blocks);
    assert_eq!(
        write(&arena, &blocks[1]),
        "[Exposed=Window]\ninterface D {\n  undefined f(optional Opts o = {});\n  undefined g(optional Opts o = {});\n  undefined h(Opts o, long n);\n};"
    );
}

#[test]
fn test_required_fields_exempt_dictionary_arguments() {
    let mut arena = IdlArena::new();
    let blocks = parse_blocks(
        &mut arena,
        &[
            "dictionary Req { required long a; };
             dictionary Child : Req { long b; };
             dictionary Loose {};
             partial dictionary Loose { required long c; };",
            "[Exposed=Window] interface D {
               undefined f(Req r);
               undefined g(Child c);
               undefined h(Loose l);
               undefined i(Unknown u);
               undefined j(Opts? o);
             };
             dictionary Opts {};",
        ],
    );
    assert!(rules_of(&arena, &blocks).is_empty());
}
