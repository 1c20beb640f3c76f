//! Validation rules over every parsed block of a document.

use idlref_parser::{Argument, IdlArena, IdlNode, NodeId, NodeKind};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::autofix::Autofix;

pub mod rule_names {
    pub const NO_DUPLICATE: &str = "no-duplicate";
    pub const UNKNOWN_INCLUDES: &str = "unknown-includes";
    pub const REQUIRE_EXPOSED: &str = "require-exposed";
    pub const REPLACE_VOID: &str = "replace-void";
    pub const CONSTRUCTOR_MEMBER: &str = "constructor-member";
    pub const DICT_ARG_OPTIONAL: &str = "dict-arg-optional";
    pub const DICT_ARG_DEFAULT: &str = "dict-arg-default";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Index of the block the offending node came from.
    pub block: usize,
    pub node: NodeId,
    pub rule: &'static str,
    pub message: String,
    pub autofix: Option<Autofix>,
}

/// Names defined anywhere in the document, built before any rule runs.
#[derive(Default)]
struct DefinitionIndex<'a> {
    mixins: FxHashSet<&'a str>,
    /// Every dictionary node, partials included, by name.
    dictionaries: FxHashMap<&'a str, Vec<&'a IdlNode>>,
}

impl<'a> DefinitionIndex<'a> {
    fn build(arena: &'a IdlArena, blocks: &[&[NodeId]]) -> Self {
        let mut index = Self::default();
        for &id in blocks.iter().flat_map(|defs| defs.iter()) {
            let node = arena.get(id);
            match node.kind {
                NodeKind::InterfaceMixin => {
                    index.mixins.insert(node.name_str());
                }
                NodeKind::Dictionary => {
                    index
                        .dictionaries
                        .entry(node.name_str())
                        .or_default()
                        .push(node);
                }
                _ => {}
            }
        }
        index
    }
}

struct Checker<'a> {
    arena: &'a IdlArena,
    index: DefinitionIndex<'a>,
    /// Non-partial definition names already seen.
    seen: FxHashSet<&'a str>,
    /// Dictionaries with a `required` field, partials and inheritance included.
    required_dictionaries: FxHashSet<&'a str>,
    issues: Vec<ValidationIssue>,
    block: usize,
}

/// Run every rule over `blocks` in order.
#[tracing::instrument(level = "debug", skip_all, fields(blocks = blocks.len()))]
pub fn validate(arena: &IdlArena, blocks: &[&[NodeId]]) -> Vec<ValidationIssue> {
    let index = DefinitionIndex::build(arena, blocks);
    let required_dictionaries = required_dictionaries(arena, &index);
    let mut checker = Checker {
        arena,
        index,
        seen: FxHashSet::default(),
        required_dictionaries,
        issues: Vec::new(),
        block: 0,
    };
    for (block, definitions) in blocks.iter().enumerate() {
        checker.block = block;
        for &id in definitions.iter() {
            checker.check_definition(id);
        }
    }
    debug!(issues = checker.issues.len(), "validation finished");
    checker.issues
}

/// Names of dictionaries that have a required field, directly or through
/// inheritance.
fn required_dictionaries<'a>(
    arena: &'a IdlArena,
    index: &DefinitionIndex<'a>,
) -> FxHashSet<&'a str> {
    let direct: FxHashSet<&str> = index
        .dictionaries
        .iter()
        .filter(|(_, parts)| {
            parts.iter().any(|part| {
                part.members
                    .iter()
                    .any(|&m| arena.get(m).kind == NodeKind::Field && arena.get(m).required)
            })
        })
        .map(|(&name, _)| name)
        .collect();
    index
        .dictionaries
        .keys()
        .copied()
        .filter(|&name| {
            let mut current = Some(name);
            let mut visited = FxHashSet::default();
            while let Some(dict) = current {
                if direct.contains(dict) {
                    return true;
                }
                if !visited.insert(dict) {
                    break;
                }
                current = index
                    .dictionaries
                    .get(dict)
                    .and_then(|parts| parts.iter().find_map(|p| p.inheritance.as_deref()));
            }
            false
        })
        .collect()
}

impl Checker<'_> {
    fn report(
        &mut self,
        node: NodeId,
        rule: &'static str,
        message: String,
        autofix: Option<Autofix>,
    ) {
        self.issues.push(ValidationIssue {
            block: self.block,
            node,
            rule,
            message,
            autofix,
        });
    }

    fn check_definition(&mut self, id: NodeId) {
        let arena = self.arena;
        let node = arena.get(id);

        if !node.partial && node.kind != NodeKind::Includes {
            let name = node.name_str();
            if !self.seen.insert(name) {
                self.report(
                    id,
                    rule_names::NO_DUPLICATE,
                    format!(
                        "The name \"{name}\" of type \"{}\" was already seen",
                        node.kind.as_str()
                    ),
                    None,
                );
            }
        }

        match node.kind {
            NodeKind::Includes => self.check_includes(id, node),
            NodeKind::Interface | NodeKind::Namespace if !node.partial => {
                self.check_exposed(id, node);
                self.check_legacy_constructor(id, node);
            }
            NodeKind::Callback => self.check_return_type(id, node),
            _ => {}
        }
        if node.kind == NodeKind::Callback {
            self.check_arguments(id, node);
        }

        for &member_id in &node.members {
            let member = arena.get(member_id);
            if member.kind == NodeKind::Operation {
                self.check_return_type(member_id, member);
            }
            if matches!(member.kind, NodeKind::Operation | NodeKind::Constructor) {
                self.check_arguments(member_id, member);
            }
        }
    }

    fn check_includes(&mut self, id: NodeId, node: &IdlNode) {
        let mixin = node.mixin.as_deref().unwrap_or_default();
        if !self.index.mixins.contains(mixin) {
            let target = node.target.as_deref().unwrap_or_default();
            self.report(
                id,
                rule_names::UNKNOWN_INCLUDES,
                format!(
                    "\"{target}\" includes \"{mixin}\", but no interface mixin named \"{mixin}\" is defined"
                ),
                None,
            );
        }
    }

    fn check_exposed(&mut self, id: NodeId, node: &IdlNode) {
        if node.has_ext_attr("Exposed") || node.has_ext_attr("LegacyNoInterfaceObject") {
            return;
        }
        self.report(
            id,
            rule_names::REQUIRE_EXPOSED,
            format!(
                "{} \"{}\" should have [Exposed] extended attribute",
                node.kind.as_str(),
                node.name_str()
            ),
            Some(Autofix::AddExposedWindow { node: id }),
        );
    }

    fn check_legacy_constructor(&mut self, id: NodeId, node: &IdlNode) {
        if node.kind != NodeKind::Interface || !node.has_ext_attr("Constructor") {
            return;
        }
        self.report(
            id,
            rule_names::CONSTRUCTOR_MEMBER,
            "Constructors should now be represented as a `constructor()` operation on the \
             interface instead of `[Constructor]` extended attribute"
                .to_string(),
            Some(Autofix::ConstructorMember { node: id }),
        );
    }

    fn check_return_type(&mut self, id: NodeId, node: &IdlNode) {
        if node.idl_type.as_ref().is_some_and(|ty| ty.is_void()) {
            self.report(
                id,
                rule_names::REPLACE_VOID,
                "`void` is now replaced by `undefined`".to_string(),
                Some(Autofix::ReplaceVoid { node: id }),
            );
        }
    }

    fn check_arguments(&mut self, id: NodeId, node: &IdlNode) {
        for (position, arg) in node.arguments.iter().enumerate() {
            if !self.is_optional_dictionary(arg) {
                continue;
            }
            let dictionary = arg.idl_type.as_named().unwrap_or_default();
            if arg.optional {
                if arg.default.is_none() {
                    self.report(
                        id,
                        rule_names::DICT_ARG_DEFAULT,
                        format!(
                            "Optional dictionary argument \"{}\" must have a default value of `{{}}`",
                            arg.name
                        ),
                        Some(Autofix::AddDictionaryDefault {
                            node: id,
                            argument: position,
                        }),
                    );
                }
            } else if !arg.variadic
                && trailing_arguments_optional(&node.arguments[position + 1..])
            {
                self.report(
                    id,
                    rule_names::DICT_ARG_OPTIONAL,
                    format!(
                        "Dictionary argument \"{}\" must be optional because \"{dictionary}\" has no required fields",
                        arg.name
                    ),
                    Some(Autofix::MakeArgumentOptional {
                        node: id,
                        argument: position,
                    }),
                );
            }
        }
    }

    /// A non-nullable argument typed as a dictionary with no required fields.
    fn is_optional_dictionary(&self, arg: &Argument) -> bool {
        if arg.idl_type.nullable {
            return false;
        }
        let Some(name) = arg.idl_type.as_named() else {
            return false;
        };
        self.index.dictionaries.contains_key(name) && !self.required_dictionaries.contains(name)
    }
}

fn trailing_arguments_optional(rest: &[Argument]) -> bool {
    rest.iter().all(|a| a.optional || a.variadic)
}
