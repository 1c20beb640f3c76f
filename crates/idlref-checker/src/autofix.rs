use idlref_parser::{DefaultValue, ExtAttr, ExtAttrRhs, IdlArena, IdlNode, NodeId, NodeKind, TypeBody};
use tracing::trace;

/// A tree rewrite that resolves one validation issue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Autofix {
    /// Prepend `[Exposed=Window]`.
    AddExposedWindow { node: NodeId },
    /// Return type `void` becomes `undefined`.
    ReplaceVoid { node: NodeId },
    /// `[Constructor(...)]` becomes a `constructor(...)` member.
    ConstructorMember { node: NodeId },
    /// Make the argument `optional` with a `{}` default.
    MakeArgumentOptional { node: NodeId, argument: usize },
    /// Give an optional dictionary argument a `{}` default.
    AddDictionaryDefault { node: NodeId, argument: usize },
}

impl Autofix {
    pub fn apply(&self, arena: &mut IdlArena) {
        trace!(fix = ?self, "applying autofix");
        match *self {
            Autofix::AddExposedWindow { node } => {
                let exposed = ExtAttr {
                    name: "Exposed".to_string(),
                    rhs: Some(ExtAttrRhs::Identifier("Window".to_string())),
                    arguments: None,
                };
                arena.get_mut(node).ext_attrs.insert(0, exposed);
            }
            Autofix::ReplaceVoid { node } => {
                if let Some(ty) = arena.get_mut(node).idl_type.as_mut()
                    && ty.is_void()
                {
                    ty.body = TypeBody::Named("undefined".to_string());
                }
            }
            Autofix::ConstructorMember { node } => {
                let attrs = std::mem::take(&mut arena.get_mut(node).ext_attrs);
                let (legacy, kept): (Vec<ExtAttr>, Vec<ExtAttr>) =
                    attrs.into_iter().partition(|ea| ea.name == "Constructor");
                arena.get_mut(node).ext_attrs = kept;
                let constructors: Vec<NodeId> = legacy
                    .into_iter()
                    .map(|ea| {
                        let mut ctor = IdlNode::new(NodeKind::Constructor);
                        ctor.arguments = ea.arguments.unwrap_or_default();
                        arena.alloc(ctor)
                    })
                    .collect();
                let members = &mut arena.get_mut(node).members;
                let rest = std::mem::take(members);
                *members = constructors.into_iter().chain(rest).collect();
            }
            Autofix::MakeArgumentOptional { node, argument } => {
                if let Some(arg) = arena.get_mut(node).arguments.get_mut(argument) {
                    arg.optional = true;
                    arg.variadic = false;
                    arg.default = Some(DefaultValue::EmptyDictionary);
                }
            }
            Autofix::AddDictionaryDefault { node, argument } => {
                if let Some(arg) = arena.get_mut(node).arguments.get_mut(argument) {
                    arg.default = Some(DefaultValue::EmptyDictionary);
                }
            }
        }
    }
}
