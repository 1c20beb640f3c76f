//! Canonical IDL writer.
//!
//! The writer walks definitions in source order and reports every token to a
//! [`Templates`] implementation. [`PlainText`] collects the canonical text;
//! the markup compiler supplies its own implementation to build elements.

use crate::ast::{
    Argument, ExtAttr, ExtAttrRhs, IdlArena, IdlNode, IdlType, NodeId, NodeKind, Special,
    TypeBody,
};

const INDENT: &str = "  ";

/// Where a type name is referenced from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefContext<'a> {
    Type,
    /// An identifier on the right-hand side of the named extended attribute.
    ExtendedAttribute(&'a str),
}

/// Token sink for [`write_with`]. Every hook defaults to emitting plain text.
pub trait Templates {
    /// Punctuation, whitespace and literal values.
    fn text(&mut self, text: &str);

    fn keyword(&mut self, keyword: &str) {
        self.text(keyword);
    }

    /// Name of a generic type or collection keyword (`sequence`, `Promise`).
    fn generic(&mut self, name: &str) {
        self.text(name);
    }

    fn reference(&mut self, name: &str, context: RefContext<'_>) {
        let _ = context;
        self.text(name);
    }

    /// The token that names `node`. Nameless members pass their keyword.
    fn name(&mut self, text: &str, node: NodeId, parent: Option<NodeId>) {
        let _ = (node, parent);
        self.text(text);
    }

    fn argument_name(&mut self, name: &str) {
        self.text(name);
    }

    fn enter_definition(&mut self, node: NodeId, parent: Option<NodeId>) {
        let _ = (node, parent);
    }

    fn exit_definition(&mut self, node: NodeId) {
        let _ = node;
    }

    fn enter_extended_attributes(&mut self) {}

    fn exit_extended_attributes(&mut self) {}

    fn extended_attribute_name(&mut self, name: &str) {
        self.text(name);
    }
}

/// Collects canonical IDL text.
#[derive(Debug, Default)]
pub struct PlainText {
    pub out: String,
}

impl Templates for PlainText {
    fn text(&mut self, text: &str) {
        self.out.push_str(text);
    }
}

/// Canonical text of `definitions`, separated by blank lines.
#[must_use]
pub fn write(arena: &IdlArena, definitions: &[NodeId]) -> String {
    let mut sink = PlainText::default();
    write_with(arena, definitions, &mut sink);
    sink.out
}

/// Canonical text of a single type, e.g. `sequence<long>?`.
#[must_use]
pub fn write_type(ty: &IdlType) -> String {
    let arena = IdlArena::new();
    let mut sink = PlainText::default();
    Writer {
        arena: &arena,
        t: &mut sink,
    }
    .idl_type(ty);
    sink.out
}

pub fn write_with<T: Templates + ?Sized>(arena: &IdlArena, definitions: &[NodeId], templates: &mut T) {
    let mut writer = Writer { arena, t: templates };
    for (i, &id) in definitions.iter().enumerate() {
        if i > 0 {
            writer.t.text("\n\n");
        }
        writer.definition(id);
    }
}

struct Writer<'a, T: ?Sized> {
    arena: &'a IdlArena,
    t: &'a mut T,
}

impl<'a, T: Templates + ?Sized> Writer<'a, T> {
    fn node(&self, id: NodeId) -> &'a IdlNode {
        self.arena.get(id)
    }

    fn definition(&mut self, id: NodeId) {
        let node = self.node(id);
        self.t.enter_definition(id, None);
        if !node.ext_attrs.is_empty() {
            self.ext_attrs(&node.ext_attrs);
            self.t.text("\n");
        }
        match node.kind {
            NodeKind::Interface
            | NodeKind::InterfaceMixin
            | NodeKind::CallbackInterface
            | NodeKind::Namespace
            | NodeKind::Dictionary => self.container(id, node),
            NodeKind::Callback => {
                self.t.keyword("callback");
                self.t.text(" ");
                self.t.name(node.name_str(), id, None);
                self.t.text(" = ");
                if let Some(ty) = &node.idl_type {
                    self.idl_type(ty);
                }
                self.t.text(" ");
                self.arguments(&node.arguments);
                self.t.text(";");
            }
            NodeKind::Enum => self.enumeration(id, node),
            NodeKind::Typedef => {
                self.t.keyword("typedef");
                self.t.text(" ");
                if let Some(ty) = &node.idl_type {
                    self.idl_type(ty);
                }
                self.t.text(" ");
                self.t.name(node.name_str(), id, None);
                self.t.text(";");
            }
            NodeKind::Includes => {
                self.t
                    .reference(node.target.as_deref().unwrap_or_default(), RefContext::Type);
                self.t.text(" ");
                self.t.keyword("includes");
                self.t.text(" ");
                self.t
                    .reference(node.mixin.as_deref().unwrap_or_default(), RefContext::Type);
                self.t.text(";");
            }
            _ => self.member(id, None),
        }
        self.t.exit_definition(id);
    }

    fn container(&mut self, id: NodeId, node: &IdlNode) {
        if node.partial {
            self.t.keyword("partial");
            self.t.text(" ");
        }
        let keyword = match node.kind {
            NodeKind::InterfaceMixin => "interface mixin",
            NodeKind::CallbackInterface => "callback interface",
            NodeKind::Namespace => "namespace",
            NodeKind::Dictionary => "dictionary",
            _ => "interface",
        };
        self.t.keyword(keyword);
        self.t.text(" ");
        self.t.name(node.name_str(), id, None);
        if let Some(base) = &node.inheritance {
            self.t.text(" : ");
            self.t.reference(base, RefContext::Type);
        }
        if node.members.is_empty() {
            self.t.text(" {};");
            return;
        }
        self.t.text(" {\n");
        for &member in &node.members {
            self.t.text(INDENT);
            self.t.enter_definition(member, Some(id));
            let member_node = self.node(member);
            if !member_node.ext_attrs.is_empty() {
                self.ext_attrs(&member_node.ext_attrs);
                self.t.text(" ");
            }
            self.member(member, Some(id));
            self.t.exit_definition(member);
            self.t.text("\n");
        }
        self.t.text("};");
    }

    fn enumeration(&mut self, id: NodeId, node: &IdlNode) {
        self.t.keyword("enum");
        self.t.text(" ");
        self.t.name(node.name_str(), id, None);
        self.t.text(" {\n");
        let last = node.members.len().saturating_sub(1);
        for (i, &value_id) in node.members.iter().enumerate() {
            let value = self.node(value_id).value.as_deref().unwrap_or_default();
            self.t.text(INDENT);
            self.t.enter_definition(value_id, Some(id));
            self.t.text("\"");
            self.t.name(value, value_id, Some(id));
            self.t.text("\"");
            self.t.exit_definition(value_id);
            self.t.text(if i < last { ",\n" } else { "\n" });
        }
        self.t.text("};");
    }

    fn member(&mut self, id: NodeId, parent: Option<NodeId>) {
        let node = self.node(id);
        match node.kind {
            NodeKind::Const => {
                self.t.keyword("const");
                self.t.text(" ");
                if let Some(ty) = &node.idl_type {
                    self.idl_type(ty);
                }
                self.t.text(" ");
                self.t.name(node.name_str(), id, parent);
                self.t.text(" = ");
                if let Some(value) = &node.default {
                    self.t.text(&value.to_string());
                }
            }
            NodeKind::Attribute => {
                if let Some(special) = node.special {
                    self.t.keyword(special.as_str());
                    self.t.text(" ");
                }
                if node.inherit {
                    self.t.keyword("inherit");
                    self.t.text(" ");
                }
                if node.readonly {
                    self.t.keyword("readonly");
                    self.t.text(" ");
                }
                self.t.keyword("attribute");
                self.t.text(" ");
                if let Some(ty) = &node.idl_type {
                    self.idl_type(ty);
                }
                self.t.text(" ");
                self.t.name(node.name_str(), id, parent);
            }
            NodeKind::Operation => self.operation(id, node, parent),
            NodeKind::Constructor => {
                self.t.name("constructor", id, parent);
                self.arguments(&node.arguments);
            }
            NodeKind::Iterable
            | NodeKind::AsyncIterable
            | NodeKind::Maplike
            | NodeKind::Setlike => {
                if node.readonly {
                    self.t.keyword("readonly");
                    self.t.text(" ");
                }
                let keyword = match node.kind {
                    NodeKind::AsyncIterable => "async iterable",
                    NodeKind::Maplike => "maplike",
                    NodeKind::Setlike => "setlike",
                    _ => "iterable",
                };
                self.t.name(keyword, id, parent);
                self.t.text("<");
                self.type_list(&node.type_args);
                self.t.text(">");
                if !node.arguments.is_empty() {
                    self.arguments(&node.arguments);
                }
            }
            NodeKind::Field => {
                if node.required {
                    self.t.keyword("required");
                    self.t.text(" ");
                }
                if let Some(ty) = &node.idl_type {
                    self.idl_type(ty);
                }
                self.t.text(" ");
                self.t.name(node.name_str(), id, parent);
                if let Some(value) = &node.default {
                    self.t.text(" = ");
                    self.t.text(&value.to_string());
                }
            }
            _ => {}
        }
        self.t.text(";");
    }

    fn operation(&mut self, id: NodeId, node: &IdlNode, parent: Option<NodeId>) {
        match (&node.name, node.special) {
            (None, Some(Special::Stringifier)) if node.idl_type.is_none() => {
                self.t.name(Special::Stringifier.as_str(), id, parent);
            }
            (None, Some(special)) => {
                self.t.name(special.as_str(), id, parent);
                self.t.text(" ");
                if let Some(ty) = &node.idl_type {
                    self.idl_type(ty);
                }
                self.t.text(" ");
                self.arguments(&node.arguments);
            }
            (name, special) => {
                if let Some(special) = special {
                    self.t.keyword(special.as_str());
                    self.t.text(" ");
                }
                if let Some(ty) = &node.idl_type {
                    self.idl_type(ty);
                }
                self.t.text(" ");
                self.t.name(name.as_deref().unwrap_or_default(), id, parent);
                self.arguments(&node.arguments);
            }
        }
    }

    fn arguments(&mut self, arguments: &[Argument]) {
        self.t.text("(");
        for (i, arg) in arguments.iter().enumerate() {
            if i > 0 {
                self.t.text(", ");
            }
            if !arg.ext_attrs.is_empty() {
                self.ext_attrs(&arg.ext_attrs);
                self.t.text(" ");
            }
            if arg.optional {
                self.t.keyword("optional");
                self.t.text(" ");
            }
            self.idl_type(&arg.idl_type);
            if arg.variadic {
                self.t.text("...");
            }
            self.t.text(" ");
            self.t.argument_name(&arg.name);
            if let Some(value) = &arg.default {
                self.t.text(" = ");
                self.t.text(&value.to_string());
            }
        }
        self.t.text(")");
    }

    fn type_list(&mut self, types: &[IdlType]) {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                self.t.text(", ");
            }
            self.idl_type(ty);
        }
    }

    fn idl_type(&mut self, ty: &IdlType) {
        if !ty.ext_attrs.is_empty() {
            self.ext_attrs(&ty.ext_attrs);
            self.t.text(" ");
        }
        match &ty.body {
            TypeBody::Named(name) => self.t.reference(name, RefContext::Type),
            TypeBody::Generic { name, args } => {
                self.t.generic(name);
                self.t.text("<");
                self.type_list(args);
                self.t.text(">");
            }
            TypeBody::Union(members) => {
                self.t.text("(");
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        self.t.text(" or ");
                    }
                    self.idl_type(member);
                }
                self.t.text(")");
            }
        }
        if ty.nullable {
            self.t.text("?");
        }
    }

    fn ext_attrs(&mut self, list: &[ExtAttr]) {
        self.t.enter_extended_attributes();
        self.t.text("[");
        for (i, attr) in list.iter().enumerate() {
            if i > 0 {
                self.t.text(", ");
            }
            self.t.extended_attribute_name(&attr.name);
            let context = RefContext::ExtendedAttribute(&attr.name);
            match &attr.rhs {
                None => {}
                Some(ExtAttrRhs::Identifier(ident)) => {
                    self.t.text("=");
                    self.t.reference(ident, context);
                }
                Some(ExtAttrRhs::IdentifierList(idents)) => {
                    self.t.text("=(");
                    for (j, ident) in idents.iter().enumerate() {
                        if j > 0 {
                            self.t.text(",");
                        }
                        self.t.reference(ident, context);
                    }
                    self.t.text(")");
                }
                Some(ExtAttrRhs::String(s)) => self.t.text(&format!("=\"{s}\"")),
                Some(ExtAttrRhs::StringList(items)) => {
                    let quoted: Vec<String> = items.iter().map(|s| format!("\"{s}\"")).collect();
                    self.t.text(&format!("=({})", quoted.join(",")));
                }
                Some(ExtAttrRhs::Integer(raw) | ExtAttrRhs::Decimal(raw)) => {
                    self.t.text(&format!("={raw}"));
                }
                Some(ExtAttrRhs::Wildcard) => self.t.text("=*"),
            }
            if let Some(args) = &attr.arguments {
                self.arguments(args);
            }
        }
        self.t.text("]");
        self.t.exit_extended_attributes();
    }
}
