//! Arena-backed IDL syntax tree.
//!
//! Every definition-like construct (top-level definitions, members, enum
//! values) is an [`IdlNode`] stored in an [`IdlArena`] and addressed by
//! [`NodeId`]. Nodes do not store their parent: callers that need one pass it
//! along while walking, which keeps the arena append-only and lets later
//! passes key side tables on `NodeId` alone.

use std::fmt;

/// Index of a node in an [`IdlArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Closed set of construct kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Interface,
    InterfaceMixin,
    CallbackInterface,
    Callback,
    Namespace,
    Dictionary,
    Enum,
    EnumValue,
    Typedef,
    Includes,
    Operation,
    Constructor,
    Attribute,
    Const,
    Field,
    Iterable,
    AsyncIterable,
    Maplike,
    Setlike,
}

impl NodeKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            NodeKind::Interface => "interface",
            NodeKind::InterfaceMixin => "interface-mixin",
            NodeKind::CallbackInterface => "callback-interface",
            NodeKind::Callback => "callback",
            NodeKind::Namespace => "namespace",
            NodeKind::Dictionary => "dictionary",
            NodeKind::Enum => "enum",
            NodeKind::EnumValue => "enum-value",
            NodeKind::Typedef => "typedef",
            NodeKind::Includes => "includes-statement",
            NodeKind::Operation => "operation",
            NodeKind::Constructor => "constructor",
            NodeKind::Attribute => "attribute",
            NodeKind::Const => "const",
            NodeKind::Field => "field",
            NodeKind::Iterable => "iterable",
            NodeKind::AsyncIterable => "async-iterable",
            NodeKind::Maplike => "maplike",
            NodeKind::Setlike => "setlike",
        }
    }

    /// Kinds whose partial declarations are counted for anchor suffixes.
    pub const fn is_container(self) -> bool {
        matches!(
            self,
            NodeKind::Interface
                | NodeKind::InterfaceMixin
                | NodeKind::CallbackInterface
                | NodeKind::Dictionary
        )
    }

    /// Kinds that can be overloaded.
    pub const fn is_call_signature(self) -> bool {
        matches!(self, NodeKind::Operation | NodeKind::Constructor)
    }

    /// Member kinds introduced by a keyword rather than a name.
    pub const fn is_keyword_member(self) -> bool {
        matches!(
            self,
            NodeKind::Iterable | NodeKind::AsyncIterable | NodeKind::Maplike | NodeKind::Setlike
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation and attribute qualifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Special {
    Static,
    Stringifier,
    Getter,
    Setter,
    Deleter,
}

impl Special {
    pub const fn as_str(self) -> &'static str {
        match self {
            Special::Static => "static",
            Special::Stringifier => "stringifier",
            Special::Getter => "getter",
            Special::Setter => "setter",
            Special::Deleter => "deleter",
        }
    }
}

/// Byte range of a construct within its block's source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextSpan {
    pub start: u32,
    pub end: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypeBody {
    /// A builtin (`unsigned long`, `DOMString`, `undefined`) or a reference.
    Named(String),
    /// `sequence<T>`, `record<K, V>`, `Promise<T>`, `FrozenArray<T>`, ...
    Generic { name: String, args: Vec<IdlType> },
    Union(Vec<IdlType>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct IdlType {
    pub body: TypeBody,
    pub nullable: bool,
    pub ext_attrs: Vec<ExtAttr>,
}

impl IdlType {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            body: TypeBody::Named(name.into()),
            nullable: false,
            ext_attrs: Vec::new(),
        }
    }

    /// The referenced name for a plain named type.
    pub fn as_named(&self) -> Option<&str> {
        match &self.body {
            TypeBody::Named(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        self.as_named() == Some("void")
    }

    /// Every named type reachable from this one, in source order.
    pub fn referenced_names(&self) -> Vec<&str> {
        fn rec<'a>(ty: &'a IdlType, out: &mut Vec<&'a str>) {
            match &ty.body {
                TypeBody::Named(name) => out.push(name),
                TypeBody::Generic { args, .. } => args.iter().for_each(|a| rec(a, out)),
                TypeBody::Union(members) => members.iter().for_each(|m| rec(m, out)),
            }
        }
        let mut out = Vec::new();
        rec(self, &mut out);
        out
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DefaultValue {
    Boolean(bool),
    Null,
    /// Raw integer or decimal literal text.
    Number(String),
    Infinity { negative: bool },
    NaN,
    String(String),
    EmptySequence,
    EmptyDictionary,
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Boolean(b) => write!(f, "{b}"),
            DefaultValue::Null => f.write_str("null"),
            DefaultValue::Number(raw) => f.write_str(raw),
            DefaultValue::Infinity { negative: true } => f.write_str("-Infinity"),
            DefaultValue::Infinity { negative: false } => f.write_str("Infinity"),
            DefaultValue::NaN => f.write_str("NaN"),
            DefaultValue::String(s) => write!(f, "\"{s}\""),
            DefaultValue::EmptySequence => f.write_str("[]"),
            DefaultValue::EmptyDictionary => f.write_str("{}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Argument {
    pub name: String,
    pub idl_type: IdlType,
    pub optional: bool,
    pub variadic: bool,
    pub default: Option<DefaultValue>,
    pub ext_attrs: Vec<ExtAttr>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExtAttrRhs {
    Identifier(String),
    IdentifierList(Vec<String>),
    String(String),
    StringList(Vec<String>),
    Integer(String),
    Decimal(String),
    Wildcard,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExtAttr {
    pub name: String,
    pub rhs: Option<ExtAttrRhs>,
    /// `[Attr(args)]` or `[Attr=Name(args)]`.
    pub arguments: Option<Vec<Argument>>,
}

impl ExtAttr {
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rhs: None,
            arguments: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IdlNode {
    pub kind: NodeKind,
    /// Declared name; absent for constructors, anonymous special operations,
    /// keyword members, enum values and includes statements.
    pub name: Option<String>,
    pub partial: bool,
    pub special: Option<Special>,
    pub readonly: bool,
    pub inherit: bool,
    pub required: bool,
    /// `interface A : B` / `dictionary A : B`.
    pub inheritance: Option<String>,
    /// Attribute, field, const and typedef type; operation and callback
    /// return type.
    pub idl_type: Option<IdlType>,
    /// Type arguments of `iterable`, `maplike` and `setlike`.
    pub type_args: Vec<IdlType>,
    pub arguments: Vec<Argument>,
    pub ext_attrs: Vec<ExtAttr>,
    /// Interface members or enum values.
    pub members: Vec<NodeId>,
    /// Enum value text.
    pub value: Option<String>,
    /// Const value or field default.
    pub default: Option<DefaultValue>,
    /// `target includes mixin;`
    pub target: Option<String>,
    pub mixin: Option<String>,
    pub span: TextSpan,
}

impl IdlNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            name: None,
            partial: false,
            special: None,
            readonly: false,
            inherit: false,
            required: false,
            inheritance: None,
            idl_type: None,
            type_args: Vec::new(),
            arguments: Vec::new(),
            ext_attrs: Vec::new(),
            members: Vec::new(),
            value: None,
            default: None,
            target: None,
            mixin: None,
            span: TextSpan::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name_str(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    pub fn has_ext_attr(&self, name: &str) -> bool {
        self.ext_attrs.iter().any(|ea| ea.name == name)
    }
}

/// Storage for every node parsed during one processing run.
#[derive(Clone, Debug, Default)]
pub struct IdlArena {
    nodes: Vec<IdlNode>,
}

impl IdlArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, node: IdlNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &IdlNode {
        &self.nodes[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut IdlNode {
        &mut self.nodes[id.0 as usize]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn members(&self, id: NodeId) -> &[NodeId] {
        &self.get(id).members
    }
}
