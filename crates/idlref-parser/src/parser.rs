//! Recursive-descent IDL parser.
//!
//! Definitions and members are allocated into the caller's [`IdlArena`] as
//! they complete. A failed parse leaves already-allocated nodes unreachable;
//! nothing outside the returned definition list refers to them.

use tracing::trace;

use crate::ast::{
    Argument, DefaultValue, ExtAttr, ExtAttrRhs, IdlArena, IdlNode, IdlType, NodeId, NodeKind,
    Special, TextSpan, TypeBody,
};
use crate::error::SyntaxError;
use crate::lexer::{Token, TokenKind, tokenize};

/// Type names that take `<...>` arguments.
pub const GENERIC_TYPES: &[&str] = &[
    "sequence",
    "async_sequence",
    "FrozenArray",
    "ObservableArray",
    "Promise",
    "record",
];

/// Parse `source` into top-level definitions.
pub fn parse(source: &str, arena: &mut IdlArena) -> Result<Vec<NodeId>, SyntaxError> {
    let tokens = tokenize(source).map_err(|e| SyntaxError::at(source, e.offset, e.message))?;
    let mut parser = ParserState {
        tokens,
        pos: 0,
        last_end: 0,
        arena,
    };
    let definitions = parser
        .parse_definitions()
        .map_err(|e| SyntaxError::at(source, e.offset, e.message))?;
    trace!(count = definitions.len(), "parsed IDL block");
    Ok(definitions)
}

struct ParseFailure {
    offset: u32,
    message: String,
}

type PResult<T> = Result<T, ParseFailure>;

struct ParserState<'src, 'arena> {
    tokens: Vec<Token<'src>>,
    pos: usize,
    last_end: u32,
    arena: &'arena mut IdlArena,
}

impl<'src> ParserState<'src, '_> {
    // =========================================================================
    // Token helpers
    // =========================================================================

    fn peek(&self) -> Token<'src> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Token<'src> {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        self.tokens[idx]
    }

    fn advance(&mut self) -> Token<'src> {
        let tok = self.peek();
        if tok.kind != TokenKind::EndOfFile {
            self.pos += 1;
            self.last_end = tok.start + tok.text.len() as u32;
        }
        tok
    }

    fn is_ident(&self, text: &str) -> bool {
        let tok = self.peek();
        tok.kind == TokenKind::Identifier && tok.text == text
    }

    fn is_punct(&self, text: &str) -> bool {
        let tok = self.peek();
        tok.kind == TokenKind::Punct && tok.text == text
    }

    fn eat_ident(&mut self, text: &str) -> bool {
        if self.is_ident(text) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_punct(&mut self, text: &str) -> bool {
        if self.is_punct(text) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_punct(&mut self, text: &str) -> PResult<()> {
        if self.eat_punct(text) {
            Ok(())
        } else {
            Err(self.fail(&format!("`{text}`")))
        }
    }

    fn expect_ident(&mut self, text: &str) -> PResult<()> {
        if self.eat_ident(text) {
            Ok(())
        } else {
            Err(self.fail(&format!("`{text}`")))
        }
    }

    /// Consume an identifier, dropping the escaping underscore.
    fn identifier(&mut self, what: &str) -> PResult<String> {
        let tok = self.peek();
        if tok.kind != TokenKind::Identifier || tok.text == "-Infinity" {
            return Err(self.fail(what));
        }
        self.advance();
        Ok(tok.text.strip_prefix('_').unwrap_or(tok.text).to_string())
    }

    fn fail(&self, expected: &str) -> ParseFailure {
        let tok = self.peek();
        let message = if tok.kind == TokenKind::EndOfFile {
            format!("Unexpected end of input, expected {expected}")
        } else {
            format!("Unexpected `{}`, expected {expected}", tok.text)
        };
        ParseFailure {
            offset: tok.start,
            message,
        }
    }

    fn finish(&mut self, mut node: IdlNode, start: u32, ext_attrs: Vec<ExtAttr>) -> NodeId {
        node.ext_attrs = ext_attrs;
        node.span = TextSpan {
            start,
            end: self.last_end,
        };
        self.arena.alloc(node)
    }

    // =========================================================================
    // Definitions
    // =========================================================================

    fn parse_definitions(&mut self) -> PResult<Vec<NodeId>> {
        let mut definitions = Vec::new();
        while self.peek().kind != TokenKind::EndOfFile {
            let start = self.peek().start;
            let ext_attrs = self.parse_ext_attr_list()?;
            let node = self.parse_definition()?;
            definitions.push(self.finish(node, start, ext_attrs));
        }
        Ok(definitions)
    }

    fn parse_definition(&mut self) -> PResult<IdlNode> {
        if self.eat_ident("callback") {
            if self.eat_ident("interface") {
                return self.parse_container(NodeKind::CallbackInterface, false);
            }
            return self.parse_callback();
        }
        if self.eat_ident("interface") {
            if self.eat_ident("mixin") {
                return self.parse_container(NodeKind::InterfaceMixin, false);
            }
            return self.parse_container(NodeKind::Interface, false);
        }
        if self.eat_ident("partial") {
            if self.eat_ident("interface") {
                if self.eat_ident("mixin") {
                    return self.parse_container(NodeKind::InterfaceMixin, true);
                }
                return self.parse_container(NodeKind::Interface, true);
            }
            if self.eat_ident("dictionary") {
                return self.parse_container(NodeKind::Dictionary, true);
            }
            if self.eat_ident("namespace") {
                return self.parse_container(NodeKind::Namespace, true);
            }
            return Err(self.fail("`interface`, `dictionary` or `namespace` after `partial`"));
        }
        if self.eat_ident("dictionary") {
            return self.parse_container(NodeKind::Dictionary, false);
        }
        if self.eat_ident("namespace") {
            return self.parse_container(NodeKind::Namespace, false);
        }
        if self.eat_ident("enum") {
            return self.parse_enum();
        }
        if self.eat_ident("typedef") {
            let ty = self.parse_type_with_ext_attrs()?;
            let name = self.identifier("a typedef name")?;
            self.expect_punct(";")?;
            let mut node = IdlNode::new(NodeKind::Typedef).with_name(name);
            node.idl_type = Some(ty);
            return Ok(node);
        }
        if self.peek().kind == TokenKind::Identifier {
            let next = self.peek_at(1);
            if next.kind == TokenKind::Identifier && next.text == "includes" {
                let target = self.identifier("an interface name")?;
                self.advance();
                let mixin = self.identifier("a mixin name")?;
                self.expect_punct(";")?;
                let mut node = IdlNode::new(NodeKind::Includes);
                node.target = Some(target);
                node.mixin = Some(mixin);
                return Ok(node);
            }
        }
        Err(self.fail("a definition"))
    }

    /// `interface`, `interface mixin`, `callback interface`, `namespace` and
    /// `dictionary` share the `Name [: Base] { members };` shape.
    fn parse_container(&mut self, kind: NodeKind, partial: bool) -> PResult<IdlNode> {
        let name = self.identifier(&format!("a {} name", kind.as_str()))?;
        let mut node = IdlNode::new(kind).with_name(name);
        node.partial = partial;
        if matches!(kind, NodeKind::Interface | NodeKind::Dictionary) && self.eat_punct(":") {
            node.inheritance = Some(self.identifier("a base name")?);
        }
        self.expect_punct("{")?;
        while !self.eat_punct("}") {
            let start = self.peek().start;
            let ext_attrs = self.parse_ext_attr_list()?;
            let member = if kind == NodeKind::Dictionary {
                self.parse_field()?
            } else {
                self.parse_member()?
            };
            let id = self.finish(member, start, ext_attrs);
            node.members.push(id);
        }
        self.expect_punct(";")?;
        Ok(node)
    }

    fn parse_callback(&mut self) -> PResult<IdlNode> {
        let name = self.identifier("a callback name")?;
        self.expect_punct("=")?;
        let return_type = self.parse_type()?;
        let arguments = self.parse_arguments()?;
        self.expect_punct(";")?;
        let mut node = IdlNode::new(NodeKind::Callback).with_name(name);
        node.idl_type = Some(return_type);
        node.arguments = arguments;
        Ok(node)
    }

    fn parse_enum(&mut self) -> PResult<IdlNode> {
        let name = self.identifier("an enum name")?;
        let mut node = IdlNode::new(NodeKind::Enum).with_name(name);
        self.expect_punct("{")?;
        loop {
            let tok = self.peek();
            if tok.kind != TokenKind::String {
                if node.members.is_empty() || !self.is_punct("}") {
                    return Err(self.fail("an enum value string"));
                }
                break;
            }
            self.advance();
            let mut value = IdlNode::new(NodeKind::EnumValue);
            value.value = Some(unquote(tok.text).to_string());
            value.span = TextSpan {
                start: tok.start,
                end: self.last_end,
            };
            node.members.push(self.arena.alloc(value));
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct("}")?;
        self.expect_punct(";")?;
        Ok(node)
    }

    // =========================================================================
    // Members
    // =========================================================================

    fn parse_member(&mut self) -> PResult<IdlNode> {
        if self.eat_ident("const") {
            let ty = self.parse_type()?;
            let name = self.identifier("a constant name")?;
            self.expect_punct("=")?;
            let value = self.parse_default_value()?;
            self.expect_punct(";")?;
            let mut node = IdlNode::new(NodeKind::Const).with_name(name);
            node.idl_type = Some(ty);
            node.default = Some(value);
            return Ok(node);
        }
        if self.eat_ident("constructor") {
            let mut node = IdlNode::new(NodeKind::Constructor);
            node.arguments = self.parse_arguments()?;
            self.expect_punct(";")?;
            return Ok(node);
        }
        if self.eat_ident("stringifier") {
            if self.eat_punct(";") {
                let mut node = IdlNode::new(NodeKind::Operation);
                node.special = Some(Special::Stringifier);
                return Ok(node);
            }
            if self.is_ident("readonly") || self.is_ident("attribute") {
                return self.parse_attribute(Some(Special::Stringifier), false);
            }
            return self.parse_operation(Some(Special::Stringifier));
        }
        if self.eat_ident("static") {
            if self.is_ident("readonly") || self.is_ident("attribute") {
                return self.parse_attribute(Some(Special::Static), false);
            }
            return self.parse_operation(Some(Special::Static));
        }
        if self.eat_ident("inherit") {
            return self.parse_attribute(None, true);
        }
        if self.is_ident("readonly") {
            let next = self.peek_at(1);
            if next.kind == TokenKind::Identifier && matches!(next.text, "maplike" | "setlike") {
                self.advance();
                let mut node = self.parse_keyword_member()?;
                node.readonly = true;
                return Ok(node);
            }
            return self.parse_attribute(None, false);
        }
        if self.is_ident("attribute") {
            return self.parse_attribute(None, false);
        }
        if self.is_ident("iterable")
            || self.is_ident("async")
            || self.is_ident("async_iterable")
            || self.is_ident("maplike")
            || self.is_ident("setlike")
        {
            return self.parse_keyword_member();
        }
        for (keyword, special) in [
            ("getter", Special::Getter),
            ("setter", Special::Setter),
            ("deleter", Special::Deleter),
        ] {
            if self.eat_ident(keyword) {
                return self.parse_operation(Some(special));
            }
        }
        self.parse_operation(None)
    }

    fn parse_attribute(&mut self, special: Option<Special>, inherit: bool) -> PResult<IdlNode> {
        let readonly = self.eat_ident("readonly");
        self.expect_ident("attribute")?;
        let ty = self.parse_type_with_ext_attrs()?;
        let name = self.identifier("an attribute name")?;
        self.expect_punct(";")?;
        let mut node = IdlNode::new(NodeKind::Attribute).with_name(name);
        node.special = special;
        node.readonly = readonly;
        node.inherit = inherit;
        node.idl_type = Some(ty);
        Ok(node)
    }

    fn parse_operation(&mut self, special: Option<Special>) -> PResult<IdlNode> {
        let return_type = self.parse_type()?;
        let name = if self.peek().kind == TokenKind::Identifier {
            Some(self.identifier("an operation name")?)
        } else {
            None
        };
        if name.is_none() && !matches!(special, Some(s) if s != Special::Static) {
            return Err(self.fail("an operation name"));
        }
        let arguments = self.parse_arguments()?;
        self.expect_punct(";")?;
        let mut node = IdlNode::new(NodeKind::Operation);
        node.name = name;
        node.special = special;
        node.idl_type = Some(return_type);
        node.arguments = arguments;
        Ok(node)
    }

    /// `iterable<...>`, `async iterable<...>(...)`, `maplike<...>`, `setlike<...>`.
    fn parse_keyword_member(&mut self) -> PResult<IdlNode> {
        let (kind, arity) = if self.eat_ident("iterable") {
            (NodeKind::Iterable, 1..=2)
        } else if self.eat_ident("async_iterable") {
            (NodeKind::AsyncIterable, 1..=2)
        } else if self.eat_ident("async") {
            self.expect_ident("iterable")?;
            (NodeKind::AsyncIterable, 1..=2)
        } else if self.eat_ident("maplike") {
            (NodeKind::Maplike, 2..=2)
        } else if self.eat_ident("setlike") {
            (NodeKind::Setlike, 1..=1)
        } else {
            return Err(self.fail("`iterable`, `maplike` or `setlike`"));
        };
        let start = self.peek().start;
        let type_args = self.parse_type_arguments()?;
        if !arity.contains(&type_args.len()) {
            return Err(ParseFailure {
                offset: start,
                message: format!(
                    "`{}` takes {} type argument(s), found {}",
                    kind.as_str(),
                    if arity.start() == arity.end() {
                        arity.start().to_string()
                    } else {
                        format!("{} or {}", arity.start(), arity.end())
                    },
                    type_args.len()
                ),
            });
        }
        let mut node = IdlNode::new(kind);
        node.type_args = type_args;
        if kind == NodeKind::AsyncIterable && self.is_punct("(") {
            node.arguments = self.parse_arguments()?;
        }
        self.expect_punct(";")?;
        Ok(node)
    }

    fn parse_field(&mut self) -> PResult<IdlNode> {
        let required = self.eat_ident("required");
        let ty = self.parse_type_with_ext_attrs()?;
        let name = self.identifier("a dictionary member name")?;
        let default = if self.eat_punct("=") {
            Some(self.parse_default_value()?)
        } else {
            None
        };
        self.expect_punct(";")?;
        let mut node = IdlNode::new(NodeKind::Field).with_name(name);
        node.required = required;
        node.idl_type = Some(ty);
        node.default = default;
        Ok(node)
    }

    // =========================================================================
    // Arguments, values, extended attributes
    // =========================================================================

    fn parse_arguments(&mut self) -> PResult<Vec<Argument>> {
        self.expect_punct("(")?;
        let mut arguments = Vec::new();
        if self.eat_punct(")") {
            return Ok(arguments);
        }
        loop {
            arguments.push(self.parse_argument()?);
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct(")")?;
        Ok(arguments)
    }

    fn parse_argument(&mut self) -> PResult<Argument> {
        let ext_attrs = self.parse_ext_attr_list()?;
        let optional = self.eat_ident("optional");
        let idl_type = self.parse_type_with_ext_attrs()?;
        let variadic = !optional && self.eat_punct("...");
        let name = self.identifier("an argument name")?;
        let default = if optional && self.eat_punct("=") {
            Some(self.parse_default_value()?)
        } else {
            None
        };
        Ok(Argument {
            name,
            idl_type,
            optional,
            variadic,
            default,
            ext_attrs,
        })
    }

    fn parse_default_value(&mut self) -> PResult<DefaultValue> {
        let tok = self.peek();
        let value = match (tok.kind, tok.text) {
            (TokenKind::Identifier, "true") => DefaultValue::Boolean(true),
            (TokenKind::Identifier, "false") => DefaultValue::Boolean(false),
            (TokenKind::Identifier, "null") => DefaultValue::Null,
            (TokenKind::Identifier, "NaN") => DefaultValue::NaN,
            (TokenKind::Identifier, "Infinity") => DefaultValue::Infinity { negative: false },
            (TokenKind::Identifier, "-Infinity") => DefaultValue::Infinity { negative: true },
            (TokenKind::Integer | TokenKind::Decimal, raw) => DefaultValue::Number(raw.to_string()),
            (TokenKind::String, raw) => DefaultValue::String(unquote(raw).to_string()),
            (TokenKind::Punct, "[") => {
                self.advance();
                self.expect_punct("]")?;
                return Ok(DefaultValue::EmptySequence);
            }
            (TokenKind::Punct, "{") => {
                self.advance();
                self.expect_punct("}")?;
                return Ok(DefaultValue::EmptyDictionary);
            }
            _ => return Err(self.fail("a default value")),
        };
        self.advance();
        Ok(value)
    }

    fn parse_ext_attr_list(&mut self) -> PResult<Vec<ExtAttr>> {
        let mut list = Vec::new();
        if !self.eat_punct("[") {
            return Ok(list);
        }
        loop {
            list.push(self.parse_ext_attr()?);
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct("]")?;
        Ok(list)
    }

    fn parse_ext_attr(&mut self) -> PResult<ExtAttr> {
        let name = self.identifier("an extended attribute name")?;
        let mut rhs = None;
        if self.eat_punct("=") {
            let tok = self.peek();
            rhs = Some(match tok.kind {
                TokenKind::Punct if tok.text == "(" => {
                    self.advance();
                    self.parse_ext_attr_list_rhs()?
                }
                TokenKind::Punct if tok.text == "*" => {
                    self.advance();
                    ExtAttrRhs::Wildcard
                }
                TokenKind::String => {
                    self.advance();
                    ExtAttrRhs::String(unquote(tok.text).to_string())
                }
                TokenKind::Integer => {
                    self.advance();
                    ExtAttrRhs::Integer(tok.text.to_string())
                }
                TokenKind::Decimal => {
                    self.advance();
                    ExtAttrRhs::Decimal(tok.text.to_string())
                }
                _ => ExtAttrRhs::Identifier(self.identifier("an extended attribute value")?),
            });
        }
        let arguments = if self.is_punct("(")
            && matches!(rhs, None | Some(ExtAttrRhs::Identifier(_)))
        {
            Some(self.parse_arguments()?)
        } else {
            None
        };
        Ok(ExtAttr {
            name,
            rhs,
            arguments,
        })
    }

    fn parse_ext_attr_list_rhs(&mut self) -> PResult<ExtAttrRhs> {
        let strings = self.peek().kind == TokenKind::String;
        let mut items = Vec::new();
        loop {
            if strings {
                let tok = self.peek();
                if tok.kind != TokenKind::String {
                    return Err(self.fail("a string"));
                }
                self.advance();
                items.push(unquote(tok.text).to_string());
            } else {
                items.push(self.identifier("an identifier")?);
            }
            if !self.eat_punct(",") {
                break;
            }
        }
        self.expect_punct(")")?;
        Ok(if strings {
            ExtAttrRhs::StringList(items)
        } else {
            ExtAttrRhs::IdentifierList(items)
        })
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn parse_type_with_ext_attrs(&mut self) -> PResult<IdlType> {
        let ext_attrs = self.parse_ext_attr_list()?;
        let mut ty = self.parse_type()?;
        ty.ext_attrs = ext_attrs;
        Ok(ty)
    }

    fn parse_type(&mut self) -> PResult<IdlType> {
        let body = if self.eat_punct("(") {
            let start = self.last_end;
            let mut members = vec![self.parse_type_with_ext_attrs()?];
            while self.eat_ident("or") {
                members.push(self.parse_type_with_ext_attrs()?);
            }
            if members.len() < 2 {
                return Err(ParseFailure {
                    offset: start,
                    message: "A union type needs at least two member types".to_string(),
                });
            }
            self.expect_punct(")")?;
            TypeBody::Union(members)
        } else {
            let tok = self.peek();
            if tok.kind != TokenKind::Identifier {
                return Err(self.fail("a type"));
            }
            let next = self.peek_at(1);
            if GENERIC_TYPES.contains(&tok.text) && next.kind == TokenKind::Punct && next.text == "<"
            {
                self.advance();
                TypeBody::Generic {
                    name: tok.text.to_string(),
                    args: self.parse_type_arguments()?,
                }
            } else {
                TypeBody::Named(self.parse_type_name()?)
            }
        };
        let nullable = self.eat_punct("?");
        Ok(IdlType {
            body,
            nullable,
            ext_attrs: Vec::new(),
        })
    }

    fn parse_type_arguments(&mut self) -> PResult<Vec<IdlType>> {
        self.expect_punct("<")?;
        let mut args = vec![self.parse_type_with_ext_attrs()?];
        while self.eat_punct(",") {
            args.push(self.parse_type_with_ext_attrs()?);
        }
        self.expect_punct(">")?;
        Ok(args)
    }

    /// Builtin names may span several keywords (`unsigned long long`).
    fn parse_type_name(&mut self) -> PResult<String> {
        if self.eat_ident("unsigned") {
            if self.eat_ident("short") {
                return Ok("unsigned short".to_string());
            }
            self.expect_ident("long")?;
            if self.eat_ident("long") {
                return Ok("unsigned long long".to_string());
            }
            return Ok("unsigned long".to_string());
        }
        if self.eat_ident("unrestricted") {
            if self.eat_ident("float") {
                return Ok("unrestricted float".to_string());
            }
            self.expect_ident("double")?;
            return Ok("unrestricted double".to_string());
        }
        if self.eat_ident("long") {
            if self.eat_ident("long") {
                return Ok("long long".to_string());
            }
            return Ok("long".to_string());
        }
        self.identifier("a type")
    }
}

fn unquote(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw)
}
