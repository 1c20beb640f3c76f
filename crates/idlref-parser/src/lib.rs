//! WebIDL front end for idlref.
//!
//! - `lexer` - tokens over a block's text
//! - `parser` - recursive descent into an [`IdlArena`]
//! - `writer` - canonical re-serialisation through the [`Templates`] hooks

pub mod ast;
pub use ast::{
    Argument, DefaultValue, ExtAttr, ExtAttrRhs, IdlArena, IdlNode, IdlType, NodeId, NodeKind,
    Special, TextSpan, TypeBody,
};

pub mod error;
pub use error::SyntaxError;

pub mod lexer;

pub mod parser;
pub use parser::parse;

pub mod writer;
pub use writer::{PlainText, RefContext, Templates, write, write_type, write_with};

#[cfg(test)]
#[path = "../tests/lexer_tests.rs"]
mod lexer_tests;

#[cfg(test)]
#[path = "../tests/parser_tests.rs"]
mod parser_tests;

#[cfg(test)]
#[path = "../tests/writer_tests.rs"]
mod writer_tests;
