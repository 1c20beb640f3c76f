//! Markup compiler for IDL blocks.
//!
//! Every `pre.idl` block is parsed, re-written through [`MarkupWriter`] so
//! each token becomes document markup, and then post-processed: definition
//! wrappers get `data-dfn-for` and the surrounding citation context is made
//! to include the IDL vocabulary.

pub mod citation;
pub use citation::normalize_citation;

pub mod compiler;
pub use compiler::{CompiledBlock, MarkupCompiler};

pub mod markup;
pub use markup::{MarkupWriter, definition_class};

#[cfg(test)]
#[path = "../tests/compiler_tests.rs"]
mod compiler_tests;

#[cfg(test)]
#[path = "../tests/markup_tests.rs"]
mod markup_tests;
