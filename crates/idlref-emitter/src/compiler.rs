//! Block discovery and compilation.

use idlref_binder::{Decorator, DefinitionLinker, DefinitionRegistry};
use idlref_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use idlref_common::{Diagnostics, Document, Element, ElementId};
use idlref_parser::{IdlArena, NodeId, parse, write_with};
use tracing::{debug, warn};

use crate::citation::normalize_citation;
use crate::markup::MarkupWriter;

/// A block that parsed and was rendered.
#[derive(Clone, Debug)]
pub struct CompiledBlock {
    pub element: ElementId,
    /// Block text as it was before rendering.
    pub source: String,
    pub definitions: Vec<NodeId>,
}

pub struct MarkupCompiler<'a, R, D> {
    linker: &'a mut DefinitionLinker<R, D>,
    citation_id: &'a str,
}

impl<'a, R: DefinitionRegistry, D: Decorator> MarkupCompiler<'a, R, D> {
    pub fn new(linker: &'a mut DefinitionLinker<R, D>, citation_id: &'a str) -> Self {
        Self {
            linker,
            citation_id,
        }
    }

    /// Every `pre.idl` element not marked `exclude`, in document order.
    pub fn find_blocks(doc: &Document) -> Vec<ElementId> {
        doc.select(doc.root(), |el| {
            el.tag == "pre" && el.has_class("idl") && !el.has_class("exclude")
        })
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn compile_document(
        &mut self,
        doc: &mut Document,
        arena: &mut IdlArena,
        diagnostics: &mut Diagnostics,
    ) -> Vec<CompiledBlock> {
        let blocks = Self::find_blocks(doc);
        debug!(count = blocks.len(), "found IDL blocks");
        blocks
            .into_iter()
            .filter_map(|block| self.compile_block(doc, arena, diagnostics, block))
            .collect()
    }

    /// Compile one block. A block that fails to parse is left untouched and
    /// reported; `None` is returned.
    pub fn compile_block(
        &mut self,
        doc: &mut Document,
        arena: &mut IdlArena,
        diagnostics: &mut Diagnostics,
        block: ElementId,
    ) -> Option<CompiledBlock> {
        let _span = tracing::debug_span!("compile_block", block = block.0).entered();
        let source = doc.text_content(block);
        let definitions = match parse(&source, arena) {
            Ok(definitions) => definitions,
            Err(err) => {
                warn!(line = err.line, column = err.column, "skipping unparsable IDL block");
                let message = format_message(
                    diagnostic_messages::IDL_SYNTAX_ERROR,
                    &[err.to_string().as_str()],
                );
                diagnostics.report_error(
                    Some(block),
                    diagnostic_codes::IDL_SYNTAX_ERROR,
                    message,
                    Some(&err.message),
                    Some(err.context),
                );
                return None;
            }
        };

        doc.clear_children(block);
        doc.add_class(block, "def");
        doc.add_class(block, "idl");
        {
            let arena: &IdlArena = arena;
            let mut writer =
                MarkupWriter::new(doc, diagnostics, self.linker, arena, self.citation_id, block);
            write_with(arena, &definitions, &mut writer);
        }
        self.assign_dfn_for(doc, block);
        normalize_citation(doc, block, self.citation_id);

        debug!(definitions = definitions.len(), "compiled IDL block");
        Some(CompiledBlock {
            element: block,
            source,
            definitions,
        })
    }

    /// Give every definition-marked element without `data-dfn-for` the title
    /// of the definition that contains it, and register `<dfn>`s under their
    /// title.
    fn assign_dfn_for(&mut self, doc: &mut Document, block: ElementId) {
        for el in doc.select(block, |e| e.has_attr("data-idl")) {
            if doc.has_attr(el, "data-dfn-for") {
                continue;
            }
            let own = doc.closest(el, is_wrapper);
            let container = own
                .and_then(|w| doc.parent(w))
                .filter(|&p| p != block)
                .and_then(|p| doc.closest(p, is_wrapper));
            let Some(container) = container else {
                continue;
            };
            let dfn_for = doc.attr(container, "data-title").unwrap_or_default().to_string();
            doc.set_attr(el, "data-dfn-for", dfn_for);
            if doc.tag(el) == "dfn"
                && let Some(title) = doc.attr(el, "data-title")
                && !self.linker.registry().defines(el, title)
            {
                let title = title.to_string();
                self.linker.registry_mut().register_definition(el, &[title]);
            }
        }
    }
}

/// Definition wrapper spans carry `data-idl` and `data-title`.
fn is_wrapper(el: &Element) -> bool {
    el.tag == "span" && el.has_attr("data-idl") && el.has_attr("data-title")
}
