//! The per-document pipeline.
//!
//! All compile-time work (markup, validation, local links) finishes before
//! the single xref lookup is awaited.

use idlref_binder::DefinitionLinker;
use idlref_checker::{ValidationBlock, Validator};
use idlref_common::{Diagnostics, Document, ElementId};
use idlref_emitter::MarkupCompiler;
use idlref_parser::IdlArena;
use idlref_xref::{XrefResolver, XrefStats, XrefTransport};
use tracing::{debug, info, info_span};

use crate::config::ProcessOptions;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockSummary {
    pub element: ElementId,
    pub definitions: usize,
}

#[derive(Debug, Default)]
pub struct ProcessReport {
    pub diagnostics: Diagnostics,
    /// Blocks that parsed, in document order.
    pub blocks: Vec<BlockSummary>,
    pub validation_issues: usize,
    /// IDL references linked to a definition in the same document.
    pub local_links: usize,
    /// `None` when xref resolution is turned off.
    pub xref: Option<XrefStats>,
}

impl ProcessReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Runs the whole pipeline over one document. Holds no per-run state, so one
/// processor can serve any number of documents.
#[derive(Clone, Debug, Default)]
pub struct DocumentProcessor {
    options: ProcessOptions,
}

impl DocumentProcessor {
    pub fn new(options: ProcessOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    #[tracing::instrument(level = "info", skip_all)]
    pub async fn process<T: XrefTransport>(
        &self,
        doc: &mut Document,
        transport: &T,
    ) -> ProcessReport {
        let mut report = self.compile(doc);

        if self.options.xref {
            let resolver = XrefResolver::new(self.options.xref_options());
            let stats = resolver
                .resolve(doc, &mut report.diagnostics, transport)
                .await;
            report.xref = Some(stats);
        }

        info!(
            blocks = report.blocks.len(),
            diagnostics = report.diagnostics.len(),
            "document processed"
        );
        report
    }

    /// Everything before the xref phase: markup, validation and local links.
    pub fn compile(&self, doc: &mut Document) -> ProcessReport {
        let mut diagnostics = Diagnostics::new();
        let mut arena = IdlArena::new();
        let mut linker = DefinitionLinker::for_document(doc)
            .with_synthesized_definitions(self.options.synthesize_definitions);

        let compiled = info_span!("compile").in_scope(|| {
            MarkupCompiler::new(&mut linker, &self.options.citation_id).compile_document(
                doc,
                &mut arena,
                &mut diagnostics,
            )
        });

        let validation_issues = if self.options.validate {
            let _span = info_span!("validate").entered();
            let blocks: Vec<ValidationBlock<'_>> = compiled
                .iter()
                .map(|block| ValidationBlock {
                    element: block.element,
                    source: &block.source,
                    definitions: &block.definitions,
                })
                .collect();
            Validator::new()
                .with_autofix(self.options.autofix)
                .run(&mut arena, &blocks, &mut diagnostics)
        } else {
            0
        };

        let local_links = linker.into_registry().link_local_references(doc);
        debug!(local_links, "local references linked");

        ProcessReport {
            diagnostics,
            blocks: compiled
                .iter()
                .map(|block| BlockSummary {
                    element: block.element,
                    definitions: block.definitions.len(),
                })
                .collect(),
            validation_issues,
            local_links,
            xref: None,
        }
    }
}
