//! Definition linking: turn a name occurrence into a link, a new
//! definition, or an unlinked reference.

use idlref_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use idlref_common::{Diagnostics, Document, ElementId};
use idlref_parser::{IdlArena, IdlNode, NodeId, NodeKind};
use tracing::{debug, trace};

use crate::decorator::{Decorator, IdlDecorator};
use crate::registry::{DefinitionMap, DefinitionRegistry, alternative_names};
use crate::resolver::{IdentifierResolver, ResolvedIdentity};

/// What the linker did with one name occurrence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkDecision {
    /// Linked to an existing definition.
    Linked(ElementId),
    /// `toJSON` with `[Default]`: linked to the default steps.
    DefaultToJson,
    /// This occurrence became the definition.
    Synthesized,
    /// Left as an unlinked reference.
    Unlinked { warned: bool },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkOutcome {
    /// Detached element to insert where the name occurs.
    pub element: ElementId,
    pub decision: LinkDecision,
    pub identity: ResolvedIdentity,
}

/// External documentation type for a definition kind.
pub const fn dfn_type(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Operation => "method",
        NodeKind::Field => "dict-member",
        NodeKind::CallbackInterface | NodeKind::InterfaceMixin => "interface",
        other => other.as_str(),
    }
}

/// Per-run linker. Owns the identifier resolver and the registry so all
/// counters and registrations live exactly as long as one document run.
pub struct DefinitionLinker<R = DefinitionMap, D = IdlDecorator> {
    resolver: IdentifierResolver,
    registry: R,
    decorator: D,
    synthesize_definitions: bool,
}

impl DefinitionLinker {
    /// Linker over the document's existing `<dfn>` elements.
    pub fn for_document(doc: &Document) -> Self {
        Self::new(DefinitionMap::from_document(doc), IdlDecorator)
    }
}

impl<R: DefinitionRegistry, D: Decorator> DefinitionLinker<R, D> {
    pub fn new(registry: R, decorator: D) -> Self {
        Self {
            resolver: IdentifierResolver::new(),
            registry,
            decorator,
            synthesize_definitions: true,
        }
    }

    /// When disabled, unmatched names stay unlinked references.
    #[must_use]
    pub fn with_synthesized_definitions(mut self, enabled: bool) -> Self {
        self.synthesize_definitions = enabled;
        self
    }

    pub fn resolver(&self) -> &IdentifierResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut IdentifierResolver {
        &mut self.resolver
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    pub fn into_registry(self) -> R {
        self.registry
    }

    #[tracing::instrument(level = "trace", skip(self, doc, diagnostics, arena), fields(node = node_id.0))]
    pub fn link(
        &mut self,
        doc: &mut Document,
        diagnostics: &mut Diagnostics,
        arena: &IdlArena,
        text: &str,
        node_id: NodeId,
        parent: Option<&str>,
    ) -> LinkOutcome {
        let identity = self.resolver.resolve(arena, node_id, parent);
        let node = arena.get(node_id);
        let name = identity.name.as_str();
        let dfn_type = dfn_type(node.kind);

        if let Some(dfn) = self
            .registry
            .find_dfn(doc, diagnostics, node, name, parent)
        {
            if !node.partial {
                doc.set_attr(dfn, "data-export", "");
                doc.set_attr(dfn, "data-dfn-type", dfn_type);
            }
            self.decorator.decorate(doc, dfn, node, parent, name);
            self.registry
                .add_alternative_names_by_type(doc, dfn, node, parent, name);
            let href = format!("#{}", doc.attr(dfn, "id").unwrap_or_default());
            let link = doc.create_element("a");
            if let Some(parent) = parent {
                doc.set_attr(link, "data-link-for", parent);
            }
            doc.set_attr(link, "data-link-type", dfn_type);
            doc.set_attr(link, "href", href);
            doc.set_attr(link, "class", "internalDFN");
            let code = doc.create_element("code");
            doc.set_text(code, text);
            doc.append_child(link, code);
            trace!(name, "linked to existing definition");
            return LinkOutcome {
                element: link,
                decision: LinkDecision::Linked(dfn),
                identity,
            };
        }

        if is_default_to_json(node) {
            let link = doc.create_element("a");
            doc.set_attr(link, "data-link-type", "dfn");
            doc.set_attr(link, "data-lt", "default toJSON steps");
            doc.set_attr(link, "data-xref-type", "dfn");
            doc.set_text(link, text);
            trace!(name, "linked to the default toJSON steps");
            return LinkOutcome {
                element: link,
                decision: LinkDecision::DefaultToJson,
                identity,
            };
        }

        if !node.partial && self.synthesize_definitions {
            let dfn = doc.create_element("dfn");
            doc.set_attr(dfn, "data-export", "");
            doc.set_attr(dfn, "data-dfn-type", dfn_type);
            doc.set_text(dfn, text);
            let mut names = vec![identity.name.clone()];
            names.extend(alternative_names(node, name));
            self.registry.register_definition(dfn, &names);
            self.decorator.decorate(doc, dfn, node, parent, name);
            self.registry
                .add_alternative_names_by_type(doc, dfn, node, parent, name);
            debug!(name, anchor = %identity.anchor_id, "synthesized definition");
            return LinkOutcome {
                element: dfn,
                decision: LinkDecision::Synthesized,
                identity,
            };
        }

        let anchor = doc.create_element("a");
        if node.partial {
            doc.set_attr(anchor, "data-idl", "partial");
        }
        doc.set_attr(anchor, "data-link-type", dfn_type);
        doc.set_attr(anchor, "data-title", node.name_str());
        doc.set_attr(anchor, "data-xref-type", dfn_type);
        doc.set_text(anchor, text);

        // Partial definitions resolve against a base defined elsewhere.
        let warned = !name.is_empty() && node.kind != NodeKind::Typedef && !node.partial;
        if warned {
            let scope = parent
                .filter(|p| !p.is_empty())
                .map(|p| format!(" `{p}`'s"))
                .unwrap_or_default();
            let shown = if node.kind == NodeKind::Operation {
                format!("{name}()")
            } else {
                name.to_string()
            };
            let message = format_message(
                diagnostic_messages::MISSING_IDL_DEFINITION,
                &[scope.as_str(), shown.as_str(), node.kind.as_str()],
            );
            diagnostics.report_warning(
                Some(anchor),
                diagnostic_codes::MISSING_IDL_DEFINITION,
                message,
                Some("Missing definition"),
            );
        }
        LinkOutcome {
            element: anchor,
            decision: LinkDecision::Unlinked { warned },
            identity,
        }
    }
}

fn is_default_to_json(node: &IdlNode) -> bool {
    node.kind == NodeKind::Operation
        && node.name.as_deref() == Some("toJSON")
        && node.has_ext_attr("Default")
}
