//! Token-to-markup rendering for one IDL block.

use idlref_binder::{Decorator, DefinitionLinker, DefinitionRegistry};
use idlref_common::{Diagnostics, Document, ElementId};
use idlref_parser::{IdlArena, NodeId, NodeKind, RefContext, Templates};

/// Worker kinds whose global scopes are defined by HTML.
const HTML_WORKERS: &[&str] = &["Worker", "DedicatedWorker", "SharedWorker"];

/// CSS class of the wrapper emitted around a definition of `kind`.
pub const fn definition_class(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Interface | NodeKind::CallbackInterface => "idlInterface",
        NodeKind::InterfaceMixin => "idlInterfaceMixin",
        NodeKind::Callback => "idlCallback",
        NodeKind::Namespace => "idlNamespace",
        NodeKind::Dictionary => "idlDictionary",
        NodeKind::Enum => "idlEnum",
        NodeKind::EnumValue => "idlEnumItem",
        NodeKind::Typedef => "idlTypedef",
        NodeKind::Includes => "idlIncludes",
        NodeKind::Operation => "idlMethod",
        NodeKind::Constructor => "idlConstructor",
        NodeKind::Attribute => "idlAttribute",
        NodeKind::Const => "idlConst",
        NodeKind::Field => "idlMember",
        NodeKind::Iterable => "idlIterable",
        NodeKind::AsyncIterable => "idlAsyncIterable",
        NodeKind::Maplike => "idlMaplike",
        NodeKind::Setlike => "idlSetlike",
    }
}

/// [`Templates`] implementation that appends markup under a block element.
pub struct MarkupWriter<'a, R, D> {
    doc: &'a mut Document,
    diagnostics: &'a mut Diagnostics,
    linker: &'a mut DefinitionLinker<R, D>,
    arena: &'a IdlArena,
    citation_id: &'a str,
    /// Open elements; text goes to the last one.
    stack: Vec<ElementId>,
    /// One entry per entered definition: its wrapper, if it has one.
    wrappers: Vec<Option<ElementId>>,
}

impl<'a, R: DefinitionRegistry, D: Decorator> MarkupWriter<'a, R, D> {
    pub fn new(
        doc: &'a mut Document,
        diagnostics: &'a mut Diagnostics,
        linker: &'a mut DefinitionLinker<R, D>,
        arena: &'a IdlArena,
        citation_id: &'a str,
        block: ElementId,
    ) -> Self {
        Self {
            doc,
            diagnostics,
            linker,
            arena,
            citation_id,
            stack: vec![block],
            wrappers: Vec::new(),
        }
    }

    fn current(&self) -> ElementId {
        self.stack.last().copied().unwrap_or_else(|| self.doc.root())
    }

    fn parent_name(&self, parent: Option<NodeId>) -> Option<&'a str> {
        let arena = self.arena;
        parent.map(|p| arena.get(p).name_str())
    }

    /// Append a detached element with `text` to the current element.
    fn append_with_text(&mut self, element: ElementId, text: &str) {
        self.doc.set_text(element, text);
        let current = self.current();
        self.doc.append_child(current, element);
    }

    fn open(&mut self, element: ElementId) {
        let current = self.current();
        self.doc.append_child(current, element);
        self.stack.push(element);
    }
}

impl<R: DefinitionRegistry, D: Decorator> Templates for MarkupWriter<'_, R, D> {
    fn text(&mut self, text: &str) {
        let current = self.current();
        self.doc.append_text(current, text);
    }

    fn generic(&mut self, name: &str) {
        let link = self.doc.create_element("a");
        let xref_type = if name.starts_with(|c: char| c.is_ascii_uppercase()) {
            "interface"
        } else {
            "dfn"
        };
        self.doc.set_attr(link, "data-xref-type", xref_type);
        self.doc.set_attr(link, "data-cite", self.citation_id);
        self.append_with_text(link, name);
    }

    fn reference(&mut self, name: &str, context: RefContext<'_>) {
        let in_exposed = match context {
            RefContext::ExtendedAttribute("Exposed") => true,
            RefContext::ExtendedAttribute(_) => {
                self.text(name);
                return;
            }
            RefContext::Type => false,
        };
        let (xref_type, lt, cite) = match name {
            "Window" => ("interface", name.to_string(), Some("HTML")),
            "object" => ("interface", name.to_string(), Some(self.citation_id)),
            worker if in_exposed && worker.contains("Worker") => {
                let cite = if HTML_WORKERS.contains(&worker) {
                    Some("HTML")
                } else if worker == "ServiceWorker" {
                    Some("SERVICE-WORKERS")
                } else {
                    None
                };
                ("_IDL_", format!("{worker}GlobalScope"), cite)
            }
            _ => ("_IDL_", name.to_string(), None),
        };
        let link = self.doc.create_element("a");
        self.doc.set_attr(link, "data-xref-type", xref_type);
        self.doc.set_attr(link, "data-link-type", "idl");
        self.doc.set_attr(link, "data-lt", lt);
        if let Some(cite) = cite {
            self.doc.set_attr(link, "data-cite", cite);
        }
        self.append_with_text(link, name);
    }

    fn name(&mut self, text: &str, node: NodeId, parent: Option<NodeId>) {
        let parent_name = self.parent_name(parent);
        let outcome = self.linker.link(
            self.doc,
            self.diagnostics,
            self.arena,
            text,
            node,
            parent_name,
        );
        let current = self.current();
        self.doc.append_child(current, outcome.element);
    }

    fn argument_name(&mut self, name: &str) {
        let span = self.doc.create_element("span");
        self.doc.set_attr(span, "class", "idlParamName");
        self.append_with_text(span, name);
    }

    fn enter_definition(&mut self, node: NodeId, parent: Option<NodeId>) {
        let kind = self.arena.get(node).kind;
        if matches!(kind, NodeKind::EnumValue | NodeKind::Includes) {
            self.wrappers.push(None);
            return;
        }
        let parent_name = self.parent_name(parent);
        let identity = self
            .linker
            .resolver_mut()
            .resolve(self.arena, node, parent_name);
        let span = self.doc.create_element("span");
        self.doc.set_attr(span, "class", definition_class(kind));
        self.doc.set_attr(span, "id", identity.anchor_id);
        self.doc.set_attr(span, "data-idl", "");
        self.doc.set_attr(span, "data-title", identity.name);
        self.open(span);
        self.wrappers.push(Some(span));
    }

    fn exit_definition(&mut self, _node: NodeId) {
        if let Some(Some(_)) = self.wrappers.pop() {
            self.stack.pop();
        }
    }

    fn enter_extended_attributes(&mut self) {
        let span = self.doc.create_element("span");
        self.doc.set_attr(span, "class", "extAttr");
        self.open(span);
    }

    fn exit_extended_attributes(&mut self) {
        self.stack.pop();
    }

    fn extended_attribute_name(&mut self, name: &str) {
        let link = self.doc.create_element("a");
        self.doc.set_attr(link, "data-xref-type", "extended-attribute");
        self.append_with_text(link, name);
    }
}
