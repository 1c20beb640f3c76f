//! Descriptive metadata attached to definition elements.

use idlref_common::{Child, Document, ElementId};
use idlref_parser::{IdlNode, NodeKind, write_type};

/// Decoration collaborator of the definition linker.
pub trait Decorator {
    fn decorate(
        &mut self,
        doc: &mut Document,
        element: ElementId,
        node: &IdlNode,
        parent: Option<&str>,
        name: &str,
    );
}

/// Default decoration for IDL definitions.
///
/// Sets `id` (when absent), `data-idl`, `data-title`, `data-dfn-for` and,
/// for typed members, `data-type`. Plain-text content is wrapped in `<code>`.
#[derive(Debug, Default)]
pub struct IdlDecorator;

impl Decorator for IdlDecorator {
    fn decorate(
        &mut self,
        doc: &mut Document,
        element: ElementId,
        node: &IdlNode,
        parent: Option<&str>,
        name: &str,
    ) {
        let parent = parent.unwrap_or_default();
        if !doc.has_attr(element, "id") {
            doc.set_attr(element, "id", dfn_anchor(parent, name));
        }
        doc.set_attr(element, "data-idl", node.kind.as_str());
        let title = doc.text_content(element);
        doc.set_attr(element, "data-title", title.clone());
        if !parent.is_empty() {
            doc.set_attr(element, "data-dfn-for", parent);
        }
        if matches!(
            node.kind,
            NodeKind::Attribute | NodeKind::Field | NodeKind::Operation
        ) && let Some(ty) = &node.idl_type
        {
            doc.set_attr(element, "data-type", write_type(ty));
        }

        let in_code = doc.closest(element, |el| el.tag == "code").is_some();
        let has_elements = doc
            .children(element)
            .iter()
            .any(|c| matches!(c, Child::Element(_)));
        if !in_code && !has_elements {
            let code = doc.create_element("code");
            doc.set_text(code, &title);
            doc.clear_children(element);
            doc.append_child(element, code);
        }
    }
}

/// `dom-<parent>-<name>`, lower-cased, without parentheses and with
/// whitespace turned into dashes.
pub fn dfn_anchor(parent: &str, name: &str) -> String {
    let middle = if parent.is_empty() {
        String::new()
    } else {
        format!("{}-", parent.to_lowercase())
    };
    let mut last: String = name
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '(' | ')'))
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect();
    if last.is_empty() {
        last = "the-empty-string".to_string();
    }
    format!("dom-{middle}{last}")
}
