//! Document element arena.
//!
//! The annotation passes never hold references into the tree across a
//! mutation: every element is addressed by its `ElementId`, and parent links
//! are stored alongside the children so `closest`-style ancestor queries stay
//! cheap. Elements can be created detached and attached later, which is how
//! the markup compiler assembles rendered IDL before splicing it in.
//!
//! Two append-only reference sets live on the document itself because they
//! outlive any single processing run.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Index of an element in a [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

/// A child slot: either another element or a run of text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Child {
    Element(ElementId),
    Text(String),
}

#[derive(Clone, Debug)]
pub struct Element {
    pub tag: String,
    attributes: IndexMap<String, String>,
    children: Vec<Child>,
    parent: Option<ElementId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attributes: IndexMap::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|list| list.split_ascii_whitespace().any(|c| c == class))
    }
}

#[derive(Clone, Debug)]
pub struct Document {
    elements: Vec<Element>,
    root: ElementId,
    pub normative_references: IndexSet<String>,
    pub informative_references: IndexSet<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document whose root is a `body` element.
    pub fn new() -> Self {
        Self {
            elements: vec![Element::new("body")],
            root: ElementId(0),
            normative_references: IndexSet::new(),
            informative_references: IndexSet::new(),
        }
    }

    pub fn root(&self) -> ElementId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, id: ElementId) -> &Element {
        &self.elements[id.0 as usize]
    }

    fn get_mut(&mut self, id: ElementId) -> &mut Element {
        &mut self.elements[id.0 as usize]
    }

    pub fn tag(&self, id: ElementId) -> &str {
        &self.get(id).tag
    }

    // =========================================================================
    // Tree construction
    // =========================================================================

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(Element::new(tag));
        id
    }

    /// Append `child` to `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        debug_assert_ne!(parent, child, "an element cannot contain itself");
        self.detach(child);
        self.get_mut(child).parent = Some(parent);
        self.get_mut(parent).children.push(Child::Element(child));
    }

    /// Append text to `parent`, merging with a trailing text run.
    pub fn append_text(&mut self, parent: ElementId, text: &str) {
        if text.is_empty() {
            return;
        }
        let children = &mut self.get_mut(parent).children;
        if let Some(Child::Text(last)) = children.last_mut() {
            last.push_str(text);
        } else {
            children.push(Child::Text(text.to_string()));
        }
    }

    /// Remove `id` from its parent's child list.
    pub fn detach(&mut self, id: ElementId) {
        if let Some(parent) = self.get_mut(id).parent.take() {
            self.get_mut(parent)
                .children
                .retain(|c| *c != Child::Element(id));
        }
    }

    /// Drop every child of `id`.
    pub fn clear_children(&mut self, id: ElementId) {
        let children = std::mem::take(&mut self.get_mut(id).children);
        for child in children {
            if let Child::Element(el) = child {
                self.get_mut(el).parent = None;
            }
        }
    }

    /// Replace the content of `id` with a single text run.
    pub fn set_text(&mut self, id: ElementId, text: &str) {
        self.clear_children(id);
        self.append_text(id, text);
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn attr(&self, id: ElementId, name: &str) -> Option<&str> {
        self.get(id).attr(name)
    }

    pub fn has_attr(&self, id: ElementId, name: &str) -> bool {
        self.get(id).has_attr(name)
    }

    pub fn set_attr(&mut self, id: ElementId, name: &str, value: impl Into<String>) {
        self.get_mut(id)
            .attributes
            .insert(name.to_string(), value.into());
    }

    pub fn remove_attr(&mut self, id: ElementId, name: &str) -> Option<String> {
        self.get_mut(id).attributes.shift_remove(name)
    }

    pub fn has_class(&self, id: ElementId, class: &str) -> bool {
        self.get(id).has_class(class)
    }

    pub fn add_class(&mut self, id: ElementId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let value = match self.attr(id, "class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attr(id, "class", value);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.get(id).parent
    }

    pub fn children(&self, id: ElementId) -> &[Child] {
        self.get(id).children()
    }

    /// Ancestors of `id`, nearest first, excluding `id` itself.
    pub fn ancestors(&self, id: ElementId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// Nearest element, starting at `id` itself, that satisfies `pred`.
    pub fn closest(&self, id: ElementId, pred: impl Fn(&Element) -> bool) -> Option<ElementId> {
        if pred(self.get(id)) {
            return Some(id);
        }
        self.ancestors(id).find(|&a| pred(self.get(a)))
    }

    /// Descendant elements of `id` in document order, excluding `id`.
    pub fn descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.element_children(id).rev().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.element_children(next).rev());
        }
        out
    }

    fn element_children(&self, id: ElementId) -> impl DoubleEndedIterator<Item = ElementId> + '_ {
        self.get(id).children.iter().filter_map(|c| match c {
            Child::Element(el) => Some(*el),
            Child::Text(_) => None,
        })
    }

    /// Descendants of `id` that satisfy `pred`, in document order.
    pub fn select(&self, id: ElementId, pred: impl Fn(&Element) -> bool) -> Vec<ElementId> {
        self.descendants(id)
            .into_iter()
            .filter(|&el| pred(self.get(el)))
            .collect()
    }

    pub fn text_content(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: ElementId, out: &mut String) {
        for child in &self.get(id).children {
            match child {
                Child::Text(text) => out.push_str(text),
                Child::Element(el) => self.collect_text(*el, out),
            }
        }
    }

    /// Attached element whose `id` attribute equals `anchor`.
    pub fn find_by_anchor(&self, anchor: &str) -> Option<ElementId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|&el| self.attr(el, "id") == Some(anchor))
    }

    /// Map of every attached `id` attribute to its element.
    pub fn anchor_index(&self) -> FxHashMap<String, ElementId> {
        let mut index = FxHashMap::default();
        for el in std::iter::once(self.root).chain(self.descendants(self.root)) {
            if let Some(anchor) = self.attr(el, "id") {
                index.entry(anchor.to_string()).or_insert(el);
            }
        }
        index
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    /// Build a document from its JSON tree form. A bare text root is wrapped
    /// in a `body` element.
    pub fn from_node(node: &DocumentNode) -> Self {
        let mut doc = Document::new();
        match node {
            DocumentNode::Text(text) => {
                let root = doc.root;
                doc.append_text(root, text);
            }
            DocumentNode::Element {
                tag,
                attrs,
                children,
            } => {
                let root = doc.root;
                doc.get_mut(root).tag = tag.clone();
                for (name, value) in attrs {
                    doc.set_attr(root, name, value.clone());
                }
                for child in children {
                    doc.build_node(root, child);
                }
            }
        }
        doc
    }

    fn build_node(&mut self, parent: ElementId, node: &DocumentNode) {
        match node {
            DocumentNode::Text(text) => self.append_text(parent, text),
            DocumentNode::Element {
                tag,
                attrs,
                children,
            } => {
                let el = self.create_element(tag);
                for (name, value) in attrs {
                    self.set_attr(el, name, value.clone());
                }
                self.append_child(parent, el);
                for child in children {
                    self.build_node(el, child);
                }
            }
        }
    }

    /// JSON tree form of the subtree rooted at `id`.
    pub fn to_node(&self, id: ElementId) -> DocumentNode {
        let el = self.get(id);
        DocumentNode::Element {
            tag: el.tag.clone(),
            attrs: el.attributes.clone(),
            children: el
                .children
                .iter()
                .map(|child| match child {
                    Child::Text(text) => DocumentNode::Text(text.clone()),
                    Child::Element(child) => self.to_node(*child),
                })
                .collect(),
        }
    }

    /// HTML serialization of the subtree rooted at `id`.
    pub fn to_html(&self, id: ElementId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: ElementId, out: &mut String) {
        let el = self.get(id);
        out.push('<');
        out.push_str(&el.tag);
        for (name, value) in &el.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_into(value, true, out);
            out.push('"');
        }
        out.push('>');
        for child in &el.children {
            match child {
                Child::Text(text) => escape_into(text, false, out),
                Child::Element(child) => self.write_html(*child, out),
            }
        }
        out.push_str("</");
        out.push_str(&el.tag);
        out.push('>');
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

/// Iterator over an element's ancestors, nearest first.
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<ElementId>,
}

impl Iterator for Ancestors<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

/// JSON tree form of a document: text runs are bare strings, elements are
/// objects with `tag`, optional `attrs` and optional `children`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentNode {
    Text(String),
    Element {
        tag: String,
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        attrs: IndexMap<String, String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<DocumentNode>,
    },
}
