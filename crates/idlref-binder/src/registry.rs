//! Definition registry: which `<dfn>` elements define which names.

use idlref_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use idlref_common::{Diagnostics, Document, ElementId};
use idlref_parser::{IdlNode, NodeKind};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

/// Lookup and registration of document definitions.
pub trait DefinitionRegistry {
    /// Existing definition of `name` for `node`, scoped to `parent`.
    fn find_dfn(
        &mut self,
        doc: &mut Document,
        diagnostics: &mut Diagnostics,
        node: &IdlNode,
        name: &str,
        parent: Option<&str>,
    ) -> Option<ElementId>;

    /// Record `element` as a definition of each of `names`.
    fn register_definition(&mut self, element: ElementId, names: &[String]);

    /// Whether `element` is already recorded under `name`.
    fn defines(&self, element: ElementId, name: &str) -> bool;

    /// Append the alternative spellings of `node` to `element`'s `data-lt`
    /// and register the ones `element` is not yet recorded under.
    fn add_alternative_names_by_type(
        &mut self,
        doc: &mut Document,
        element: ElementId,
        node: &IdlNode,
        parent: Option<&str>,
        name: &str,
    );
}

type Definitions = SmallVec<[ElementId; 2]>;

/// In-memory registry keyed by lower-cased name.
#[derive(Debug, Default)]
pub struct DefinitionMap {
    by_name: FxHashMap<String, Definitions>,
}

impl DefinitionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from every `<dfn>` already in the document.
    pub fn from_document(doc: &Document) -> Self {
        let mut map = Self::new();
        for dfn in doc.select(doc.root(), |el| el.tag == "dfn") {
            let mut names: Vec<String> = match doc.attr(dfn, "data-lt") {
                Some(lt) => lt.split('|').map(|s| s.trim().to_string()).collect(),
                None => vec![doc.text_content(dfn).trim().to_string()],
            };
            names.retain(|n| !n.is_empty());
            map.insert(dfn, &names);
        }
        debug!(names = map.by_name.len(), "seeded definition map");
        map
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Every element registered under `name`.
    pub fn definitions(&self, name: &str) -> &[ElementId] {
        self.by_name
            .get(&name.to_lowercase())
            .map_or(&[][..], |defs| defs.as_slice())
    }

    fn insert(&mut self, element: ElementId, names: &[String]) {
        for name in names {
            let entry = self.by_name.entry(name.to_lowercase()).or_default();
            if !entry.contains(&element) {
                entry.push(element);
            }
        }
    }

    /// Point unresolved reference anchors (`a[data-xref-type]` without
    /// `href`) at the local unscoped definition of their term, when exactly
    /// one definition of a fitting type exists. Anything else is left for
    /// the xref phase. Returns the number of anchors linked.
    pub fn link_local_references(&self, doc: &mut Document) -> usize {
        let anchors = doc.select(doc.root(), |el| {
            el.tag == "a" && el.has_attr("data-xref-type") && !el.has_attr("href")
        });
        let mut linked = 0;
        for anchor in anchors {
            let term = match doc.attr(anchor, "data-lt") {
                Some(lt) => lt.to_string(),
                None => doc.text_content(anchor),
            };
            let term = term.trim();
            let xref_type = doc.attr(anchor, "data-xref-type").unwrap_or_default();
            let targets: Definitions = self
                .candidates(doc, term, None)
                .into_iter()
                .filter(|&dfn| doc.has_attr(dfn, "id") && fits_xref_type(doc, dfn, xref_type))
                .collect();
            if let [target] = targets[..]
                && let Some(id) = doc.attr(target, "id").map(str::to_string)
            {
                doc.set_attr(anchor, "href", format!("#{id}"));
                doc.add_class(anchor, "internalDFN");
                linked += 1;
            } else if targets.len() > 1 {
                debug!(term, count = targets.len(), "several local definitions, leaving for xref");
            }
        }
        debug!(linked, "linked references to local definitions");
        linked
    }

    /// Definitions of `name` usable for `parent`: scoped ones must list
    /// `parent` in `data-dfn-for`, unscoped lookups want no `data-dfn-for`.
    fn candidates(&self, doc: &Document, name: &str, parent: Option<&str>) -> Definitions {
        self.definitions(name)
            .iter()
            .copied()
            .filter(|&dfn| doc.attr(dfn, "data-idl") != Some("partial"))
            .filter(|&dfn| match (parent, doc.attr(dfn, "data-dfn-for")) {
                (Some(parent), Some(dfn_for)) => dfn_for_matches(dfn_for, parent),
                (Some(_), None) => false,
                (None, dfn_for) => dfn_for.is_none_or(|f| f.trim().is_empty()),
            })
            .collect()
    }

    fn find_normal(
        &self,
        doc: &mut Document,
        diagnostics: &mut Diagnostics,
        node: &IdlNode,
        names: &[String],
        parent: Option<&str>,
    ) -> Option<ElementId> {
        let parent = parent.filter(|p| !p.is_empty());
        for name in names {
            let resolved = if node.kind == NodeKind::EnumValue && name.is_empty() {
                "the-empty-string"
            } else {
                name.as_str()
            };
            let mut found = self.candidates(doc, resolved, parent);
            if found.is_empty()
                && let Some(parent) = parent
            {
                // A prose definition written without data-dfn-for.
                found = self.candidates(doc, resolved, None);
                found.retain(|dfn| !doc.has_attr(*dfn, "data-idl"));
                if let Some(&adopted) = found.first() {
                    debug!(name = resolved, parent, "adopting unscoped definition");
                    doc.set_attr(adopted, "data-dfn-for", parent);
                }
            }
            if found.len() > 1 {
                let scope = parent.map(|p| format!(" `{p}`'s")).unwrap_or_default();
                let message = format_message(
                    diagnostic_messages::DUPLICATE_DEFINITION,
                    &[scope.as_str(), resolved],
                );
                diagnostics.report_warning(
                    Some(found[1]),
                    diagnostic_codes::DUPLICATE_DEFINITION,
                    message,
                    Some("Duplicate definition"),
                );
            }
            if let Some(&first) = found.first() {
                return Some(first);
            }
        }
        None
    }
}

impl DefinitionRegistry for DefinitionMap {
    fn find_dfn(
        &mut self,
        doc: &mut Document,
        diagnostics: &mut Diagnostics,
        node: &IdlNode,
        name: &str,
        parent: Option<&str>,
    ) -> Option<ElementId> {
        let names = if node.kind == NodeKind::Operation && !name.contains("!overload") {
            let args: Vec<&str> = node.arguments.iter().map(|a| a.name.as_str()).collect();
            let mut names = Vec::with_capacity(3);
            if !args.is_empty() {
                names.push(format!("{name}({})", args.join(", ")));
            }
            names.push(format!("{name}()"));
            names.push(name.to_string());
            names
        } else {
            vec![name.to_string()]
        };
        self.find_normal(doc, diagnostics, node, &names, parent)
    }

    fn register_definition(&mut self, element: ElementId, names: &[String]) {
        self.insert(element, names);
    }

    fn defines(&self, element: ElementId, name: &str) -> bool {
        self.definitions(name).contains(&element)
    }

    fn add_alternative_names_by_type(
        &mut self,
        doc: &mut Document,
        element: ElementId,
        node: &IdlNode,
        _parent: Option<&str>,
        name: &str,
    ) {
        let alternatives = alternative_names(node, name);
        if alternatives.is_empty() {
            return;
        }
        let mut lt: Vec<String> = match doc.attr(element, "data-lt") {
            Some(existing) => existing.split('|').map(str::to_string).collect(),
            None => vec![name.to_string()],
        };
        for alt in &alternatives {
            if !lt.contains(alt) {
                lt.push(alt.clone());
            }
        }
        doc.set_attr(element, "data-lt", lt.join("|"));
        let unrecorded: Vec<String> = alternatives
            .into_iter()
            .filter(|alt| !self.defines(element, alt))
            .collect();
        if !unrecorded.is_empty() {
            self.register_definition(element, &unrecorded);
        }
    }
}

/// Extra spellings a definition of `node` answers to.
pub fn alternative_names(node: &IdlNode, name: &str) -> Vec<String> {
    match node.kind {
        NodeKind::Operation | NodeKind::Constructor => {
            let args: Vec<&str> = node.arguments.iter().map(|a| a.name.as_str()).collect();
            let with_args = format!("{name}({})", args.join(", "));
            let bare = format!("{name}()");
            if with_args == bare {
                vec![bare]
            } else {
                vec![with_args, bare]
            }
        }
        NodeKind::EnumValue => vec![format!("\"{name}\"")],
        _ => Vec::new(),
    }
}

/// Definition types an IDL type reference can point at.
const IDL_TYPE_DFN_TYPES: &[&str] = &["interface", "dictionary", "enum", "typedef", "callback"];

/// IDL type references want a type definition, `dfn` references a prose
/// definition, and any other reference a definition of its own type.
fn fits_xref_type(doc: &Document, dfn: ElementId, xref_type: &str) -> bool {
    let dfn_type = doc.attr(dfn, "data-dfn-type");
    match xref_type {
        "_IDL_" => dfn_type.is_some_and(|t| IDL_TYPE_DFN_TYPES.contains(&t)),
        "dfn" => !doc.has_attr(dfn, "data-idl") && dfn_type.is_none_or(|t| t == "dfn"),
        other => dfn_type == Some(other),
    }
}

fn dfn_for_matches(dfn_for: &str, parent: &str) -> bool {
    dfn_for
        .split([',', ' '])
        .any(|f| !f.is_empty() && f.eq_ignore_ascii_case(parent))
}
