use idlref_common::{Document, ElementId};
use tracing::trace;

/// Make sure the citation context of `block` includes `citation_id`.
///
/// The context is the nearest element (from `block` up) carrying
/// `data-cite`, or the document root. An empty context becomes
/// `citation_id`; a context missing it gets it prepended.
pub fn normalize_citation(doc: &mut Document, block: ElementId, citation_id: &str) {
    let target = doc
        .closest(block, |el| el.has_attr("data-cite"))
        .unwrap_or_else(|| doc.root());
    let current = doc.attr(target, "data-cite").unwrap_or_default().trim();
    let updated = if current.is_empty() {
        citation_id.to_string()
    } else if current
        .split_whitespace()
        .any(|c| c.eq_ignore_ascii_case(citation_id))
    {
        return;
    } else {
        let tokens: Vec<&str> = current.split_whitespace().collect();
        format!("{citation_id} {}", tokens.join(" "))
    };
    trace!(element = target.0, cite = %updated, "normalized citation context");
    doc.set_attr(target, "data-cite", updated);
}
