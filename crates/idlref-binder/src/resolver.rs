//! Identifier resolution: display names and anchor ids for definition nodes.

use idlref_parser::{IdlArena, IdlNode, NodeId, NodeKind};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

/// Display name and anchor id of one definition node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolvedIdentity {
    pub name: String,
    pub anchor_id: String,
}

/// Per-run resolver state.
///
/// Results are memoized by [`NodeId`], so asking twice for the same node
/// neither changes the answer nor advances any counter.
#[derive(Debug, Default)]
pub struct IdentifierResolver {
    resolved: FxHashMap<NodeId, ResolvedIdentity>,
    /// Partial top-level definitions seen so far, by name.
    partial_counts: FxHashMap<String, u32>,
    /// Resolutions of `parent.name` and `parent.name()`.
    operation_counts: FxHashMap<String, u32>,
    issued_anchors: FxHashSet<String>,
}

impl IdentifierResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(
        &mut self,
        arena: &IdlArena,
        node_id: NodeId,
        parent: Option<&str>,
    ) -> ResolvedIdentity {
        if let Some(hit) = self.resolved.get(&node_id) {
            return hit.clone();
        }
        let identity = self.compute(arena.get(node_id), parent);
        trace!(
            node = node_id.0,
            name = %identity.name,
            anchor = %identity.anchor_id,
            "resolved identifier"
        );
        self.resolved.insert(node_id, identity.clone());
        identity
    }

    /// Cached identity, if `node_id` was already resolved.
    pub fn get(&self, node_id: NodeId) -> Option<&ResolvedIdentity> {
        self.resolved.get(&node_id)
    }

    pub fn partial_count(&self, name: &str) -> u32 {
        self.partial_counts.get(name).copied().unwrap_or(0)
    }

    /// Resolutions so far of a qualified key such as `Foo.bar` or `Foo.bar()`.
    pub fn operation_count(&self, qualified: &str) -> u32 {
        self.operation_counts.get(qualified).copied().unwrap_or(0)
    }

    fn compute(&mut self, node: &IdlNode, parent: Option<&str>) -> ResolvedIdentity {
        let anonymous_special = node.kind == NodeKind::Operation && node.name.is_none();
        let mut name = base_name(node);
        let anchor_name = if anonymous_special {
            format!("anonymous-{name}")
        } else {
            name.clone()
        };
        let mut anchor_id = match parent {
            Some(parent) if !parent.is_empty() => format!(
                "idl-def-{}-{}",
                parent.to_lowercase(),
                anchor_name.to_lowercase()
            ),
            _ => format!("idl-def-{}", anchor_name.to_lowercase()),
        };

        if node.kind.is_container() && node.partial {
            let count = self.partial_counts.entry(name.clone()).or_insert(0);
            *count += 1;
            anchor_id.push_str(&format!("-partial-{count}"));
        } else if node.kind.is_call_signature() {
            let qualified = format!("{}.{name}", parent.unwrap_or_default());
            let call_form = format!("{qualified}()");
            let prior_calls = self.bump(&call_form);
            let prior_qualified = self.bump(&qualified);
            if prior_qualified > 0 {
                let overload = format!("!overload-{prior_calls}");
                name.push_str(&overload);
                anchor_id.push_str(&overload);
            } else {
                for arg in &node.arguments {
                    anchor_id.push('-');
                    anchor_id.push_str(&arg.name.to_lowercase());
                }
            }
        }

        ResolvedIdentity {
            name,
            anchor_id: self.claim_anchor(anchor_id),
        }
    }

    /// Increment `key` and return its previous value.
    fn bump(&mut self, key: &str) -> u32 {
        let count = self.operation_counts.entry(key.to_string()).or_insert(0);
        let prior = *count;
        *count += 1;
        prior
    }

    fn claim_anchor(&mut self, anchor: String) -> String {
        if self.issued_anchors.insert(anchor.clone()) {
            return anchor;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{anchor}-{n}");
            if self.issued_anchors.insert(candidate.clone()) {
                trace!(%anchor, %candidate, "anchor collision");
                return candidate;
            }
            n += 1;
        }
    }
}

/// Name before any disambiguation.
///
/// Enum values use their text. Unnamed special operations use the special
/// keyword; other nameless nodes fall back to their kind.
pub fn base_name(node: &IdlNode) -> String {
    if node.kind == NodeKind::EnumValue {
        return node.value.clone().unwrap_or_default();
    }
    if let Some(name) = &node.name {
        return name.clone();
    }
    if let Some(special) = node.special {
        return special.as_str().to_string();
    }
    node.kind.as_str().to_string()
}
