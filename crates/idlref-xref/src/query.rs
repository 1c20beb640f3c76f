//! The batched lookup request.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::terms::TermGroups;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    pub term: String,
    pub specs: Vec<String>,
    pub types: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XrefQuery {
    pub keys: Vec<QueryKey>,
}

impl XrefQuery {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// One key per occurrence across all groups; with `dedupe`, identical keys
/// are sent once.
pub fn build_query(groups: &TermGroups, dedupe: bool) -> XrefQuery {
    let keys = groups.values().flatten().map(|occurrence| QueryKey {
        term: occurrence.term.clone(),
        specs: occurrence.specs.clone(),
        types: occurrence.types.clone(),
    });
    let keys = if dedupe {
        keys.collect::<IndexSet<_>>().into_iter().collect()
    } else {
        keys.collect()
    };
    XrefQuery { keys }
}
