//! The lookup seam.

use std::future::{Future, ready};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::query::XrefQuery;
use crate::terms::normalize_term;

#[derive(Debug, Error)]
pub enum XrefError {
    #[error("lookup transport failed: {0}")]
    Transport(String),
    #[error("malformed term database: {0}")]
    Database(#[from] serde_json::Error),
}

/// One place a term is defined.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub uri: String,
    pub spec: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub normative: bool,
}

impl Candidate {
    /// Path and fragment of `uri`: the part after the first `/` (the whole
    /// uri if there is none), split at the first `#`.
    pub fn cite_path_and_fragment(&self) -> (&str, &str) {
        let path = self
            .uri
            .split_once('/')
            .map_or(self.uri.as_str(), |(_, rest)| rest);
        path.split_once('#').unwrap_or((path, ""))
    }
}

/// Candidates per queried term.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct XrefResponse {
    pub result: IndexMap<String, Vec<Candidate>>,
}

impl XrefResponse {
    pub fn candidates(&self, term: &str) -> &[Candidate] {
        self.result.get(term).map_or(&[][..], Vec::as_slice)
    }
}

/// Fetches candidates for a whole batch at once.
pub trait XrefTransport {
    fn lookup(&self, query: &XrefQuery) -> impl Future<Output = Result<XrefResponse, XrefError>>;
}

/// A term database held in memory.
///
/// The JSON form maps each term to its candidates:
///
/// ```json
/// { "widget": [{ "uri": "widgets.html#widget", "spec": "A", "type": "dfn", "normative": true }] }
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct StaticXrefDatabase {
    entries: IndexMap<String, Vec<Candidate>>,
}

impl StaticXrefDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(text: &str) -> Result<Self, XrefError> {
        let raw: Self = serde_json::from_str(text)?;
        let mut db = Self::new();
        for (term, candidates) in raw.entries {
            for candidate in candidates {
                db.insert(&term, candidate);
            }
        }
        Ok(db)
    }

    pub fn insert(&mut self, term: &str, candidate: Candidate) {
        self.entries
            .entry(normalize_term(term))
            .or_default()
            .push(candidate);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidates for every term of `query`; expected types, when given,
    /// filter by candidate type.
    pub fn answer(&self, query: &XrefQuery) -> XrefResponse {
        let mut result: IndexMap<String, Vec<Candidate>> = IndexMap::new();
        for key in &query.keys {
            let entry = result.entry(key.term.clone()).or_default();
            let known = self.entries.get(&key.term).into_iter().flatten();
            for candidate in known {
                let wanted = key.types.is_empty() || key.types.contains(&candidate.kind);
                if wanted && !entry.contains(candidate) {
                    entry.push(candidate.clone());
                }
            }
        }
        debug!(terms = result.len(), "answered xref query");
        XrefResponse { result }
    }
}

impl XrefTransport for StaticXrefDatabase {
    fn lookup(&self, query: &XrefQuery) -> impl Future<Output = Result<XrefResponse, XrefError>> {
        ready(Ok(self.answer(query)))
    }
}
