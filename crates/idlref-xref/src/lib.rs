//! Cross-reference resolution.
//!
//! - `terms` - find term occurrences and group them by normalised term
//! - `query` - the batched lookup request
//! - `transport` - the lookup seam and an in-memory term database
//! - `resolver` - per-occurrence disambiguation and write-back

pub mod terms;
pub use terms::{TermGroups, TermOccurrence, collect_occurrences, normalize_term};

pub mod query;
pub use query::{QueryKey, XrefQuery, build_query};

pub mod transport;
pub use transport::{Candidate, StaticXrefDatabase, XrefError, XrefResponse, XrefTransport};

pub mod resolver;
pub use resolver::{OFFENDING_CLASS, XrefOptions, XrefResolver, XrefStats};

#[cfg(test)]
#[path = "../tests/terms_tests.rs"]
mod terms_tests;

#[cfg(test)]
#[path = "../tests/transport_tests.rs"]
mod transport_tests;

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod resolver_tests;
