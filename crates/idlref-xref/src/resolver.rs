//! Disambiguation of looked-up candidates and write-back onto occurrences.

use idlref_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use idlref_common::{Diagnostics, Document, ElementId};
use indexmap::IndexSet;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::query::build_query;
use crate::terms::{TermGroups, TermOccurrence, collect_occurrences};
use crate::transport::{Candidate, XrefResponse, XrefTransport};

/// Class added to occurrences that could not be resolved unambiguously.
pub const OFFENDING_CLASS: &str = "respec-offending-element";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XrefOptions {
    /// Classes marking an informative region. `<figure>` always is one.
    pub informative_classes: Vec<String>,
    pub dedupe_queries: bool,
}

impl Default for XrefOptions {
    fn default() -> Self {
        Self {
            informative_classes: ["informative", "note", "example", "issue"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            dedupe_queries: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XrefStats {
    pub terms: usize,
    pub occurrences: usize,
    pub query_keys: usize,
    pub resolved: usize,
    /// Occurrences whose term had no candidate at all.
    pub unmatched: usize,
    /// Single candidate outside the occurrence's cited specs.
    pub rejected: usize,
    pub ambiguous: usize,
    pub lookup_failed: bool,
}

enum Verdict<'c> {
    Accept(&'c Candidate),
    Unmatched,
    OutsideCitedSpecs,
    Ambiguous,
}

#[derive(Clone, Debug, Default)]
pub struct XrefResolver {
    options: XrefOptions,
}

impl XrefResolver {
    pub fn new(options: XrefOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &XrefOptions {
        &self.options
    }

    /// Collect occurrences, send one batched lookup and resolve every
    /// occurrence against its response. A failed lookup leaves the document
    /// untouched apart from a warning.
    #[tracing::instrument(level = "debug", skip_all)]
    pub async fn resolve<T: XrefTransport>(
        &self,
        doc: &mut Document,
        diagnostics: &mut Diagnostics,
        transport: &T,
    ) -> XrefStats {
        let groups = collect_occurrences(doc);
        if groups.is_empty() {
            return XrefStats::default();
        }
        let query = build_query(&groups, self.options.dedupe_queries);
        debug!(terms = groups.len(), keys = query.len(), "sending xref query");

        match transport.lookup(&query).await {
            Ok(response) => {
                let mut stats = self.apply(doc, diagnostics, &groups, &response);
                stats.query_keys = query.len();
                stats
            }
            Err(err) => {
                warn!(error = %err, "xref lookup failed; leaving terms unresolved");
                let message = format_message(
                    diagnostic_messages::XREF_LOOKUP_FAILED,
                    &[err.to_string().as_str()],
                );
                diagnostics.report_warning(
                    None,
                    diagnostic_codes::XREF_LOOKUP_FAILED,
                    message,
                    Some("Lookup failed"),
                );
                XrefStats {
                    terms: groups.len(),
                    occurrences: groups.values().map(Vec::len).sum(),
                    query_keys: query.len(),
                    lookup_failed: true,
                    ..XrefStats::default()
                }
            }
        }
    }

    /// Resolve every occurrence in `groups` against one `response`.
    pub fn apply(
        &self,
        doc: &mut Document,
        diagnostics: &mut Diagnostics,
        groups: &TermGroups,
        response: &XrefResponse,
    ) -> XrefStats {
        let mut stats = XrefStats {
            terms: groups.len(),
            ..XrefStats::default()
        };
        for (term, occurrences) in groups {
            let candidates = response.candidates(term);
            for occurrence in occurrences {
                stats.occurrences += 1;
                match disambiguate(occurrence, candidates) {
                    Verdict::Accept(candidate) => {
                        self.accept(doc, diagnostics, occurrence, candidate);
                        stats.resolved += 1;
                    }
                    Verdict::Unmatched => stats.unmatched += 1,
                    Verdict::OutsideCitedSpecs => {
                        let message = format_message(
                            diagnostic_messages::XREF_NO_MATCHING_SPEC,
                            &[term.as_str(), occurrence.specs.join(", ").as_str()],
                        );
                        offend(
                            doc,
                            diagnostics,
                            occurrence.element,
                            diagnostic_codes::XREF_NO_MATCHING_SPEC,
                            message,
                            "No matching specification",
                        );
                        stats.rejected += 1;
                    }
                    Verdict::Ambiguous => {
                        let specs: IndexSet<&str> =
                            candidates.iter().map(|c| c.spec.as_str()).collect();
                        let specs: Vec<&str> = specs.into_iter().collect();
                        let message = format_message(
                            diagnostic_messages::XREF_AMBIGUOUS,
                            &[term.as_str(), specs.join(", ").as_str()],
                        );
                        offend(
                            doc,
                            diagnostics,
                            occurrence.element,
                            diagnostic_codes::XREF_AMBIGUOUS,
                            message,
                            "Ambiguous term",
                        );
                        stats.ambiguous += 1;
                    }
                }
            }
        }
        debug!(
            resolved = stats.resolved,
            rejected = stats.rejected,
            ambiguous = stats.ambiguous,
            "xref resolution finished"
        );
        stats
    }

    fn accept(
        &self,
        doc: &mut Document,
        diagnostics: &mut Diagnostics,
        occurrence: &TermOccurrence,
        candidate: &Candidate,
    ) {
        let el = occurrence.element;
        let (path, fragment) = candidate.cite_path_and_fragment();
        doc.set_attr(el, "data-cite", candidate.spec.as_str());
        doc.set_attr(el, "data-cite-path", path);
        doc.set_attr(el, "data-cite-frag", fragment);
        trace!(term = %occurrence.term, spec = %candidate.spec, "resolved term");

        if candidate.normative {
            doc.normative_references.insert(candidate.spec.clone());
        } else if self.in_informative_region(doc, el) {
            doc.informative_references.insert(candidate.spec.clone());
        } else {
            let message = format_message(
                diagnostic_messages::XREF_INFORMATIVE_IN_NORMATIVE,
                &[occurrence.term.as_str(), candidate.spec.as_str()],
            );
            diagnostics.report_warning(
                Some(el),
                diagnostic_codes::XREF_INFORMATIVE_IN_NORMATIVE,
                message,
                Some("Informative reference in normative context"),
            );
        }
    }

    fn in_informative_region(&self, doc: &Document, el: ElementId) -> bool {
        doc.closest(el, |e| {
            e.tag == "figure"
                || self
                    .options
                    .informative_classes
                    .iter()
                    .any(|class| e.has_class(class))
        })
        .is_some()
    }
}

/// Exactly one candidate, inside the cited specs when any are cited.
fn disambiguate<'c>(occurrence: &TermOccurrence, candidates: &'c [Candidate]) -> Verdict<'c> {
    match candidates {
        [] => Verdict::Unmatched,
        [only] => {
            let cited = occurrence.specs.is_empty()
                || occurrence
                    .specs
                    .iter()
                    .any(|spec| spec.eq_ignore_ascii_case(&only.spec));
            if cited {
                Verdict::Accept(only)
            } else {
                Verdict::OutsideCitedSpecs
            }
        }
        _ => Verdict::Ambiguous,
    }
}

fn offend(
    doc: &mut Document,
    diagnostics: &mut Diagnostics,
    el: ElementId,
    code: u32,
    message: String,
    short: &str,
) {
    doc.add_class(el, OFFENDING_CLASS);
    diagnostics.report_warning(Some(el), code, message, Some(short));
}
