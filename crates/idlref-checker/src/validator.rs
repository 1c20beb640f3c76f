//! Turn validation issues into diagnostics, applying autofixes on request.

use idlref_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use idlref_common::{Diagnostics, ElementId, LineMap};
use idlref_parser::{IdlArena, NodeId, write};
use tracing::{debug, info};

use crate::rules::validate;

/// One compiled block as seen by the validator.
#[derive(Clone, Copy, Debug)]
pub struct ValidationBlock<'a> {
    pub element: ElementId,
    /// Block text the definitions were parsed from.
    pub source: &'a str,
    pub definitions: &'a [NodeId],
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Validator {
    autofix: bool,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrite the tree for every issue that has a fix, and show the fixed
    /// block text in the diagnostic.
    #[must_use]
    pub fn with_autofix(mut self, enabled: bool) -> Self {
        self.autofix = enabled;
        self
    }

    /// Validate `blocks` together and report one error per issue. Returns the
    /// number of issues found.
    #[tracing::instrument(level = "debug", skip_all, fields(blocks = blocks.len()))]
    pub fn run(
        &self,
        arena: &mut IdlArena,
        blocks: &[ValidationBlock<'_>],
        diagnostics: &mut Diagnostics,
    ) -> usize {
        let definitions: Vec<&[NodeId]> = blocks.iter().map(|b| b.definitions).collect();
        let issues = validate(arena, &definitions);
        if issues.is_empty() {
            return 0;
        }
        info!(issues = issues.len(), "IDL validation issues");

        for issue in &issues {
            let Some(block) = blocks.get(issue.block) else {
                continue;
            };
            let offset = arena.get(issue.node).span.start;
            let mut detail = LineMap::build(block.source).context_snippet(block.source, offset, 1);
            if self.autofix
                && let Some(fix) = &issue.autofix
            {
                fix.apply(arena);
                debug!(rule = issue.rule, "autofix applied");
                detail.push_str("\n\nTry fixing as:\n");
                detail.push_str(&write(arena, block.definitions));
            }
            let message = format_message(
                diagnostic_messages::IDL_VALIDATION,
                &[issue.rule, issue.message.as_str()],
            );
            diagnostics.report_error(
                Some(block.element),
                diagnostic_codes::IDL_VALIDATION,
                message,
                Some(&issue.message),
                Some(detail),
            );
        }
        issues.len()
    }
}
