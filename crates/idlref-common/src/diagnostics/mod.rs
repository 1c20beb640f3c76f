//! Diagnostic types and message lookup.
//!
//! Message templates live in `data.rs` and use `{0}`, `{1}` placeholders
//! filled in by [`format_message`].
//!
//! Nothing reported here aborts a document build: the collector only records
//! what happened so the caller can render it next to the offending element.

use serde::Serialize;

use crate::document::ElementId;

mod data;
pub use data::{DIAGNOSTIC_MESSAGES, diagnostic_codes, diagnostic_messages};

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
}

/// A single issue surfaced to the document author.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub message_text: String,
    /// One-line title shown where the full message does not fit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_message: Option<String>,
    /// Extra text such as a context snippet or a fixed rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// The element the diagnostic is attached to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<ElementId>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    #[must_use]
    pub const fn error(element: Option<ElementId>, message: String, code: u32) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code,
            message_text: message,
            short_message: None,
            detail: None,
            element,
        }
    }

    /// Create a new warning diagnostic.
    #[must_use]
    pub const fn warning(element: Option<ElementId>, message: String, code: u32) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            code,
            message_text: message,
            short_message: None,
            detail: None,
            element,
        }
    }

    #[must_use]
    pub fn with_short_message(mut self, short: impl Into<String>) -> Self {
        self.short_message = Some(short.into());
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

// =============================================================================
// Collector
// =============================================================================

/// Run-scoped diagnostics collector.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error against `element`.
    pub fn report_error(
        &mut self,
        element: Option<ElementId>,
        code: u32,
        message: impl Into<String>,
        short_message: Option<&str>,
        detail: Option<String>,
    ) {
        let mut diag = Diagnostic::error(element, message.into(), code);
        diag.short_message = short_message.map(str::to_string);
        diag.detail = detail;
        self.items.push(diag);
    }

    /// Record a warning against `element`.
    pub fn report_warning(
        &mut self,
        element: Option<ElementId>,
        code: u32,
        message: impl Into<String>,
        short_message: Option<&str>,
    ) {
        let mut diag = Diagnostic::warning(element, message.into(), code);
        diag.short_message = short_message.map(str::to_string);
        self.items.push(diag);
    }

    pub fn push(&mut self, diag: Diagnostic) {
        self.items.push(diag);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(Diagnostic::is_error)
    }

    /// All diagnostics carrying `code`, in report order.
    pub fn with_code(&self, code: u32) -> Vec<&Diagnostic> {
        self.items.iter().filter(|d| d.code == code).collect()
    }

    pub fn count(&self, category: DiagnosticCategory) -> usize {
        self.items.iter().filter(|d| d.category == category).count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// =============================================================================
// Message lookup
// =============================================================================

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}
