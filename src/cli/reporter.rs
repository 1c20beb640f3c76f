use colored::Colorize;

use idlref_common::{Diagnostic, DiagnosticCategory, Document, ElementId};

/// Renders diagnostics for the terminal, naming the element each one is
/// attached to.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render<'d>(
        &self,
        doc: &Document,
        diagnostics: impl IntoIterator<Item = &'d Diagnostic>,
    ) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.into_iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(doc, diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&self, doc: &Document, diagnostic: &Diagnostic) -> String {
        let mut output = match diagnostic.element {
            Some(el) => describe_element(doc, el),
            None => "<document>".to_string(),
        };
        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        output.push(' ');
        output.push_str(&self.format_code(diagnostic.code));
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        if let Some(detail) = &diagnostic.detail {
            for line in detail.lines() {
                output.push_str("\n    ");
                output.push_str(line);
            }
        }
        output
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
        };
        if !self.color {
            return label.to_string();
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        let label = format!("IDL{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}

/// `<tag#id>`, or `<tag>` inside the nearest ancestor that has an id.
pub fn describe_element(doc: &Document, el: ElementId) -> String {
    if let Some(id) = doc.attr(el, "id") {
        return format!("<{}#{id}>", doc.tag(el));
    }
    let anchored = doc
        .ancestors(el)
        .find_map(|a| doc.attr(a, "id").map(|id| format!(" in <{}#{id}>", doc.tag(a))));
    format!("<{}>{}", doc.tag(el), anchored.unwrap_or_default())
}
