//! Common types and utilities for the idlref annotation engine.
//!
//! This crate provides foundational types used across all idlref crates:
//! - Diagnostics (`Diagnostic`, `DiagnosticCategory`, `Diagnostics` collector)
//! - The document element arena (`Document`, `ElementId`, `DocumentNode`)
//! - Line/column mapping and context snippets for source excerpts

// Diagnostic types, codes and message templates
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, Diagnostics};

// Document model - element arena the compiler and xref passes annotate
pub mod document;
pub use document::{Child, Document, DocumentNode, Element, ElementId};

// Position types for line/column source locations
pub mod position;
pub use position::{LineMap, Location};

#[cfg(test)]
#[path = "../tests/document_tests.rs"]
mod document_tests;

#[cfg(test)]
#[path = "../tests/position_tests.rs"]
mod position_tests;
