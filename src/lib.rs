//! idlref: WebIDL annotation and cross-reference resolution.
//!
//! The work is split across the workspace crates; this crate wires them into
//! a per-document pipeline and hosts the CLI.
//!
//! - `idlref_parser` - IDL text to an arena of definition nodes
//! - `idlref_binder` - anchor ids, definition lookup and linking
//! - `idlref_emitter` - block markup
//! - `idlref_checker` - validation and autofixes
//! - `idlref_xref` - term lookup and disambiguation

pub use idlref_binder as binder;
pub use idlref_checker as checker;
pub use idlref_common as common;
pub use idlref_emitter as emitter;
pub use idlref_parser as parser;
pub use idlref_xref as xref;

pub use idlref_common::{Diagnostic, DiagnosticCategory, Diagnostics, Document, DocumentNode};

// Options for one processing run
pub mod config;
pub use config::{ConfigError, ProcessOptions};

// Compile -> validate -> local links -> xref
pub mod pipeline;
pub use pipeline::{BlockSummary, DocumentProcessor, ProcessReport};

pub mod tracing_config;

pub mod cli;

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;

#[cfg(test)]
#[path = "tests/pipeline_tests.rs"]
mod pipeline_tests;
