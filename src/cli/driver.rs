//! One CLI invocation: load inputs, process, render outputs.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use idlref_common::{Document, DocumentNode};
use idlref_xref::StaticXrefDatabase;

use crate::cli::args::{CliArgs, OutputFormat};
use crate::cli::reporter::Reporter;
use crate::config::ProcessOptions;
use crate::pipeline::{DocumentProcessor, ProcessReport};

/// Everything the binary prints or writes.
pub struct RunOutcome {
    pub report: ProcessReport,
    /// The processed document in the requested format.
    pub output: String,
    /// Rendered diagnostics, empty when there were none.
    pub diagnostics: String,
}

impl RunOutcome {
    pub fn has_errors(&self) -> bool {
        self.report.has_errors()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    document: DocumentNode,
    normative_references: Vec<&'a str>,
    informative_references: Vec<&'a str>,
}

pub fn resolve_options(args: &CliArgs) -> Result<ProcessOptions> {
    let mut options = match &args.config {
        Some(path) => ProcessOptions::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ProcessOptions::default(),
    };
    args.apply_overrides(&mut options);
    Ok(options)
}

pub async fn run(args: &CliArgs, color: bool) -> Result<RunOutcome> {
    let options = resolve_options(args)?;
    debug!(?options, "resolved options");

    let text = tokio::fs::read_to_string(&args.document)
        .await
        .with_context(|| format!("failed to read document {}", args.document.display()))?;
    let node: DocumentNode = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse document {}", args.document.display()))?;
    let mut doc = Document::from_node(&node);

    let database = match &args.xref_db {
        Some(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read term database {}", path.display()))?;
            StaticXrefDatabase::from_json(&text)
                .with_context(|| format!("failed to load term database {}", path.display()))?
        }
        None => StaticXrefDatabase::new(),
    };

    let report = DocumentProcessor::new(options)
        .process(&mut doc, &database)
        .await;

    let output = render_document(&doc, args.format)?;
    let diagnostics = Reporter::new(color).render(&doc, report.diagnostics.iter());
    Ok(RunOutcome {
        report,
        output,
        diagnostics,
    })
}

pub fn render_document(doc: &Document, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Html => Ok(doc.to_html(doc.root())),
        OutputFormat::Json => {
            let output = JsonOutput {
                document: doc.to_node(doc.root()),
                normative_references: doc.normative_references.iter().map(String::as_str).collect(),
                informative_references: doc
                    .informative_references
                    .iter()
                    .map(String::as_str)
                    .collect(),
            };
            serde_json::to_string_pretty(&output).context("failed to serialise document")
        }
    }
}
