use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::ProcessOptions;

/// CLI arguments for the idlref binary.
#[derive(Parser, Debug)]
#[command(
    name = "idlref",
    version,
    about = "Annotate WebIDL blocks and resolve cross-references in a specification document"
)]
pub struct CliArgs {
    /// Document to process, as a JSON element tree.
    #[arg(short = 'd', long, value_name = "FILE")]
    pub document: PathBuf,

    /// JSON file with processing options.
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// JSON term database answering cross-reference lookups.
    #[arg(long = "xref-db", alias = "xrefDb", value_name = "FILE")]
    pub xref_db: Option<PathBuf>,

    /// Write the processed document here instead of stdout.
    #[arg(short = 'o', long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json, ignore_case = true)]
    pub format: OutputFormat,

    // ==================== Overrides ====================
    /// Report validation issues without rewriting the IDL.
    #[arg(long = "no-autofix")]
    pub no_autofix: bool,

    /// Skip cross-reference resolution.
    #[arg(long = "no-xref")]
    pub no_xref: bool,

    /// Leave names without a `<dfn>` as unlinked references.
    #[arg(long = "no-synthesize")]
    pub no_synthesize: bool,

    /// Disable coloured diagnostics.
    #[arg(long = "no-color")]
    pub no_color: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Html,
}

impl CliArgs {
    /// Apply the command-line overrides on top of file options.
    pub fn apply_overrides(&self, options: &mut ProcessOptions) {
        if self.no_autofix {
            options.autofix = false;
        }
        if self.no_xref {
            options.xref = false;
        }
        if self.no_synthesize {
            options.synthesize_definitions = false;
        }
    }
}
