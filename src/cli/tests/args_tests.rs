use clap::Parser;

use super::args::{CliArgs, OutputFormat};
use crate::config::ProcessOptions;

#[test]
fn parses_defaults() {
    let args = CliArgs::try_parse_from(["idlref", "--document", "spec.json"])
        .expect("default args should parse");

    assert_eq!(args.document, std::path::PathBuf::from("spec.json"));
    assert_eq!(args.format, OutputFormat::Json);
    assert!(args.config.is_none());
    assert!(args.xref_db.is_none());
    assert!(args.out.is_none());
    assert!(!args.no_autofix && !args.no_xref && !args.no_synthesize);
}

#[test]
fn document_is_required() {
    assert!(CliArgs::try_parse_from(["idlref"]).is_err());
}

#[test]
fn overrides_apply_on_top_of_options() {
    let args = CliArgs::try_parse_from([
        "idlref",
        "-d",
        "spec.json",
        "--format",
        "HTML",
        "--xref-db",
        "terms.json",
        "--no-autofix",
        "--no-synthesize",
    ])
    .expect("flagged args should parse");
    assert_eq!(args.format, OutputFormat::Html);
    assert_eq!(
        args.xref_db.as_deref(),
        Some(std::path::Path::new("terms.json"))
    );

    let mut options = ProcessOptions::default();
    args.apply_overrides(&mut options);
    assert!(!options.autofix);
    assert!(!options.synthesize_definitions);
    assert!(options.xref);
}
