#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;

use idlref::cli::args::CliArgs;
use idlref::cli::driver;

const EXIT_SUCCESS: i32 = 0;
const EXIT_DIAGNOSTIC_ERRORS: i32 = 1;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // IDLREF_LOG / IDLREF_LOG_FORMAT, see src/tracing_config.rs
    idlref::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let color = !args.no_color && std::io::stderr().is_terminal();
    let outcome = driver::run(&args, color).await?;

    match &args.out {
        Some(path) => tokio::fs::write(path, &outcome.output)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{}", outcome.output),
    }
    if !outcome.diagnostics.is_empty() {
        eprintln!("{}", outcome.diagnostics);
    }

    let code = if outcome.has_errors() {
        EXIT_DIAGNOSTIC_ERRORS
    } else {
        EXIT_SUCCESS
    };
    std::process::exit(code);
}
