//! Suite generation runner.
//!
//! Streams the generated conformance suite to stdout; the catalogue is
//! embedded in the library, so there are no flags and no input files. A JSON
//! run summary goes to stderr, keeping stdout byte-stable for redirection
//! into the target crate's test tree:
//!
//! ```text
//! cotejar-gen > tests/trueno_parity.rs
//! ```

use std::io::{self, Write};
use std::process::ExitCode;

use colored::Colorize;

use cotejar::suite::{RustBackend, Session};

fn main() -> ExitCode {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    let backend = RustBackend::default();
    let mut session = Session::new();

    let summary = match session.generate(&backend, &mut out) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("{} {e}", "generation failed:".red().bold());
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = out.flush() {
        eprintln!("{} {e}", "generation failed:".red().bold());
        return ExitCode::FAILURE;
    }

    eprintln!(
        "{} {} cases",
        "generated".green().bold(),
        summary.total()
    );
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => eprintln!("{json}"),
        Err(e) => eprintln!("summary serialization failed: {e}"),
    }
    ExitCode::SUCCESS
}
