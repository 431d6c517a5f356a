//! `fct-conformance`: Validates stored facet queries against the tree invariants.
//!
//! Runs the structure, round-trip and filter validators over the built-in
//! fixtures and every `*.xml` file under `--documents`.
//!
//! **Usage:**
//! ```
//! fct-conformance [--documents <dir>] [--json]
//! ```
//!
//! Exits non-zero if any conformance check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use fct_clients::init_logging;
use fct_conformance::{run_all, Severity, WorkspacePaths};

/// Run the facet query conformance suite.
#[derive(Parser)]
#[command(
    name = "fct-conformance",
    about = "Validate stored facet queries against the tree invariants"
)]
struct Args {
    /// Directory searched recursively for `*.xml` facet queries.
    #[arg(long)]
    documents: Option<PathBuf>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let paths = WorkspacePaths {
        documents: args.documents,
    };
    let report = run_all(&paths)?;

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", json);
    } else {
        println!("Facet Query Conformance Report");
        println!("==============================");
        println!();
        for result in &report.results {
            println!("[{}] {}: {}", result.severity.as_str(), result.validator, result.message);
            for detail in &result.details {
                println!("       {}", detail);
            }
        }
        println!();
        println!(
            "Summary: {} passed, {} warnings, {} failed",
            report.count(Severity::Pass),
            report.count(Severity::Warning),
            report.failure_count()
        );
    }

    let failed = report.failure_count();
    if failed > 0 {
        eprintln!("Conformance FAILED: {} check(s) did not pass.", failed);
        process::exit(1);
    }
    if !args.json {
        println!("Conformance PASSED.");
    }
    Ok(())
}
