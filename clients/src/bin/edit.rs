//! `fct-edit`: Applies one structural edit to a stored facet query.
//!
//! Prints the resulting XML, or writes it back with `--in-place`.
//!
//! **Usage:**
//! ```
//! fct-edit <file> [--in-place] [--new] [--config <path>] <command> [args]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fct_clients::{init_logging, load_config, read_tree, EditCommand};
use fct_query::QueryTree;

/// Edit a stored facet query.
#[derive(Parser)]
#[command(name = "fct-edit", about = "Apply one edit to a stored facet query")]
struct Args {
    /// Facet query XML file.
    file: PathBuf,

    /// Write the result back to the file instead of printing it.
    #[arg(long)]
    in_place: bool,

    /// Start from an empty query instead of reading the file.
    #[arg(long)]
    new: bool,

    /// Client configuration (TOML); sets the limit of a new view.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: EditCommand,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let mut tree = if args.new {
        QueryTree::with_config(&config)
    } else {
        read_tree(&args.file)?
    };

    if let Some(note) = args.command.apply(&mut tree)? {
        eprintln!("{}", note);
    }

    let xml = tree.to_xml();
    if args.in_place {
        fs::write(&args.file, &xml)
            .with_context(|| format!("Failed to write {}", args.file.display()))?;
    } else {
        println!("{}", xml);
    }
    Ok(())
}
