//! `fct-describe`: Prints the subjects, focus and filter descriptors of a
//! stored facet query.
//!
//! **Usage:**
//! ```
//! fct-describe <file> [--json] [--config <path>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use fct_clients::{init_logging, load_config, read_tree};
use fct_query::FacetRequest;

/// Describe a stored facet query.
#[derive(Parser)]
#[command(name = "fct-describe", about = "Describe a stored facet query")]
struct Args {
    /// Facet query XML file.
    file: PathBuf,

    /// Print the filter descriptors as JSON.
    #[arg(long)]
    json: bool,

    /// Client configuration (TOML).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let tree = read_tree(&args.file)?;
    let filters = tree.filter_descriptors();

    if args.json {
        let json = serde_json::to_string_pretty(&filters)
            .context("Failed to serialize filter descriptors")?;
        println!("{}", json);
        return Ok(());
    }

    let request = FacetRequest::new(&tree, &config);
    println!("Facet query {}", args.file.display());
    println!("  endpoint: {}", request.endpoint);
    println!("  subjects: {}", tree.subject_count());
    match tree.current_focus_index() {
        Ok(index) => println!("  focus:    ?s{}", index),
        Err(err) => println!("  focus:    none ({})", err),
    }
    if let Ok(kind) = tree.view_kind() {
        println!("  view:     {}", kind.as_str());
    }
    if !tree.query_text().is_empty() {
        println!("  text:     {}", tree.query_text());
    }
    println!();
    for (position, descriptor) in filters.iter().enumerate() {
        println!("[{}] {}", position, descriptor);
    }
    if !filters.unhandled.is_empty() {
        println!();
        println!("{} construct(s) not described", filters.unhandled.len());
    }
    Ok(())
}
