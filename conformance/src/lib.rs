//! Facet query conformance suite.
//!
//! Checks stored facet-query documents against the invariants every
//! [`fct_query::QueryTree`] must keep, and reports each check as a pass,
//! warning or failure.
//!
//! # Conformance Scope
//!
//! | Validator | Checks |
//! |-----------|--------|
//! | `query/structure` | exactly one view, hosted by a subject-introducing node; at most one class per node |
//! | `query/roundtrip` | serialize, ingest, serialize again yields identical bytes |
//! | `query/filters` | the filter walk completes; unhandled constructs are warnings |
//!
//! # Entry Point
//!
//! ```
//! use fct_conformance::{run_all, WorkspacePaths};
//!
//! let report = run_all(&WorkspacePaths { documents: None })?;
//! assert!(report.all_passed());
//! # Ok::<(), anyhow::Error>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod fixtures;
pub mod report;
pub mod validators;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;
use walkdir::WalkDir;

pub use report::{ConformanceReport, Severity, TestResult};

/// Paths required by the conformance runner.
#[derive(Debug, Clone, Default)]
pub struct WorkspacePaths {
    /// Directory searched recursively for `*.xml` facet queries.
    /// `None` checks the built-in fixtures only.
    pub documents: Option<PathBuf>,
}

/// A serialized facet query and the name it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File path, or `fixture:<name>` for built-in documents.
    pub name: String,
    /// Raw XML.
    pub source: String,
}

/// Reads every `*.xml` file below `dir`, sorted by path.
///
/// # Errors
///
/// Returns an error if the directory cannot be walked or a file cannot be read.
pub fn load_documents(dir: &Path) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "xml") {
            continue;
        }
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        documents.push(Document {
            name: path.display().to_string(),
            source,
        });
    }
    debug!(dir = %dir.display(), count = documents.len(), "loaded facet documents");
    Ok(documents)
}

/// Runs all validators over the built-in fixtures and the documents under
/// `paths.documents`, and returns the aggregated report.
///
/// Validators are run in this order:
/// 1. Tree structure
/// 2. Serialization round trip
/// 3. Filter descriptors
///
/// # Errors
///
/// Returns an error only if a file system operation fails. Documents that
/// do not parse are reported as failures.
pub fn run_all(paths: &WorkspacePaths) -> Result<ConformanceReport> {
    let mut documents = fixtures::documents();
    if let Some(dir) = &paths.documents {
        documents.extend(load_documents(dir)?);
    }

    let mut report = ConformanceReport::new();
    report.extend(validators::structure::validate(&documents));
    report.extend(validators::roundtrip::validate(&documents));
    report.extend(validators::filters::validate(&documents));
    Ok(report)
}
