//! Validators run by [`crate::run_all`], one module per concern.

pub mod filters;
pub mod roundtrip;
pub mod structure;

use fct_query::QueryTree;

use crate::report::{ConformanceReport, TestResult};
use crate::Document;

/// Ingests `document`, recording a failure under `validator` if it is
/// empty or does not parse.
fn ingest(document: &Document, validator: &str, report: &mut ConformanceReport) -> Option<QueryTree> {
    if document.source.trim().is_empty() {
        report.push(TestResult::fail(
            validator,
            format!("{}: empty document", document.name),
        ));
        return None;
    }
    match QueryTree::from_xml(&document.source) {
        Ok(tree) => Some(tree),
        Err(err) => {
            report.push(TestResult::fail_with_details(
                validator,
                format!("{}: not a facet query", document.name),
                vec![err.to_string()],
            ));
            None
        }
    }
}
