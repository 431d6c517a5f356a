//! Tree structure validator.
//!
//! Verifies the invariants the mutators maintain:
//! - exactly one `view` node;
//! - the view sits under `query`, `property` or `property-of`;
//! - no node carries more than one `class` child.

use fct_query::{NodeKind, QueryTree};

use super::ingest;
use crate::report::{ConformanceReport, TestResult};
use crate::Document;

const VALIDATOR: &str = "query/structure";

/// Validates the structure of each document.
#[must_use]
pub fn validate(documents: &[Document]) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    for document in documents {
        if let Some(tree) = ingest(document, VALIDATOR, &mut report) {
            check(&document.name, &tree, &mut report);
        }
    }
    report
}

fn check(name: &str, tree: &QueryTree, report: &mut ConformanceReport) {
    let mut problems = Vec::new();

    let views = tree.view_count();
    if views != 1 {
        problems.push(format!("{} view nodes, expected 1", views));
    } else if let Ok(host) = tree.focus_node() {
        let hosted = tree.get(host).map(|node| node.opens_subject()).unwrap_or(false);
        if !hosted {
            let kind = tree.get(host).map(|node| node.kind().element_name()).unwrap_or("?");
            problems.push(format!("view is hosted by a {} node", kind));
        }
    }

    for id in tree.pre_order() {
        let classes = tree.children_of_kind(id, NodeKind::Class).count();
        if classes > 1 {
            let subject = tree
                .subject_index_of(id)
                .map(|index| format!("?s{}", index))
                .unwrap_or_else(|_| format!("node {}", id.get()));
            problems.push(format!("{} classes on {}", classes, subject));
        }
    }

    if problems.is_empty() {
        report.push(TestResult::pass(
            VALIDATOR,
            format!("{}: {} subjects, one view", name, tree.subject_count()),
        ));
    } else {
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            format!("{}: tree invariants violated", name),
            problems,
        ));
    }
}
