//! Filter descriptor validator.
//!
//! Runs the filter walk over each document. Constructs the walk has no
//! descriptor for (`near` conditions, `cond-parm`, `cond-range`) are
//! reported as warnings; they never fail a document.

use fct_query::{NodeId, QueryTree, UnhandledConstruct};

use super::ingest;
use crate::report::{ConformanceReport, TestResult};
use crate::Document;

const VALIDATOR: &str = "query/filters";

/// Validates the filter descriptors of each document.
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
    let filters = tree.filter_descriptors();
    for construct in &filters.unhandled {
        report.push(TestResult::warn(
            VALIDATOR,
            format!("{}: {}", name, describe(tree, construct)),
        ));
    }
    report.push(TestResult::pass(
        VALIDATOR,
        format!("{}: {} filter descriptors", name, filters.len()),
    ));
}

fn describe(tree: &QueryTree, construct: &UnhandledConstruct) -> String {
    let at = |node: NodeId| {
        tree.subject_index_of(node)
            .map(|index| format!("?s{}", index))
            .unwrap_or_else(|_| format!("node {}", node.get()))
    };
    match construct {
        UnhandledConstruct::Condition { node, cond_type } => {
            format!("{} condition on {} is not described", cond_type.as_str(), at(*node))
        }
        UnhandledConstruct::CondParm { node } => format!("cond-parm on {} is not described", at(*node)),
        UnhandledConstruct::CondRange { node } => format!("cond-range on {} is not described", at(*node)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn geo_conditions_warn_without_failing() {
        let documents = vec![Document {
            name: "geo".to_owned(),
            source: fixtures::GEO_CONDITIONS.to_owned(),
        }];
        let report = validate(&documents);
        let messages: Vec<&str> = report.results.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "geo: near condition on ?s1 is not described",
                "geo: cond-range on ?s1 is not described",
                "geo: 3 filter descriptors",
            ]
        );
        assert!(report.all_passed());
    }

    #[test]
    fn business_fixture_has_eight_descriptors() {
        let documents = vec![Document {
            name: "business".to_owned(),
            source: fixtures::BUSINESS.to_owned(),
        }];
        let report = validate(&documents);
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].message, "business: 8 filter descriptors");
    }
}
