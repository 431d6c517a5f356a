//! Serialization round-trip validator.
//!
//! A stored query is ingested and serialized once; ingesting that output
//! and serializing again must reproduce it byte for byte.

use fct_query::QueryTree;

use super::ingest;
use crate::report::{ConformanceReport, TestResult};
use crate::Document;

const VALIDATOR: &str = "query/roundtrip";

/// Validates the serialization round trip of each document.
#[must_use]
pub fn validate(documents: &[Document]) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    for document in documents {
        let Some(tree) = ingest(document, VALIDATOR, &mut report) else {
            continue;
        };
        let first = tree.to_xml();
        let second = match QueryTree::from_xml(&first) {
            Ok(reread) => reread.to_xml(),
            Err(err) => {
                report.push(TestResult::fail_with_details(
                    VALIDATOR,
                    format!("{}: serialized form does not parse", document.name),
                    vec![err.to_string(), first],
                ));
                continue;
            }
        };
        if first == second {
            report.push(TestResult::pass(
                VALIDATOR,
                format!("{}: {} bytes stable", document.name, first.len()),
            ));
        } else {
            report.push(TestResult::fail_with_details(
                VALIDATOR,
                format!("{}: serialized form changed on re-read", document.name),
                divergence(&first, &second),
            ));
        }
    }
    report
}

/// Both outputs from the first differing byte on.
fn divergence(first: &str, second: &str) -> Vec<String> {
    let at = first
        .char_indices()
        .zip(second.chars())
        .find(|((_, a), b)| a != b)
        .map(|((index, _), _)| index)
        .unwrap_or_else(|| first.len().min(second.len()));
    vec![
        format!("first:  ...{}", first.get(at..).unwrap_or_default()),
        format!("second: ...{}", second.get(at..).unwrap_or_default()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loose_input_still_round_trips() {
        let documents = vec![Document {
            name: "loose.xml".to_owned(),
            source: "<!-- saved from the facet UI -->\n<q:query xmlns:q=\"http://openlinksw.com/services/facets/1.0\" same_as=\"yes\">\n  <q:text>  ski resorts </q:text>\n  <q:view type=\"text-d\" limit=\"\" />\n</q:query>\n".to_owned(),
        }];
        let report = validate(&documents);
        assert!(report.all_passed(), "{:#?}", report.results);
    }

    #[test]
    fn divergence_starts_at_first_difference() {
        assert_eq!(
            divergence("<view limit=\"2\"/>", "<view limit=\"3\"/>"),
            vec!["first:  ...2\"/>".to_owned(), "second: ...3\"/>".to_owned()]
        );
        assert_eq!(
            divergence("<a/>", "<a/><b/>"),
            vec!["first:  ...".to_owned(), "second: ...<b/>".to_owned()]
        );
    }
}
