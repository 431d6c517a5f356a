//! Facet queries always checked by [`crate::run_all`].
//!
//! Stored under `conformance/fixtures/` so the package builds on its own.
//! `query/tests/fixtures/` keeps copies for the `fct-query` integration tests.

use crate::Document;

/// Business offering asbestos-based products: classes, nested properties, values.
pub const BUSINESS: &str = include_str!("../fixtures/business.xml");
/// Ski resorts by keyword, focused on a property.
pub const SKI_RESORTS: &str = include_str!("../fixtures/ski_resorts.xml");
/// People typed with a FOAF class and nothing else.
pub const FOAF_PEOPLE: &str = include_str!("../fixtures/foaf_people.xml");
/// Free text under a properties view, with graph and timeout set.
pub const LINKED_DATA_TEXT: &str = include_str!("../fixtures/linked_data_text.xml");
/// Geographic conditions the filter walk does not describe.
pub const GEO_CONDITIONS: &str = include_str!("../fixtures/geo_conditions.xml");

const ALL: [(&str, &str); 5] = [
    ("business", BUSINESS),
    ("ski_resorts", SKI_RESORTS),
    ("foaf_people", FOAF_PEOPLE),
    ("linked_data_text", LINKED_DATA_TEXT),
    ("geo_conditions", GEO_CONDITIONS),
];

/// The built-in fixtures as documents named `fixture:<name>`.
#[must_use]
pub fn documents() -> Vec<Document> {
    ALL.iter()
        .map(|(name, source)| Document {
            name: format!("fixture:{}", name),
            source: (*source).to_owned(),
        })
        .collect()
}
