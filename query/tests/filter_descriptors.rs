//! Filter descriptors generated from stored facet queries.

use fct_query::{
    CondType, FilterAction, Node, NodeKind, QueryTree, Term, TermKind, UnhandledConstruct,
};

const BUSINESS: &str = include_str!("fixtures/business.xml");
const GEO_CONDITIONS: &str = include_str!("fixtures/geo_conditions.xml");
const LINKED_DATA_TEXT: &str = include_str!("fixtures/linked_data_text.xml");

#[test]
fn business_fixture_yields_eight_descriptors_in_document_order() {
    let tree = QueryTree::from_xml(BUSINESS).unwrap();
    assert_eq!(tree.subject_count(), 5);
    assert_eq!(tree.current_focus_index().unwrap(), 4);

    let filters = tree.filter_descriptors();
    let lines: Vec<String> = filters.iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "?s1 is a <http://schema.org/Business>",
            "?s1 <http://schema.org/makesOffer> ?s2",
            "?s2 <http://schema.org/businessFunction> ?s3",
            "?s3 = <http://purl.org/goodrelations/v1#Dispose>",
            "?s2 <http://schema.org/itemOffered> ?s4",
            "?s4 is a <http://schema.org/Product>",
            "?s4 <http://schema.org/material> ?s5",
            "?s5 = \"asbestos\"",
        ]
    );
    assert!(filters.unhandled.is_empty());

    let kinds: Vec<NodeKind> = filters
        .iter()
        .map(|descriptor| tree.get(descriptor.node).unwrap().kind())
        .collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::Class,
            NodeKind::Property,
            NodeKind::Property,
            NodeKind::Value,
            NodeKind::Property,
            NodeKind::Class,
            NodeKind::Property,
            NodeKind::Value,
        ]
    );
}

#[test]
fn iri_values_are_typed_as_uris() {
    let tree = QueryTree::from_xml(BUSINESS).unwrap();
    let filters = tree.filter_descriptors();
    assert_eq!(
        filters.descriptors[3].object,
        Term {
            kind: TermKind::Uri,
            value: "http://purl.org/goodrelations/v1#Dispose".to_owned(),
        }
    );
    assert_eq!(filters.descriptors[7].object.kind, TermKind::Literal);
}

#[test]
fn unhandled_conditions_do_not_stop_the_walk() {
    let tree = QueryTree::from_xml(GEO_CONDITIONS).unwrap();
    let filters = tree.filter_descriptors();
    let lines: Vec<String> = filters.iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "?s1 is a <http://schema.org/Place>",
            "?s1 <http://dbpedia.org/ontology/elevation> ?s2",
            "?s2 >= 1200",
        ]
    );
    assert_eq!(filters.unhandled.len(), 2);
    assert!(matches!(
        filters.unhandled[0],
        UnhandledConstruct::Condition {
            cond_type: CondType::Near,
            ..
        }
    ));
    assert!(matches!(filters.unhandled[1], UnhandledConstruct::CondRange { .. }));
}

#[test]
fn text_under_a_properties_view_offers_a_requery() {
    let tree = QueryTree::from_xml(LINKED_DATA_TEXT).unwrap();
    let filters = tree.filter_descriptors();
    assert_eq!(filters.len(), 1);
    let text = &filters.descriptors[0];
    assert_eq!(
        text.to_string(),
        "?s1 is the subject of any predicate where the object is associated with linked data"
    );
    assert_eq!(
        text.actions,
        vec![FilterAction::SetView {
            view_type: "text-properties",
            limit: 20,
            offset: 0,
            cno: 0,
        }]
    );
    assert!(matches!(
        tree.get(text.node),
        Ok(Node::Text(node)) if node.default_view
    ));
}

#[test]
fn descriptors_are_json_serializable() {
    let tree = QueryTree::from_xml(BUSINESS).unwrap();
    let json = serde_json::to_value(tree.filter_descriptors()).unwrap();
    let first = &json["descriptors"][0];
    assert_eq!(first["subject"]["value"], "?s1");
    assert_eq!(first["predicate"]["type"], "operator");
    assert_eq!(first["object"]["type"], "uri");
    assert!(first.get("actions").is_none());
    assert_eq!(json["unhandled"].as_array().map(Vec::len), Some(0));
}
