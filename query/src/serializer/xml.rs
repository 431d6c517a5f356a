//! Facet query XML writer.
//!
//! Produces the compact form posted to the facet service: an XML
//! declaration, then the `<query>` element in the facet namespace, with no
//! whitespace between elements and childless elements written empty.
//! Attribute order is fixed per element so output is deterministic.

use quick_xml::escape::escape;

use crate::model::{Node, NodeId, FACET_NAMESPACE};
use crate::tree::QueryTree;

/// XML declaration that opens every serialized query.
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\"?>";

/// Serializes a query tree to facet query XML.
#[must_use]
pub fn to_xml(tree: &QueryTree) -> String {
    let mut out = String::with_capacity(64 * tree.len() + XML_DECLARATION.len());
    out.push_str(XML_DECLARATION);
    write_element(tree, tree.root(), &mut out);
    out
}

fn yes(flag: bool) -> Option<&'static str> {
    flag.then_some("yes")
}

fn write_element(tree: &QueryTree, id: NodeId, out: &mut String) {
    let Ok(node) = tree.get(id) else {
        return;
    };
    let name = node.element_name();
    let mut attrs: Vec<(&str, Option<String>)> = Vec::new();
    let mut text: &str = "";

    match node {
        Node::Query => {
            let query = tree.query();
            attrs.push(("xmlns", Some(FACET_NAMESPACE.to_owned())));
            attrs.push((
                "same-as",
                query.same_as.map(|on| if on { "yes" } else { "no" }.to_owned()),
            ));
            attrs.push(("inference", query.inference.clone()));
            attrs.push(("graph", query.graph.clone()));
            attrs.push(("timeout", query.timeout.map(|ms| ms.to_string())));
        }
        Node::Class(class) => {
            attrs.push(("iri", Some(class.iri.clone())));
            attrs.push(("exclude", yes(class.exclude).map(str::to_owned)));
            attrs.push(("inference", class.inference.clone()));
        }
        Node::Property(edge) | Node::PropertyOf(edge) => {
            attrs.push(("iri", Some(edge.iri.clone())));
            attrs.push(("exclude", yes(edge.exclude).map(str::to_owned)));
            attrs.push(("same_as", yes(edge.same_as).map(str::to_owned)));
            attrs.push(("inference", edge.inference.clone()));
        }
        Node::Text(node) => {
            attrs.push(("property", node.property.clone()));
            text = &node.text;
        }
        Node::Value(value) => {
            attrs.push(("datatype", value.datatype.clone()));
            attrs.push(("lang", value.lang.clone()));
            if value.in_attribute {
                attrs.push(("val", Some(value.value.clone())));
            } else {
                text = &value.value;
            }
            attrs.push(("op", value.op.clone()));
        }
        Node::Cond(cond) => {
            attrs.push(("datatype", cond.datatype.clone()));
            attrs.push(("xml:lang", cond.lang.clone()));
            attrs.push(("type", Some(cond.cond_type.as_str().to_owned())));
            attrs.push(("neg", cond.negate.then(|| "1".to_owned())));
            text = &cond.value;
        }
        Node::CondParm(opaque) | Node::CondRange(opaque) => {
            for (key, value) in &opaque.attributes {
                attrs.push((key.as_str(), Some(value.clone())));
            }
            text = &opaque.text;
        }
        Node::View(view) => {
            attrs.push(("type", Some(view.kind.as_str().to_owned())));
            attrs.push(("limit", (view.limit > 0).then(|| view.limit.to_string())));
            attrs.push(("offset", Some(view.offset.to_string())));
        }
    }

    out.push('<');
    out.push_str(name);
    for (key, value) in &attrs {
        if let Some(value) = value {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
    }

    let children = tree.children(id);
    if text.is_empty() && children.is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    out.push_str(&escape(text));
    for child in children {
        write_element(tree, *child, out);
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CondType;
    use crate::mutate::PropertyOptions;

    #[test]
    fn skeleton() {
        assert_eq!(
            to_xml(&QueryTree::new()),
            "<?xml version=\"1.0\"?>\
             <query xmlns=\"http://openlinksw.com/services/facets/1.0\">\
             <view type=\"text-d\" limit=\"50\" offset=\"0\"/>\
             </query>"
        );
    }

    #[test]
    fn zero_limit_is_omitted() {
        let mut tree = QueryTree::new();
        tree.set_view_limit(0).unwrap();
        assert!(to_xml(&tree).contains("<view type=\"text-d\" offset=\"0\"/>"));
    }

    #[test]
    fn query_attributes_and_text() {
        let mut tree = QueryTree::new();
        tree.set_same_as(false);
        tree.set_timeout(20_000);
        tree.set_query_text("R&D <labs>");
        let xml = to_xml(&tree);
        assert!(xml.contains(
            "<query xmlns=\"http://openlinksw.com/services/facets/1.0\" same-as=\"no\" timeout=\"20000\">"
        ));
        assert!(xml.contains("<text>R&amp;D &lt;labs&gt;</text>"));
    }

    #[test]
    fn edges_nest_their_constraints() {
        let mut tree = QueryTree::new();
        let s2 = tree
            .add_property(
                "http://schema.org/material",
                1,
                PropertyOptions {
                    same_as: true,
                    ..PropertyOptions::default()
                },
            )
            .unwrap();
        tree.set_focus(s2).unwrap();
        tree.add_condition(CondType::Neq, "asbestos", None, Some("en"), true)
            .unwrap();
        assert_eq!(
            to_xml(&tree),
            "<?xml version=\"1.0\"?>\
             <query xmlns=\"http://openlinksw.com/services/facets/1.0\">\
             <property iri=\"http://schema.org/material\" same_as=\"yes\">\
             <cond xml:lang=\"en\" type=\"neq\" neg=\"1\">asbestos</cond>\
             </property>\
             <view type=\"text-d\" limit=\"50\" offset=\"0\"/>\
             </query>"
        );
    }
}
