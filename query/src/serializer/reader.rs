//! Facet query XML reader.
//!
//! Accepts what the writer produces plus the looser forms found in stored
//! queries: a leading declaration, comments, indentation, namespace
//! prefixes on element names, `same_as` or `same-as`, `lang` or
//! `xml:lang`, and `<value>` payloads given either inline or in a `val`
//! attribute.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

use crate::error::{FacetError, Result};
use crate::model::{
    ClassNode, CondNode, CondType, Node, NodeId, OpaqueNode, PropertyNode, QueryNode, TextNode,
    ValueNode, ViewKind, ViewNode,
};
use crate::tree::QueryTree;

/// Deepest element nesting accepted, counting `<query>` as 1. The writer
/// and the filter walk recurse once per level.
pub const MAX_DEPTH: usize = 256;

/// An attribute with its qualified and local names.
struct Attr {
    name: String,
    local: String,
    value: String,
}

/// An element whose end tag has not been read yet.
struct Open {
    id: NodeId,
    text: String,
}

fn parse_error(message: impl Into<String>) -> FacetError {
    FacetError::Parse(message.into())
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|err| parse_error(format!("invalid UTF-8: {}", err)))
}

fn attributes(start: &BytesStart<'_>) -> Result<Vec<Attr>> {
    let mut out = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        out.push(Attr {
            name: utf8(attr.key.as_ref())?.to_owned(),
            local: utf8(attr.key.local_name().as_ref())?.to_owned(),
            value: attr.unescape_value()?.into_owned(),
        });
    }
    Ok(out)
}

fn lookup<'a>(attrs: &'a [Attr], names: &[&str]) -> Option<&'a str> {
    attrs
        .iter()
        .find(|attr| names.contains(&attr.local.as_str()))
        .map(|attr| attr.value.as_str())
}

fn owned(attrs: &[Attr], names: &[&str]) -> Option<String> {
    lookup(attrs, names)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

fn flag(attrs: &[Attr], names: &[&str]) -> bool {
    matches!(
        lookup(attrs, names).map(str::to_ascii_lowercase).as_deref(),
        Some("yes" | "true" | "1" | "on")
    )
}

fn number(attrs: &[Attr], name: &str) -> Result<Option<u64>> {
    match lookup(attrs, &[name]).map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| parse_error(format!("{} must be a non-negative integer, got '{}'", name, raw))),
    }
}

fn query_node(attrs: &[Attr]) -> Result<QueryNode> {
    let same_as = match lookup(attrs, &["same-as", "same_as"]) {
        Some("yes") => Some(true),
        Some("no") => Some(false),
        _ => None,
    };
    Ok(QueryNode {
        graph: owned(attrs, &["graph"]),
        timeout: number(attrs, "timeout")?,
        inference: owned(attrs, &["inference"]),
        same_as,
    })
}

fn edge(attrs: &[Attr], element: &str) -> Result<PropertyNode> {
    let iri = owned(attrs, &["iri"])
        .ok_or_else(|| parse_error(format!("<{}> without iri", element)))?;
    Ok(PropertyNode {
        iri,
        exclude: flag(attrs, &["exclude"]),
        same_as: flag(attrs, &["same_as", "same-as"]),
        inference: owned(attrs, &["inference"]),
    })
}

/// Builds the node for a non-root element. Text content is filled in when
/// the element closes.
fn node(name: &str, attrs: Vec<Attr>) -> Result<Node> {
    let node = match name {
        "class" => Node::Class(ClassNode {
            iri: owned(&attrs, &["iri"]).ok_or_else(|| parse_error("<class> without iri"))?,
            exclude: flag(&attrs, &["exclude"]),
            inference: owned(&attrs, &["inference"]),
        }),
        "property" => Node::Property(edge(&attrs, name)?),
        "property-of" => Node::PropertyOf(edge(&attrs, name)?),
        "text" | "text-d" => Node::Text(TextNode {
            text: String::new(),
            property: owned(&attrs, &["property"]),
            default_view: name == "text-d",
        }),
        "value" => {
            let val = lookup(&attrs, &["val"]);
            Node::Value(ValueNode {
                value: val.unwrap_or_default().to_owned(),
                op: owned(&attrs, &["op"]),
                datatype: owned(&attrs, &["datatype"]),
                lang: owned(&attrs, &["lang"]),
                in_attribute: val.is_some(),
            })
        }
        "cond" => {
            let raw = lookup(&attrs, &["type"]).unwrap_or_default();
            let cond_type = CondType::from_name(raw)
                .ok_or_else(|| parse_error(format!("unknown condition type '{}'", raw)))?;
            Node::Cond(CondNode {
                cond_type,
                value: String::new(),
                datatype: owned(&attrs, &["datatype"]),
                lang: owned(&attrs, &["lang"]),
                negate: flag(&attrs, &["neg"]),
            })
        }
        "cond-parm" | "cond-range" => {
            let opaque = OpaqueNode {
                attributes: attrs.into_iter().map(|attr| (attr.name, attr.value)).collect(),
                text: String::new(),
            };
            if name == "cond-parm" {
                Node::CondParm(opaque)
            } else {
                Node::CondRange(opaque)
            }
        }
        "view" => {
            let kind = match lookup(&attrs, &["type"]) {
                None | Some("") => ViewKind::DEFAULT,
                Some(raw) => ViewKind::from_name(raw)
                    .ok_or_else(|| parse_error(format!("unknown view type '{}'", raw)))?,
            };
            Node::View(ViewNode {
                kind,
                limit: number(&attrs, "limit")?.unwrap_or(0),
                offset: number(&attrs, "offset")?.unwrap_or(0),
            })
        }
        "query" => return Err(parse_error("<query> cannot be nested")),
        other => return Err(parse_error(format!("unknown element <{}>", other))),
    };
    Ok(node)
}

/// Incremental tree builder driven by reader events.
#[derive(Default)]
struct Builder {
    tree: Option<QueryTree>,
    open: Vec<Open>,
    finished: bool,
}

impl Builder {
    fn start(&mut self, start: &BytesStart<'_>) -> Result<NodeId> {
        let local = start.local_name();
        let name = utf8(local.as_ref())?;
        let attrs = attributes(start)?;
        if self.finished {
            return Err(parse_error(format!("<{}> after the end of <query>", name)));
        }
        let Some(tree) = self.tree.as_mut() else {
            if name != "query" {
                return Err(parse_error(format!(
                    "expected <query> as root element, found <{}>",
                    name
                )));
            }
            let tree = QueryTree::with_root(query_node(&attrs)?);
            let root = tree.root();
            self.tree = Some(tree);
            return Ok(root);
        };
        let parent = self
            .open
            .last()
            .map(|open| open.id)
            .ok_or_else(|| parse_error("more than one root element"))?;
        if self.open.len() >= MAX_DEPTH {
            return Err(parse_error(format!(
                "<{}> nested deeper than {} elements",
                name, MAX_DEPTH
            )));
        }
        tree.append(parent, node(name, attrs)?)
    }

    fn text(&mut self, text: &str) -> Result<()> {
        match self.open.last_mut() {
            Some(top) => top.text.push_str(text),
            None if text.trim().is_empty() => {}
            None => return Err(parse_error("text outside <query>")),
        }
        Ok(())
    }

    fn end(&mut self, element: Open) -> Result<()> {
        if self.open.is_empty() {
            self.finished = true;
        }
        let tree = self
            .tree
            .as_mut()
            .ok_or_else(|| parse_error("end tag without <query>"))?;
        let text = element.text;
        let node = tree.get_mut(element.id)?;
        match node {
            Node::Text(node) => node.text = text,
            Node::Cond(cond) => cond.value = text,
            Node::CondParm(opaque) | Node::CondRange(opaque) => opaque.text = text,
            Node::Value(value) if !value.in_attribute => value.value = text,
            other if !text.trim().is_empty() => {
                return Err(parse_error(format!(
                    "unexpected text in <{}>",
                    other.element_name()
                )));
            }
            _ => {}
        }
        Ok(())
    }
}

/// Parses facet query XML into a tree.
///
/// The result is not checked against the view invariants: a stored query
/// with no view, or with two, is returned as written.
///
/// # Errors
///
/// [`FacetError::Xml`] for malformed XML and [`FacetError::Parse`] for a
/// document that is not a facet query (wrong root, unknown element,
/// unknown `type` value, non-numeric `limit`/`offset`/`timeout`, nesting
/// deeper than [`MAX_DEPTH`]).
pub fn from_xml(source: &str) -> Result<QueryTree> {
    let mut reader = Reader::from_str(source);
    let mut builder = Builder::default();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let id = builder.start(&start)?;
                builder.open.push(Open {
                    id,
                    text: String::new(),
                });
            }
            Event::Empty(start) => {
                let id = builder.start(&start)?;
                builder.end(Open {
                    id,
                    text: String::new(),
                })?;
            }
            Event::End(_) => {
                let element = builder
                    .open
                    .pop()
                    .ok_or_else(|| parse_error("unbalanced end tag"))?;
                builder.end(element)?;
            }
            Event::Text(text) => builder.text(&text.unescape()?)?,
            Event::CData(data) => builder.text(utf8(&data)?)?,
            Event::Eof => break,
            // Declaration, comments, processing instructions, doctype.
            _ => {}
        }
    }

    if !builder.open.is_empty() {
        return Err(parse_error("unexpected end of document"));
    }
    let tree = builder
        .tree
        .ok_or_else(|| parse_error("document has no <query> element"))?;
    debug!(nodes = tree.len(), subjects = tree.subject_count(), "parsed facet query");
    Ok(tree)
}
