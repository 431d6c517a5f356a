//! SPARQL-like filter descriptors.
//!
//! One pre-order walk of the tree yields one descriptor per constraint, in
//! document order. Each descriptor keeps the handle of the node it came
//! from, so a UI can drop a filter by position
//! ([`QueryTree::remove_filter`]).
//!
//! | Node | Descriptor |
//! |------|------------|
//! | `class` | `?sN is a <class>` / `?sN is not a <class>` |
//! | `property` | `?sN <p> ?sM` / `?sN does not have property <p> ?sM` |
//! | `property-of` | `?sM <p> ?sN` |
//! | `text` with `property` | `?sN has <p> containing text "…"` |
//! | `text` | free-text forms, chosen by the focus view kind |
//! | `value` | `?sN op literal-or-IRI` |
//! | `cond` (comparisons) | `?sN op number` |
//!
//! `cond` of type `contains`, `in` or `near`, `cond-parm` and `cond-range`
//! produce no descriptor; they are collected as [`UnhandledConstruct`]s
//! and logged.

use serde::Serialize;
use tracing::{trace, warn};

use crate::literal::{self, ResolvedValue};
use crate::model::{CondNode, CondType, Node, NodeId, NodeKind, ViewKind};
use crate::tree::QueryTree;

/// View kind a free-text filter asks the UI to switch to.
pub const TEXT_PROPERTIES_VIEW: &str = "text-properties";

/// Role of a descriptor term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TermKind {
    /// A subject variable such as `?s2`.
    Variable,
    /// A relation phrase or comparison operator.
    Operator,
    /// An IRI, without angle brackets.
    Uri,
    /// A rendered literal.
    Literal,
    /// A numeric condition operand.
    Number,
}

/// One position of a descriptor triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Term {
    /// What the value denotes.
    #[serde(rename = "type")]
    pub kind: TermKind,
    /// Display value.
    pub value: String,
}

impl Term {
    fn variable(subject: usize) -> Self {
        Self {
            kind: TermKind::Variable,
            value: format!("?s{}", subject),
        }
    }

    fn operator(value: impl Into<String>) -> Self {
        Self {
            kind: TermKind::Operator,
            value: value.into(),
        }
    }

    fn new(kind: TermKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// A follow-up query a UI may offer next to a descriptor. Inert here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "args", rename_all = "camelCase")]
pub enum FilterAction {
    /// Re-run the query with another view.
    #[serde(rename_all = "camelCase")]
    SetView {
        /// Target view kind.
        view_type: &'static str,
        /// Row limit of the current view.
        limit: u64,
        /// Row offset of the re-run (always 0).
        offset: u64,
        /// Number of conditions met before this filter in the walk.
        cno: usize,
    },
}

/// A subject-predicate-object description of one constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterDescriptor {
    /// Node the descriptor was generated from.
    pub node: NodeId,
    /// Subject.
    pub subject: Term,
    /// Predicate.
    pub predicate: Term,
    /// Object.
    pub object: Term,
    /// Follow-up queries offered for this filter.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<FilterAction>,
}

impl std::fmt::Display for FilterDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |term: &Term| match term.kind {
            TermKind::Uri => format!("<{}>", term.value),
            _ => term.value.clone(),
        };
        write!(
            f,
            "{} {} {}",
            show(&self.subject),
            show(&self.predicate),
            show(&self.object)
        )
    }
}

/// A construct the walker met but has no descriptor shape for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "construct", rename_all = "kebab-case")]
pub enum UnhandledConstruct {
    /// A `cond` whose type has no comparison operator.
    Condition {
        /// The `cond` node.
        node: NodeId,
        /// Its type.
        cond_type: CondType,
    },
    /// A `cond-parm` node.
    CondParm {
        /// The node.
        node: NodeId,
    },
    /// A `cond-range` node.
    CondRange {
        /// The node.
        node: NodeId,
    },
}

/// Output of one walk: descriptors in document order plus skipped constructs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSet {
    /// Descriptors in pre-order.
    pub descriptors: Vec<FilterDescriptor>,
    /// Constructs that produced no descriptor.
    pub unhandled: Vec<UnhandledConstruct>,
}

impl FilterSet {
    /// Number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// True if no descriptor was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptor at `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&FilterDescriptor> {
        self.descriptors.get(position)
    }

    /// Iterates the descriptors in order.
    pub fn iter(&self) -> std::slice::Iter<'_, FilterDescriptor> {
        self.descriptors.iter()
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a FilterDescriptor;
    type IntoIter = std::slice::Iter<'a, FilterDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl QueryTree {
    /// Walks the tree once and returns its filter descriptors.
    ///
    /// A tree without a view still yields descriptors; free-text filters
    /// then take their generic form.
    #[must_use]
    pub fn filter_descriptors(&self) -> FilterSet {
        let mut walk = Walk {
            tree: self,
            focus: self.current_focus_index().unwrap_or(0),
            view_limit: self.view_limit().unwrap_or(0),
            max_subject: 0,
            conditions: 0,
            out: FilterSet::default(),
        };
        walk.node(self.root(), 1, 1);
        walk.out
    }
}

/// Traversal state threaded through the recursive walk.
struct Walk<'a> {
    tree: &'a QueryTree,
    /// Subject index hosting the view (0 without a view).
    focus: usize,
    view_limit: u64,
    /// Highest subject index handed out so far.
    max_subject: usize,
    /// Conditions (class, value, cond) met so far.
    conditions: usize,
    out: FilterSet,
}

impl Walk<'_> {
    fn children(&mut self, id: NodeId, subject: usize, level: usize) {
        for child in self.tree.children(id) {
            self.node(*child, subject, level);
        }
    }

    fn emit(&mut self, node: NodeId, subject: Term, predicate: Term, object: Term) {
        self.out.descriptors.push(FilterDescriptor {
            node,
            subject,
            predicate,
            object,
            actions: Vec::new(),
        });
    }

    fn node(&mut self, id: NodeId, subject: usize, level: usize) {
        let Ok(node) = self.tree.get(id) else {
            return;
        };
        trace!(element = node.element_name(), subject, level, "describe node");

        match node {
            Node::Query => {
                self.max_subject = 1;
                self.children(id, 1, level + 1);
            }
            Node::Class(class) => {
                let predicate = if class.exclude { "is not a" } else { "is a" };
                self.emit(
                    id,
                    Term::variable(subject),
                    Term::operator(predicate),
                    Term::new(TermKind::Uri, class.iri.as_str()),
                );
                self.conditions += 1;
            }
            Node::Text(text) => {
                if let Some(property) = &text.property {
                    self.emit(
                        id,
                        Term::variable(subject),
                        Term::operator(format!("has {} containing text", property)),
                        Term::new(TermKind::Literal, text.text.as_str()),
                    );
                } else {
                    self.free_text(id, subject, &text.text);
                }
            }
            Node::Property(edge) => {
                self.max_subject += 1;
                let object = self.max_subject;
                let predicate = if edge.exclude {
                    Term::operator(format!("does not have property {}", edge.iri))
                } else {
                    Term::new(TermKind::Uri, edge.iri.as_str())
                };
                self.emit(id, Term::variable(subject), predicate, Term::variable(object));
                self.children(id, object, level + 1);
            }
            Node::PropertyOf(edge) => {
                self.max_subject += 1;
                let opened = self.max_subject;
                self.emit(
                    id,
                    Term::variable(opened),
                    Term::new(TermKind::Uri, edge.iri.as_str()),
                    Term::variable(subject),
                );
                self.children(id, opened, level + 1);
            }
            Node::Value(value) => {
                let object = match literal::resolve(value) {
                    ResolvedValue::Iri(iri) => Term::new(TermKind::Uri, iri),
                    ResolvedValue::Literal(literal) => Term::new(TermKind::Literal, literal),
                };
                self.emit(
                    id,
                    Term::variable(subject),
                    Term::operator(value.operator()),
                    object,
                );
                self.conditions += 1;
            }
            Node::Cond(cond) => {
                self.condition(id, subject, cond);
                self.conditions += 1;
            }
            Node::CondParm(_) => {
                self.unhandled(UnhandledConstruct::CondParm { node: id });
                self.children(id, subject, level + 1);
            }
            Node::CondRange(_) => {
                self.unhandled(UnhandledConstruct::CondRange { node: id });
                self.children(id, subject, level + 1);
            }
            Node::View(_) => {}
        }
    }

    fn condition(&mut self, id: NodeId, subject: usize, cond: &CondNode) {
        match cond.cond_type.operator() {
            Some(operator) => self.emit(
                id,
                Term::variable(subject),
                Term::operator(operator),
                Term::new(TermKind::Number, cond.value.as_str()),
            ),
            None => self.unhandled(UnhandledConstruct::Condition {
                node: id,
                cond_type: cond.cond_type,
            }),
        }
    }

    /// Free text not bound to a property. Under the focus subject the form
    /// follows the sibling view's kind.
    fn free_text(&mut self, id: NodeId, subject: usize, text: &str) {
        let view_kind = if subject == self.focus {
            self.sibling_view_kind(id)
        } else {
            None
        };
        let predicate = match view_kind {
            Some(ViewKind::Properties) => {
                "is the subject of any predicate where the object is associated with"
            }
            Some(ViewKind::PropertiesIn) => {
                "is the object of any predicate where the subject is associated with"
            }
            _ => "has any predicate with object",
        };
        self.out.descriptors.push(FilterDescriptor {
            node: id,
            subject: Term::variable(subject),
            predicate: Term::operator(predicate),
            object: Term::new(TermKind::Literal, text),
            actions: vec![FilterAction::SetView {
                view_type: TEXT_PROPERTIES_VIEW,
                limit: self.view_limit,
                offset: 0,
                cno: self.conditions,
            }],
        });
    }

    fn sibling_view_kind(&self, id: NodeId) -> Option<ViewKind> {
        let parent = self.tree.parent(id)?;
        let view = self
            .tree
            .children_of_kind(parent, NodeKind::View)
            .next()?;
        self.tree
            .get(view)
            .ok()
            .and_then(Node::as_view)
            .map(|view| view.kind)
    }

    fn unhandled(&mut self, construct: UnhandledConstruct) {
        warn!(?construct, "no filter descriptor for construct");
        self.out.unhandled.push(construct);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OpaqueNode, TextNode};
    use crate::mutate::PropertyOptions;

    fn text_tree(kind: ViewKind) -> QueryTree {
        let mut tree = QueryTree::new();
        tree.set_query_text("skiing");
        tree.set_view_kind(kind).unwrap();
        tree
    }

    #[test]
    fn skeleton_has_no_filters() {
        assert!(QueryTree::new().filter_descriptors().is_empty());
    }

    #[test]
    fn free_text_follows_focus_view_kind() {
        let cases = [
            (
                ViewKind::Properties,
                "is the subject of any predicate where the object is associated with",
            ),
            (
                ViewKind::PropertiesIn,
                "is the object of any predicate where the subject is associated with",
            ),
            (ViewKind::List, "has any predicate with object"),
        ];
        for (kind, expected) in cases {
            let filters = text_tree(kind).filter_descriptors();
            assert_eq!(filters.len(), 1);
            let text = &filters.descriptors[0];
            assert_eq!(text.predicate.value, expected);
            assert_eq!(text.object, Term::new(TermKind::Literal, "skiing"));
            assert_eq!(
                text.actions,
                vec![FilterAction::SetView {
                    view_type: TEXT_PROPERTIES_VIEW,
                    limit: 50,
                    offset: 0,
                    cno: 0,
                }]
            );
        }
    }

    #[test]
    fn free_text_outside_focus_is_generic() {
        let mut tree = text_tree(ViewKind::Properties);
        tree.add_property("http://schema.org/name", 1, PropertyOptions::default())
            .unwrap();
        tree.set_focus(2).unwrap();
        let filters = tree.filter_descriptors();
        assert_eq!(filters.descriptors[0].predicate.value, "has any predicate with object");
    }

    #[test]
    fn bound_text_names_its_property() {
        let mut tree = QueryTree::new();
        tree.set_query_text("Linked Data");
        tree.set_query_text_property("http://purl.org/dc/terms/title")
            .unwrap();
        let filters = tree.filter_descriptors();
        let text = &filters.descriptors[0];
        assert_eq!(
            text.predicate.value,
            "has http://purl.org/dc/terms/title containing text"
        );
        assert!(text.actions.is_empty());
    }

    #[test]
    fn requery_action_counts_prior_conditions() {
        let mut tree = QueryTree::new();
        tree.add_class("http://schema.org/Person", None).unwrap();
        let root = tree.root();
        tree.append(
            root,
            Node::Text(TextNode {
                text: "Berners-Lee".to_owned(),
                property: None,
                default_view: false,
            }),
        )
        .unwrap();
        let filters = tree.filter_descriptors();
        assert_eq!(filters.len(), 2);
        assert!(matches!(
            filters.descriptors[1].actions[0],
            FilterAction::SetView { cno: 1, .. }
        ));
    }

    #[test]
    fn excluded_edges_and_classes() {
        let mut tree = QueryTree::new();
        let class = tree.add_class("http://schema.org/Person", None).unwrap();
        if let Ok(Node::Class(class)) = tree.get_mut(class) {
            class.exclude = true;
        }
        tree.add_property(
            "http://xmlns.com/foaf/0.1/knows",
            1,
            PropertyOptions {
                exclude: true,
                ..PropertyOptions::default()
            },
        )
        .unwrap();
        let filters = tree.filter_descriptors();
        assert_eq!(filters.descriptors[0].predicate.value, "is not a");
        assert_eq!(
            filters.descriptors[1].predicate,
            Term::operator("does not have property http://xmlns.com/foaf/0.1/knows")
        );
        assert_eq!(filters.descriptors[1].object, Term::variable(2));
    }

    #[test]
    fn property_of_swaps_subject_and_object() {
        let mut tree = QueryTree::new();
        tree.add_property_of("http://xmlns.com/foaf/0.1/knows", 1, PropertyOptions::default())
            .unwrap();
        let filters = tree.filter_descriptors();
        let edge = &filters.descriptors[0];
        assert_eq!(edge.subject, Term::variable(2));
        assert_eq!(edge.object, Term::variable(1));
        assert_eq!(edge.to_string(), "?s2 <http://xmlns.com/foaf/0.1/knows> ?s1");
    }

    #[test]
    fn comparison_conditions_are_numeric() {
        let mut tree = QueryTree::new();
        tree.add_condition(
            CondType::Gte,
            "1200",
            Some("http://www.w3.org/2001/XMLSchema#integer"),
            None,
            false,
        )
        .unwrap();
        let filters = tree.filter_descriptors();
        assert_eq!(filters.len(), 1);
        assert_eq!(filters.descriptors[0].predicate, Term::operator(">="));
        assert_eq!(filters.descriptors[0].object, Term::new(TermKind::Number, "1200"));
    }

    #[test]
    fn unhandled_constructs_are_reported_not_failed() {
        let mut tree = QueryTree::new();
        tree.add_condition(CondType::Near, "51.5 -0.12", None, None, false)
            .unwrap();
        let root = tree.root();
        tree.append(root, Node::CondRange(OpaqueNode::default())).unwrap();
        tree.add_class("http://schema.org/Place", None).unwrap();
        let filters = tree.filter_descriptors();
        assert_eq!(filters.len(), 1);
        assert_eq!(filters.descriptors[0].object.value, "http://schema.org/Place");
        assert_eq!(filters.unhandled.len(), 2);
        assert!(matches!(
            filters.unhandled[0],
            UnhandledConstruct::Condition {
                cond_type: CondType::Near,
                ..
            }
        ));
    }

    #[test]
    fn descriptors_serialize_like_the_ui_expects() {
        let mut tree = QueryTree::new();
        tree.set_query_text("virtuoso");
        let json = serde_json::to_value(tree.filter_descriptors()).unwrap();
        let text = &json["descriptors"][0];
        assert_eq!(text["subject"]["type"], "variable");
        assert_eq!(text["subject"]["value"], "?s1");
        assert_eq!(text["actions"][0]["action"], "setView");
        assert_eq!(text["actions"][0]["args"]["viewType"], "text-properties");
    }
}
