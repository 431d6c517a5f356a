//! Structural edits that keep the numbering and focus invariants.
//!
//! Every mutator validates its arguments before touching the tree, so a
//! failed call leaves the tree unchanged.

use tracing::debug;

use crate::error::{FacetError, Result};
use crate::model::{
    ClassNode, CondNode, CondType, Node, NodeId, NodeKind, PropertyNode, ValueNode, ViewKind,
    ViewNode,
};
use crate::tree::QueryTree;

/// Optional attributes of a new `<property>` / `<property-of>` edge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyOptions {
    /// Negate the edge (`exclude="yes"`).
    pub exclude: bool,
    /// Expand `owl:sameAs` along the edge (`same_as="yes"`).
    pub same_as: bool,
    /// Inference rule set.
    pub inference: Option<String>,
}

fn require(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(FacetError::InvalidArgument(format!("{} must not be empty", what)));
    }
    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_owned)
}

impl QueryTree {
    /// Appends a `<property>` edge under the node introducing
    /// `subject_index` and returns the subject count after insertion.
    ///
    /// For an edge appended last in document order this is the subject the
    /// edge opens. A nested edge takes its pre-order slot instead and the
    /// count names the highest subject, so successive calls always yield a
    /// strictly increasing sequence.
    ///
    /// ```
    /// use fct_query::{PropertyOptions, QueryTree};
    ///
    /// let mut tree = QueryTree::new();
    /// let offer = tree.add_property("http://schema.org/makesOffer", 1, PropertyOptions::default())?;
    /// let name = tree.add_property("http://schema.org/name", 1, PropertyOptions::default())?;
    /// // Nested under ?s2: the count grows to 4 although the edge itself is ?s3.
    /// let item = tree.add_property("http://schema.org/itemOffered", offer, PropertyOptions::default())?;
    /// assert_eq!((offer, name, item), (2, 3, 4));
    /// assert_eq!(tree.subject_count(), 4);
    /// # Ok::<(), fct_query::FacetError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// [`FacetError::InvalidArgument`] for an empty IRI and
    /// [`FacetError::OutOfRange`] if `subject_index` is not in
    /// `1..=subject_count()`.
    pub fn add_property(
        &mut self,
        iri: &str,
        subject_index: usize,
        options: PropertyOptions,
    ) -> Result<usize> {
        let edge = Self::edge(iri, options)?;
        self.add_edge(Node::Property(edge), subject_index)
    }

    /// Appends a `<property-of>` edge; same contract as
    /// [`QueryTree::add_property`].
    ///
    /// # Errors
    ///
    /// As [`QueryTree::add_property`].
    pub fn add_property_of(
        &mut self,
        iri: &str,
        subject_index: usize,
        options: PropertyOptions,
    ) -> Result<usize> {
        let edge = Self::edge(iri, options)?;
        self.add_edge(Node::PropertyOf(edge), subject_index)
    }

    fn edge(iri: &str, options: PropertyOptions) -> Result<PropertyNode> {
        require("property IRI", iri)?;
        Ok(PropertyNode {
            iri: iri.to_owned(),
            exclude: options.exclude,
            same_as: options.same_as,
            inference: options.inference.filter(|name| !name.is_empty()),
        })
    }

    fn add_edge(&mut self, edge: Node, subject_index: usize) -> Result<usize> {
        let parent = self.parent_of_subject(subject_index)?;
        let id = self.append(parent, edge)?;
        let count = self.subject_count();
        debug!(
            parent_subject = subject_index,
            opened = self.subject_index_of(id)?,
            count,
            "add edge"
        );
        Ok(count)
    }

    /// Sets the class of the focus subject, replacing any class filter
    /// already attached to it.
    ///
    /// # Errors
    ///
    /// [`FacetError::InvalidArgument`] for an empty IRI and
    /// [`FacetError::MissingRequiredNode`] if the tree has no view.
    pub fn add_class(&mut self, iri: &str, inference: Option<&str>) -> Result<NodeId> {
        require("class IRI", iri)?;
        let subject = self.focus_node()?;
        self.remove_children_of_kinds(subject, &[NodeKind::Class])?;
        self.append(
            subject,
            Node::Class(ClassNode {
                iri: iri.to_owned(),
                exclude: false,
                inference: non_empty(inference),
            }),
        )
    }

    /// Sets a `<cond>` on the focus subject, replacing its existing
    /// conditions and values.
    ///
    /// Afterwards the focus returns to subject 1, the view offset to 0 and
    /// the view kind to `text-d`.
    ///
    /// # Errors
    ///
    /// [`FacetError::InvalidArgument`] for an empty value and
    /// [`FacetError::MissingRequiredNode`] if the tree has no view.
    pub fn add_condition(
        &mut self,
        cond_type: CondType,
        value: &str,
        datatype: Option<&str>,
        lang: Option<&str>,
        negate: bool,
    ) -> Result<NodeId> {
        require("condition value", value)?;
        let id = self.replace_constraint(Node::Cond(CondNode {
            cond_type,
            value: value.to_owned(),
            datatype: non_empty(datatype),
            lang: non_empty(lang),
            negate,
        }))?;
        debug!(cond = cond_type.as_str(), "set condition");
        Ok(id)
    }

    /// Sets a `<value>` on the focus subject, replacing its existing
    /// conditions and values. `cond_type` picks the comparison operator;
    /// `eq` is written without an `op` attribute.
    ///
    /// Afterwards the focus returns to subject 1, the view offset to 0 and
    /// the view kind to `text-d`.
    ///
    /// # Errors
    ///
    /// [`FacetError::InvalidArgument`] for an empty value or a condition
    /// type without a comparison operator (`contains`, `in`, `near`), and
    /// [`FacetError::MissingRequiredNode`] if the tree has no view.
    pub fn add_value(
        &mut self,
        value: &str,
        cond_type: CondType,
        datatype: Option<&str>,
        lang: Option<&str>,
    ) -> Result<NodeId> {
        require("value", value)?;
        let op = match cond_type {
            CondType::Eq => None,
            other => Some(
                other
                    .operator()
                    .ok_or_else(|| {
                        FacetError::InvalidArgument(format!(
                            "a value cannot be compared with '{}'",
                            other.as_str()
                        ))
                    })?
                    .to_owned(),
            ),
        };
        self.replace_constraint(Node::Value(ValueNode {
            value: value.to_owned(),
            op,
            datatype: non_empty(datatype),
            lang: non_empty(lang),
            in_attribute: false,
        }))
    }

    fn replace_constraint(&mut self, node: Node) -> Result<NodeId> {
        let subject = self.focus_node()?;
        self.remove_children_of_kinds(subject, &[NodeKind::Cond, NodeKind::Value])?;
        let id = self.append(subject, node)?;
        self.set_focus(1)?;
        self.set_view_offset(0)?;
        self.set_view_kind(ViewKind::DEFAULT)?;
        Ok(id)
    }

    /// Removes the node behind the `position`-th filter descriptor, with
    /// its subtree, and returns it.
    ///
    /// If the view was inside the removed subtree a new default-kind view
    /// is attached to the root, keeping the old limit.
    ///
    /// # Errors
    ///
    /// [`FacetError::OutOfRange`] if `position` is not below the number of
    /// descriptors.
    pub fn remove_filter(&mut self, position: usize) -> Result<Node> {
        let filters = self.filter_descriptors();
        let target = filters
            .get(position)
            .map(|descriptor| descriptor.node)
            .ok_or(FacetError::OutOfRange {
                what: "filter position",
                value: position,
                min: 0,
                max: filters.len().saturating_sub(1),
            })?;
        let limit = self.view_limit().unwrap_or(0);
        let removed = self.remove(target)?;
        debug!(position, element = removed.element_name(), "remove filter");
        if self.find_view().is_none() {
            let root = self.root();
            debug!(limit, "re-create view under root");
            self.append(root, Node::View(ViewNode::with_limit(limit)))?;
        }
        Ok(removed)
    }

    /// Deletes every `<cond>` of subject `index` and returns how many were
    /// removed. The focus is left where it was.
    ///
    /// # Errors
    ///
    /// [`FacetError::OutOfRange`] if `index` is not in
    /// `1..=subject_count()`.
    pub fn remove_subject_conditions(&mut self, index: usize) -> Result<usize> {
        let subject = self.parent_of_subject(index)?;
        self.remove_children_of_kinds(subject, &[NodeKind::Cond])
    }

    /// Removes the class filter of the focus subject; returns whether one
    /// was present.
    ///
    /// # Errors
    ///
    /// [`FacetError::MissingRequiredNode`] if the tree has no view.
    pub fn remove_subject_class(&mut self) -> Result<bool> {
        let subject = self.focus_node()?;
        Ok(self.remove_children_of_kinds(subject, &[NodeKind::Class])? > 0)
    }

    fn remove_children_of_kinds(&mut self, parent: NodeId, kinds: &[NodeKind]) -> Result<usize> {
        let doomed: Vec<NodeId> = self
            .children(parent)
            .iter()
            .copied()
            .filter(|child| self.kind_of(*child).is_some_and(|kind| kinds.contains(&kind)))
            .collect();
        for child in &doomed {
            self.remove(*child)?;
        }
        Ok(doomed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_returns_the_subject_count() {
        let mut tree = QueryTree::new();
        let opts = PropertyOptions::default;
        assert_eq!(tree.add_property("http://schema.org/makesOffer", 1, opts()).unwrap(), 2);
        assert_eq!(tree.add_property("http://schema.org/name", 1, opts()).unwrap(), 3);
        // Nested under ?s2: the edge itself is ?s3 in document order.
        assert_eq!(tree.add_property("http://schema.org/itemOffered", 2, opts()).unwrap(), 4);
        assert_eq!(tree.subject_count(), 4);
        let offer = tree.parent_of_subject(2).unwrap();
        let nested = tree.children_of_kind(offer, NodeKind::Property).next();
        assert_eq!(nested.map(|id| tree.subject_index_of(id).unwrap()), Some(3));
    }

    #[test]
    fn property_arguments_are_validated() {
        let mut tree = QueryTree::new();
        assert!(matches!(
            tree.add_property("", 1, PropertyOptions::default()),
            Err(FacetError::InvalidArgument(_))
        ));
        assert!(matches!(
            tree.add_property_of("http://xmlns.com/foaf/0.1/knows", 2, PropertyOptions::default()),
            Err(FacetError::OutOfRange { value: 2, max: 1, .. })
        ));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn class_is_unique_per_subject() {
        let mut tree = QueryTree::new();
        tree.add_class("http://schema.org/Person", None).unwrap();
        let second = tree
            .add_class("http://schema.org/Organization", Some("ctx"))
            .unwrap();
        let root = tree.root();
        let classes: Vec<NodeId> = tree.children_of_kind(root, NodeKind::Class).collect();
        assert_eq!(classes, vec![second]);
        assert!(matches!(
            tree.get(second),
            Ok(Node::Class(ClassNode { inference: Some(ctx), .. })) if ctx == "ctx"
        ));
        assert!(tree.remove_subject_class().unwrap());
        assert!(!tree.remove_subject_class().unwrap());
    }

    #[test]
    fn class_goes_to_the_focus_subject() {
        let mut tree = QueryTree::new();
        let s2 = tree
            .add_property("http://xmlns.com/foaf/0.1/knows", 1, PropertyOptions::default())
            .unwrap();
        tree.set_focus(s2).unwrap();
        let class = tree.add_class("http://xmlns.com/foaf/0.1/Person", None).unwrap();
        assert_eq!(tree.subject_index_of(class).unwrap(), 2);
    }

    #[test]
    fn condition_replaces_siblings_and_resets_focus() {
        let mut tree = QueryTree::new();
        let s2 = tree
            .add_property("http://dbpedia.org/ontology/age", 1, PropertyOptions::default())
            .unwrap();
        tree.set_focus(s2).unwrap();
        tree.set_view_offset(100).unwrap();
        tree.set_view_kind(ViewKind::List).unwrap();
        let xsd_int = Some("http://www.w3.org/2001/XMLSchema#integer");
        tree.add_value("30", CondType::Lt, xsd_int, None).unwrap();
        assert_eq!(tree.current_focus_index().unwrap(), 1);
        assert_eq!(tree.view_offset().unwrap(), 0);
        assert_eq!(tree.view_kind().unwrap(), ViewKind::TextD);

        tree.set_focus(s2).unwrap();
        let cond = tree
            .add_condition(CondType::Gte, "27", xsd_int, Some(""), true)
            .unwrap();
        let edge = tree.parent_of_subject(s2).unwrap();
        assert_eq!(tree.children_of_kind(edge, NodeKind::Value).count(), 0);
        assert_eq!(tree.children_of_kind(edge, NodeKind::Cond).collect::<Vec<_>>(), vec![cond]);
        assert!(matches!(
            tree.get(cond),
            Ok(Node::Cond(CondNode { negate: true, lang: None, .. }))
        ));
    }

    #[test]
    fn value_operators() {
        let mut tree = QueryTree::new();
        let eq = tree.add_value("Melvin Carvalho", CondType::Eq, None, None).unwrap();
        assert!(matches!(tree.get(eq), Ok(Node::Value(ValueNode { op: None, .. }))));
        let neq = tree.add_value("Tim", CondType::Neq, None, Some("en")).unwrap();
        assert!(matches!(
            tree.get(neq),
            Ok(Node::Value(ValueNode { op: Some(op), .. })) if op == "!="
        ));
        assert!(matches!(
            tree.add_value("x", CondType::Contains, None, None),
            Err(FacetError::InvalidArgument(_))
        ));
        assert!(matches!(
            tree.add_value("", CondType::Eq, None, None),
            Err(FacetError::InvalidArgument(_))
        ));
    }

    #[test]
    fn removing_the_view_host_recreates_the_view() {
        let mut tree = QueryTree::new();
        let s2 = tree
            .add_property("http://schema.org/containedInPlace", 1, PropertyOptions::default())
            .unwrap();
        tree.set_focus(s2).unwrap();
        tree.set_view_limit(20).unwrap();
        tree.set_view_offset(40).unwrap();
        tree.set_view_kind(ViewKind::Properties).unwrap();

        let removed = tree.remove_filter(0).unwrap();
        assert_eq!(removed.kind(), NodeKind::Property);
        assert_eq!(tree.view_count(), 1);
        assert_eq!(tree.current_focus_index().unwrap(), 1);
        assert_eq!(tree.view_limit().unwrap(), 20);
        assert_eq!(tree.view_offset().unwrap(), 0);
        assert_eq!(tree.view_kind().unwrap(), ViewKind::DEFAULT);
    }

    #[test]
    fn remove_filter_keeps_an_unaffected_view() {
        let mut tree = QueryTree::new();
        tree.add_class("http://schema.org/Place", None).unwrap();
        tree.set_view_kind(ViewKind::Geo).unwrap();
        let view = tree.view().unwrap();
        tree.remove_filter(0).unwrap();
        assert_eq!(tree.view().unwrap(), view);
        assert_eq!(tree.view_kind().unwrap(), ViewKind::Geo);
        assert!(matches!(
            tree.remove_filter(0),
            Err(FacetError::OutOfRange { what: "filter position", .. })
        ));
    }

    #[test]
    fn subject_conditions_are_removed_without_moving_focus() {
        let mut tree = QueryTree::new();
        let s2 = tree
            .add_property("http://dbpedia.org/ontology/elevation", 1, PropertyOptions::default())
            .unwrap();
        tree.set_focus(s2).unwrap();
        tree.add_condition(CondType::Gt, "1000", None, None, false).unwrap();
        tree.set_focus(s2).unwrap();
        assert_eq!(tree.subject_conditions(s2).unwrap().len(), 1);
        assert_eq!(tree.remove_subject_conditions(s2).unwrap(), 1);
        assert_eq!(tree.current_focus_index().unwrap(), s2);
        assert!(tree.subject_conditions(s2).unwrap().is_empty());
        assert!(matches!(
            tree.remove_subject_conditions(9),
            Err(FacetError::OutOfRange { .. })
        ));
    }
}
