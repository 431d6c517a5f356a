//! Attribute accessors: query-level settings, query text, the view, and
//! per-subject constraints.

use tracing::warn;

use crate::error::{FacetError, Result};
use crate::model::{ClassNode, CondNode, Node, NodeId, NodeKind, TextNode, ViewKind, ViewNode};
use crate::tree::QueryTree;

impl QueryTree {
    /// Graph the query is restricted to.
    #[must_use]
    pub fn graph(&self) -> Option<&str> {
        self.query().graph.as_deref()
    }

    /// Restricts the query to `graph`.
    pub fn set_graph(&mut self, graph: &str) {
        self.query_mut().graph = Some(graph.to_owned());
    }

    /// Removes the graph restriction.
    pub fn clear_graph(&mut self) {
        self.query_mut().graph = None;
    }

    /// Service-side timeout in milliseconds.
    #[must_use]
    pub fn timeout(&self) -> Option<u64> {
        self.query().timeout
    }

    /// Sets the service-side timeout in milliseconds.
    pub fn set_timeout(&mut self, millis: u64) {
        self.query_mut().timeout = Some(millis);
    }

    /// Removes the service-side timeout.
    pub fn clear_timeout(&mut self) {
        self.query_mut().timeout = None;
    }

    /// Name of the inference rule set applied to the whole query.
    #[must_use]
    pub fn inference(&self) -> Option<&str> {
        self.query().inference.as_deref()
    }

    /// Sets the inference rule set.
    pub fn set_inference(&mut self, rule_set: &str) {
        self.query_mut().inference = Some(rule_set.to_owned());
    }

    /// Removes the inference rule set.
    pub fn clear_inference(&mut self) {
        self.query_mut().inference = None;
    }

    /// `owl:sameAs` expansion; `None` when the attribute is absent.
    #[must_use]
    pub fn same_as(&self) -> Option<bool> {
        self.query().same_as
    }

    /// Sets `same-as` to `yes` or `no`.
    pub fn set_same_as(&mut self, enabled: bool) {
        self.query_mut().same_as = Some(enabled);
    }

    /// Removes the `same-as` attribute.
    pub fn clear_same_as(&mut self) {
        self.query_mut().same_as = None;
    }

    fn query_text_node(&self) -> Option<NodeId> {
        self.children_of_kind(self.root(), NodeKind::Text).next()
    }

    fn query_text_mut(&mut self) -> Result<&mut TextNode> {
        let id = self
            .query_text_node()
            .ok_or(FacetError::MissingRequiredNode("text"))?;
        match self.get_mut(id)? {
            Node::Text(text) => Ok(text),
            _ => Err(FacetError::MissingRequiredNode("text")),
        }
    }

    /// Free text of the query; empty when there is none.
    #[must_use]
    pub fn query_text(&self) -> &str {
        match self.query_text_node().map(|id| self.get(id)) {
            Some(Ok(Node::Text(text))) => &text.text,
            _ => "",
        }
    }

    /// Replaces the query text. Empty input is ignored.
    pub fn set_query_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.remove_query_text();
        let root = self.root();
        self.push_child(
            root,
            Node::Text(TextNode {
                text: text.to_owned(),
                property: None,
                default_view: false,
            }),
        );
    }

    /// Removes the query text; returns whether there was one.
    pub fn remove_query_text(&mut self) -> bool {
        let doomed: Vec<NodeId> = self.children_of_kind(self.root(), NodeKind::Text).collect();
        let mut removed = 0;
        for id in doomed {
            match self.remove(id) {
                Ok(_) => removed += 1,
                Err(err) => warn!(node = id.get(), error = %err, "query text not removed"),
            }
        }
        removed > 0
    }

    /// Property the query text is bound to.
    #[must_use]
    pub fn query_text_property(&self) -> Option<&str> {
        match self.query_text_node().map(|id| self.get(id)) {
            Some(Ok(Node::Text(text))) => text.property.as_deref(),
            _ => None,
        }
    }

    /// Binds the query text to `property`.
    ///
    /// # Errors
    ///
    /// [`FacetError::InvalidArgument`] for an empty IRI and
    /// [`FacetError::MissingRequiredNode`] if there is no query text.
    pub fn set_query_text_property(&mut self, property: &str) -> Result<()> {
        if property.is_empty() {
            return Err(FacetError::InvalidArgument(
                "text property IRI must not be empty".to_owned(),
            ));
        }
        self.query_text_mut()?.property = Some(property.to_owned());
        Ok(())
    }

    /// Unbinds the query text from its property.
    pub fn remove_query_text_property(&mut self) {
        if let Ok(text) = self.query_text_mut() {
            text.property = None;
        }
    }

    fn view_node(&self) -> Result<&ViewNode> {
        let id = self.view()?;
        self.get(id)?
            .as_view()
            .ok_or(FacetError::MissingRequiredNode("view"))
    }

    fn view_node_mut(&mut self) -> Result<&mut ViewNode> {
        let id = self.view()?;
        self.get_mut(id)?
            .as_view_mut()
            .ok_or(FacetError::MissingRequiredNode("view"))
    }

    /// Row limit of the view; 0 means unlimited.
    ///
    /// # Errors
    ///
    /// [`FacetError::MissingRequiredNode`] if the tree has no view.
    pub fn view_limit(&self) -> Result<u64> {
        Ok(self.view_node()?.limit)
    }

    /// Sets the row limit; 0 removes it.
    ///
    /// # Errors
    ///
    /// [`FacetError::MissingRequiredNode`] if the tree has no view.
    pub fn set_view_limit(&mut self, limit: u64) -> Result<()> {
        self.view_node_mut()?.limit = limit;
        Ok(())
    }

    /// Row offset of the view.
    ///
    /// # Errors
    ///
    /// [`FacetError::MissingRequiredNode`] if the tree has no view.
    pub fn view_offset(&self) -> Result<u64> {
        Ok(self.view_node()?.offset)
    }

    /// Sets the row offset.
    ///
    /// # Errors
    ///
    /// [`FacetError::MissingRequiredNode`] if the tree has no view.
    pub fn set_view_offset(&mut self, offset: u64) -> Result<()> {
        self.view_node_mut()?.offset = offset;
        Ok(())
    }

    /// Result view kind.
    ///
    /// # Errors
    ///
    /// [`FacetError::MissingRequiredNode`] if the tree has no view.
    pub fn view_kind(&self) -> Result<ViewKind> {
        Ok(self.view_node()?.kind)
    }

    /// Sets the result view kind.
    ///
    /// # Errors
    ///
    /// [`FacetError::MissingRequiredNode`] if the tree has no view.
    pub fn set_view_kind(&mut self, kind: ViewKind) -> Result<()> {
        self.view_node_mut()?.kind = kind;
        Ok(())
    }

    /// The `<cond>` children of the node introducing subject `index`.
    ///
    /// # Errors
    ///
    /// [`FacetError::OutOfRange`] if `index` is not in `1..=subject_count()`.
    pub fn subject_conditions(&self, index: usize) -> Result<Vec<&CondNode>> {
        let subject = self.parent_of_subject(index)?;
        Ok(self
            .children(subject)
            .iter()
            .filter_map(|id| match self.get(*id) {
                Ok(Node::Cond(cond)) => Some(cond),
                _ => None,
            })
            .collect())
    }

    /// The `<class>` child of the node introducing subject `index`.
    ///
    /// # Errors
    ///
    /// [`FacetError::OutOfRange`] if `index` is not in `1..=subject_count()`.
    pub fn subject_class(&self, index: usize) -> Result<Option<&ClassNode>> {
        let subject = self.parent_of_subject(index)?;
        Ok(self.children(subject).iter().find_map(|id| match self.get(*id) {
            Ok(Node::Class(class)) => Some(class),
            _ => None,
        }))
    }
}
