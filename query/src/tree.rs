//! Arena-backed facet query tree.
//!
//! Nodes live in a slot vector and refer to each other through [`NodeId`]
//! handles. Removing a node tombstones its whole subtree; moving a node
//! transfers the handle, so the node keeps its identity and attributes.
//!
//! # Examples
//!
//! ```
//! use fct_query::{Node, QueryTree, ViewKind};
//!
//! let tree = QueryTree::new();
//! let view = tree.find_view().unwrap();
//! assert_eq!(tree.parent(view), Some(tree.root()));
//! assert_eq!(tree.get(view).unwrap().as_view().unwrap().kind, ViewKind::TextD);
//! assert!(matches!(tree.get(tree.root()), Ok(Node::Query)));
//! ```

use tracing::debug;

use crate::config::FacetConfig;
use crate::error::{FacetError, Result};
use crate::model::{Node, NodeId, NodeKind, QueryNode, ViewNode};

#[derive(Debug, Clone)]
struct Slot {
    node: Node,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A facet query: a `<query>` root with ordered, typed descendants.
#[derive(Debug, Clone)]
pub struct QueryTree {
    slots: Vec<Option<Slot>>,
    root: NodeId,
    /// Attributes of the root, kept outside the arena so the root's kind
    /// cannot be changed through a node handle.
    query: QueryNode,
}

impl Default for QueryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryTree {
    /// Builds the skeleton tree: a root holding one default view.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&FacetConfig::default())
    }

    /// Builds the skeleton tree using the configured default view limit.
    #[must_use]
    pub fn with_config(config: &FacetConfig) -> Self {
        let mut tree = Self::with_root(QueryNode::default());
        let root = tree.root;
        tree.push_child(root, Node::View(ViewNode::with_limit(config.default_view_limit)));
        tree
    }

    /// Builds a tree holding only a root, with no view.
    pub(crate) fn with_root(query: QueryNode) -> Self {
        Self {
            slots: vec![Some(Slot {
                node: Node::Query,
                parent: None,
                children: Vec::new(),
            })],
            root: NodeId::new(0),
            query,
        }
    }

    /// Handle of the `<query>` root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// True if `id` names a live node of this tree.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.get()), Some(Some(_)))
    }

    fn slot(&self, id: NodeId) -> Result<&Slot> {
        match self.slots.get(id.get()) {
            Some(Some(slot)) => Ok(slot),
            _ => Err(self.foreign_node(id)),
        }
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut Slot> {
        let max = self.slots.len().saturating_sub(1);
        match self.slots.get_mut(id.get()) {
            Some(Some(slot)) => Ok(slot),
            _ => Err(FacetError::OutOfRange {
                what: "node",
                value: id.get(),
                min: 0,
                max,
            }),
        }
    }

    fn foreign_node(&self, id: NodeId) -> FacetError {
        FacetError::OutOfRange {
            what: "node",
            value: id.get(),
            min: 0,
            max: self.slots.len().saturating_sub(1),
        }
    }

    /// Returns the node behind `id`.
    ///
    /// # Errors
    ///
    /// [`FacetError::OutOfRange`] if `id` is not a live node of this tree.
    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.slot(id).map(|slot| &slot.node)
    }

    /// Node behind `id` for in-place attribute edits. Callers must keep the
    /// node's kind; public edits go through the mutators and accessors.
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.slot_mut(id).map(|slot| &mut slot.node)
    }

    /// The root's attributes.
    #[must_use]
    pub fn query(&self) -> &QueryNode {
        &self.query
    }

    pub(crate) fn query_mut(&mut self) -> &mut QueryNode {
        &mut self.query
    }

    /// Parent of `id`; `None` for the root or a dead handle.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).ok().and_then(|slot| slot.parent)
    }

    /// Children of `id` in document order; empty for a dead handle.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map_or(&[], |slot| slot.children.as_slice())
    }

    /// Children of `id` whose kind is `kind`.
    pub fn children_of_kind(&self, id: NodeId, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |child| self.kind_of(*child) == Some(kind))
    }

    pub(crate) fn kind_of(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).ok().map(Node::kind)
    }

    /// Live nodes in pre-order (document order), starting at the root.
    #[must_use]
    pub fn pre_order(&self) -> PreOrder<'_> {
        self.pre_order_from(self.root)
    }

    /// Live nodes of the subtree rooted at `start`, in pre-order.
    #[must_use]
    pub fn pre_order_from(&self, start: NodeId) -> PreOrder<'_> {
        let stack = if self.contains(start) {
            vec![start]
        } else {
            Vec::new()
        };
        PreOrder { tree: self, stack }
    }

    /// Number of live nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Always false: the root cannot be removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// First view node in document order.
    #[must_use]
    pub fn find_view(&self) -> Option<NodeId> {
        self.pre_order()
            .find(|id| self.kind_of(*id) == Some(NodeKind::View))
    }

    /// Number of view nodes; 1 in every well-formed tree.
    #[must_use]
    pub fn view_count(&self) -> usize {
        self.pre_order()
            .filter(|id| self.kind_of(*id) == Some(NodeKind::View))
            .count()
    }

    /// True if `ancestor` is `id` or one of its ancestors.
    #[must_use]
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    pub(crate) fn push_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = NodeId::new(self.slots.len());
        self.slots.push(Some(Slot {
            node,
            parent: Some(parent),
            children: Vec::new(),
        }));
        if let Some(Some(slot)) = self.slots.get_mut(parent.get()) {
            slot.children.push(id);
        }
        id
    }

    /// Appends `node` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// [`FacetError::OutOfRange`] if `parent` is not a live node, and
    /// [`FacetError::InvalidArgument`] if `node` is a second `<query>`.
    pub(crate) fn append(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        self.slot(parent)?;
        if matches!(node, Node::Query) {
            return Err(FacetError::InvalidArgument(
                "a facet query has exactly one <query> element".to_owned(),
            ));
        }
        debug!(parent = parent.get(), element = node.element_name(), "append node");
        Ok(self.push_child(parent, node))
    }

    fn unlink(&mut self, id: NodeId) -> Result<()> {
        let parent = self.slot(id)?.parent;
        if let Some(parent) = parent {
            self.slot_mut(parent)?.children.retain(|child| *child != id);
        }
        Ok(())
    }

    /// Detaches `id` and drops its whole subtree, returning the detached node.
    ///
    /// # Errors
    ///
    /// [`FacetError::OutOfRange`] for a dead handle and
    /// [`FacetError::InvalidArgument`] for the root.
    pub(crate) fn remove(&mut self, id: NodeId) -> Result<Node> {
        if id == self.root {
            return Err(FacetError::InvalidArgument(
                "the <query> root cannot be removed".to_owned(),
            ));
        }
        self.unlink(id)?;
        let doomed: Vec<NodeId> = self.pre_order_from(id).collect();
        debug!(node = id.get(), subtree = doomed.len(), "remove subtree");
        let mut removed = None;
        for node in doomed {
            if let Some(slot) = self.slots.get_mut(node.get()).and_then(Option::take) {
                if node == id {
                    removed = Some(slot.node);
                }
            }
        }
        removed.ok_or_else(|| self.foreign_node(id))
    }

    /// Moves `id` (with its subtree) to the end of `new_parent`'s children.
    ///
    /// # Errors
    ///
    /// [`FacetError::OutOfRange`] for dead handles and
    /// [`FacetError::InvalidArgument`] when moving the root or moving a node
    /// into its own subtree.
    pub(crate) fn move_to(&mut self, id: NodeId, new_parent: NodeId) -> Result<()> {
        self.slot(new_parent)?;
        if id == self.root || self.is_ancestor_or_self(id, new_parent) {
            return Err(FacetError::InvalidArgument(format!(
                "node {} cannot be moved under node {}",
                id.get(),
                new_parent.get()
            )));
        }
        self.unlink(id)?;
        self.slot_mut(id)?.parent = Some(new_parent);
        self.slot_mut(new_parent)?.children.push(id);
        Ok(())
    }
}

/// Pre-order iterator over live nodes. See [`QueryTree::pre_order`].
#[derive(Debug)]
pub struct PreOrder<'a> {
    tree: &'a QueryTree,
    stack: Vec<NodeId>,
}

impl Iterator for PreOrder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
