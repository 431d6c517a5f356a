//! Implicit subject numbering.
//!
//! The root and every `<property>` / `<property-of>` element introduce a
//! subject variable `?sN`. Numbers are handed out in pre-order: the root is
//! `?s1` and the n-th edge met in document order opens `?s(n+1)`. Nodes that
//! do not open a subject belong to the scope of their nearest opening
//! ancestor.
//!
//! ```text
//! <query>                                ?s1
//!   <class iri="Business"/>
//!   <property iri="makesOffer">          ?s2
//!     <property iri="businessFunction">  ?s3
//!     <property iri="itemOffered">       ?s4
//!       <property iri="material">        ?s5
//! ```

use crate::error::{FacetError, Result};
use crate::model::{Node, NodeId};
use crate::tree::QueryTree;

impl QueryTree {
    /// Number of subjects: 1 for the root plus one per edge, at any depth.
    #[must_use]
    pub fn subject_count(&self) -> usize {
        self.subject_scopes().count()
    }

    /// Subject index of the scope `node` belongs to.
    ///
    /// For the root and for edges this is the subject they introduce.
    ///
    /// # Errors
    ///
    /// [`FacetError::OutOfRange`] if `node` is not a live node of this tree.
    pub fn subject_index_of(&self, node: NodeId) -> Result<usize> {
        self.get(node)?;
        let scope = self.scope_of(node);
        self.subject_scopes()
            .position(|opener| opener == scope)
            .map(|position| position + 1)
            .ok_or_else(|| FacetError::subject_out_of_range(0, self.subject_count()))
    }

    /// The node that introduces subject `index`; the root for `index == 1`.
    ///
    /// # Errors
    ///
    /// [`FacetError::OutOfRange`] if `index` is 0 or exceeds
    /// [`QueryTree::subject_count`].
    pub fn parent_of_subject(&self, index: usize) -> Result<NodeId> {
        if index == 0 {
            return Err(FacetError::subject_out_of_range(index, self.subject_count()));
        }
        self.subject_scopes()
            .nth(index - 1)
            .ok_or_else(|| FacetError::subject_out_of_range(index, self.subject_count()))
    }

    /// Subject-introducing nodes in numbering order (root first).
    pub(crate) fn subject_scopes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.pre_order()
            .filter(|id| self.get(*id).is_ok_and(Node::opens_subject))
    }

    /// Nearest ancestor-or-self of `node` that opens a subject.
    fn scope_of(&self, node: NodeId) -> NodeId {
        let mut cursor = node;
        loop {
            if self.get(cursor).is_ok_and(Node::opens_subject) {
                return cursor;
            }
            match self.parent(cursor) {
                Some(parent) => cursor = parent,
                None => return self.root(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassNode, PropertyNode, QueryNode, ValueNode};

    fn edge(iri: &str, of: bool) -> Node {
        let node = PropertyNode {
            iri: iri.to_owned(),
            exclude: false,
            same_as: false,
            inference: None,
        };
        if of {
            Node::PropertyOf(node)
        } else {
            Node::Property(node)
        }
    }

    /// Business fixture without the view; returns (tree, [s2, s3, s4, s5]).
    fn business() -> (QueryTree, [NodeId; 4]) {
        let mut tree = QueryTree::with_root(QueryNode::default());
        let root = tree.root();
        tree.append(
            root,
            Node::Class(ClassNode {
                iri: "http://schema.org/Business".to_owned(),
                exclude: false,
                inference: None,
            }),
        )
        .unwrap();
        let s2 = tree.append(root, edge("http://schema.org/makesOffer", false)).unwrap();
        let s3 = tree.append(s2, edge("http://schema.org/businessFunction", false)).unwrap();
        let s4 = tree.append(s2, edge("http://schema.org/itemOffered", false)).unwrap();
        let s5 = tree.append(s4, edge("http://schema.org/material", true)).unwrap();
        (tree, [s2, s3, s4, s5])
    }

    #[test]
    fn skeleton_has_one_subject() {
        let tree = QueryTree::new();
        assert_eq!(tree.subject_count(), 1);
        assert_eq!(tree.parent_of_subject(1).unwrap(), tree.root());
    }

    #[test]
    fn counts_edges_at_any_depth() {
        let (tree, _) = business();
        assert_eq!(tree.subject_count(), 5);
    }

    #[test]
    fn indices_follow_pre_order() {
        let (tree, scopes) = business();
        for (offset, scope) in scopes.iter().enumerate() {
            assert_eq!(tree.subject_index_of(*scope).unwrap(), offset + 2);
            assert_eq!(tree.parent_of_subject(offset + 2).unwrap(), *scope);
        }
    }

    #[test]
    fn leaves_take_the_enclosing_scope() {
        let (mut tree, [_, s3, _, _]) = business();
        let value = tree
            .append(
                s3,
                Node::Value(ValueNode {
                    value: "http://purl.org/goodrelations/v1#Dispose".to_owned(),
                    op: None,
                    datatype: Some("uri".to_owned()),
                    lang: None,
                    in_attribute: false,
                }),
            )
            .unwrap();
        assert_eq!(tree.subject_index_of(value).unwrap(), 3);
        let class = tree.children(tree.root())[0];
        assert_eq!(tree.subject_index_of(class).unwrap(), 1);
    }

    #[test]
    fn out_of_range_subjects() {
        let (tree, _) = business();
        assert!(matches!(
            tree.parent_of_subject(0),
            Err(FacetError::OutOfRange { value: 0, max: 5, .. })
        ));
        assert!(matches!(
            tree.parent_of_subject(6),
            Err(FacetError::OutOfRange { value: 6, max: 5, .. })
        ));
    }

    #[test]
    fn dead_handles_are_out_of_range() {
        let (mut tree, [s2, s3, _, _]) = business();
        tree.remove(s2).unwrap();
        assert!(matches!(
            tree.subject_index_of(s3),
            Err(FacetError::OutOfRange { what: "node", .. })
        ));
        assert_eq!(tree.subject_count(), 1);
    }
}
