//! The view node as focus marker.
//!
//! The single `<view>` element sits under the root or under an edge; the
//! subject that node introduces is the one whose results are returned and
//! whose filters the UI edits.

use tracing::debug;

use crate::error::{FacetError, Result};
use crate::model::NodeId;
use crate::tree::QueryTree;

impl QueryTree {
    /// The view node.
    ///
    /// # Errors
    ///
    /// [`FacetError::MissingRequiredNode`] if the tree has no view.
    pub fn view(&self) -> Result<NodeId> {
        self.find_view()
            .ok_or(FacetError::MissingRequiredNode("view"))
    }

    /// The node currently hosting the view.
    ///
    /// # Errors
    ///
    /// [`FacetError::MissingRequiredNode`] if the tree has no view.
    pub fn focus_node(&self) -> Result<NodeId> {
        let view = self.view()?;
        Ok(self.parent(view).unwrap_or_else(|| self.root()))
    }

    /// Subject index of the node hosting the view.
    ///
    /// # Errors
    ///
    /// [`FacetError::MissingRequiredNode`] if the tree has no view.
    pub fn current_focus_index(&self) -> Result<usize> {
        let host = self.focus_node()?;
        self.subject_index_of(host)
    }

    /// Moves the existing view node under the node introducing subject
    /// `index`, as its last child. The node is moved, not copied, so its
    /// kind, limit, and offset are kept.
    ///
    /// # Errors
    ///
    /// [`FacetError::MissingRequiredNode`] if the tree has no view, and
    /// [`FacetError::OutOfRange`] if `index` is not in `1..=subject_count()`.
    pub fn set_focus(&mut self, index: usize) -> Result<()> {
        let view = self.view()?;
        let host = self.parent_of_subject(index)?;
        debug!(subject = index, "move view");
        self.move_to(view, host)
    }
}
