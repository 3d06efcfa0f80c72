//! Page container for fetched nodes.

use std::collections::HashSet;

use serde::Deserialize;
use serde::Serialize;

use super::Node;

/// One bounded batch of nodes plus the total count reported by the query
/// service.
///
/// The engine may grow a page (ancestor backfill) or shrink it (root-async
/// self-exclusion) before shaping it.
///
/// # Example
///
/// ```
/// use treeshape_lib::model::{Node, Page};
///
/// let mut page = Page::new(vec![Node::new("1"), Node::new("2")], 2);
/// let added = page.extend_unique(vec![Node::new("2"), Node::new("3")]);
///
/// assert_eq!(added, 1);
/// assert_eq!(page.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    total: usize,
    data: Vec<Node>,
}

impl Page {
    /// Creates a page from fetched nodes and the service-reported total.
    pub fn new(data: Vec<Node>, total: usize) -> Self {
        Self { total, data }
    }

    /// Creates a page whose total is its own length.
    pub fn from_nodes(data: Vec<Node>) -> Self {
        let total = data.len();
        Self { total, data }
    }

    /// Returns the total count.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns the nodes in this page.
    pub fn nodes(&self) -> &[Node] {
        &self.data
    }

    /// Returns the nodes for in-place edits.
    pub fn nodes_mut(&mut self) -> &mut Vec<Node> {
        &mut self.data
    }

    /// Consumes the page and returns the nodes.
    pub fn into_nodes(self) -> Vec<Node> {
        self.data
    }

    /// Returns `true` if this page has no nodes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of nodes in this page.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if a node with `id` is present.
    pub fn contains(&self, id: &str) -> bool {
        self.data.iter().any(|node| node.id == id)
    }

    /// Returns the set of ids present.
    pub fn ids(&self) -> HashSet<&str> {
        self.data.iter().map(|node| node.id.as_str()).collect()
    }

    /// Appends nodes whose id is not already present.
    ///
    /// Returns how many were appended. The total is left alone: appended
    /// nodes are context for the visible set, not additional results.
    pub fn extend_unique(&mut self, nodes: impl IntoIterator<Item = Node>) -> usize {
        let mut seen: HashSet<String> = self.data.iter().map(|node| node.id.clone()).collect();
        let before = self.data.len();
        for node in nodes {
            if seen.insert(node.id.clone()) {
                self.data.push(node);
            }
        }
        self.data.len() - before
    }

    /// Removes the node with `id` and decrements the total.
    ///
    /// Returns the removed node, or `None` if it was not in the page.
    pub fn remove_by_id(&mut self, id: &str) -> Option<Node> {
        let index = self.data.iter().position(|node| node.id == id)?;
        self.total = self.total.saturating_sub(1);
        Some(self.data.remove(index))
    }
}
