//! Tree node record

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

/// One element of a hierarchy.
///
/// Nodes arrive flat from the query service; the engine links them through
/// [`parent_id`](Self::parent_id) and, for the nested output shape, moves each
/// node's children into [`children`](Self::children).
///
/// The boolean flags are `Option<bool>` so that "not computed yet" stays
/// distinct from "computed false".
///
/// # Example
///
/// ```
/// use treeshape_lib::model::Node;
///
/// let node = Node::new("7")
///     .with_parent("3")
///     .with_level(2)
///     .with_sort_id(1)
///     .with_path("/3/7/");
///
/// assert_eq!(node.parent_key(), Some("3"));
/// assert!(!node.is_hidden());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Materialized ancestor path, top root first, ending with this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Depth, 1 = top level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i32>,
    /// Ordering key among siblings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaf: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selectable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,
    /// Free-form payload carried through untouched.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, serde_json::Value>,
    /// Populated only by the nested output shape.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Node {
    /// Creates a node with the given id and nothing else set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Sets the parent id.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Sets the materialized path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the depth.
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    /// Sets the sibling ordering key.
    pub fn with_sort_id(mut self, sort_id: i64) -> Self {
        self.sort_id = Some(sort_id);
        self
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the hide flag.
    pub fn hidden(mut self, hide: bool) -> Self {
        self.hide = Some(hide);
        self
    }

    /// Adds a payload attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns the parent id, treating an empty string as no parent.
    pub fn parent_key(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Returns `true` if this node declares no parent.
    pub fn is_root_candidate(&self) -> bool {
        self.parent_key().is_none()
    }

    /// Returns `true` if the node is flagged hidden.
    pub fn is_hidden(&self) -> bool {
        self.hide == Some(true)
    }

    /// Returns `true` if the leaf flag has been computed as `true`.
    pub fn is_leaf(&self) -> bool {
        self.leaf == Some(true)
    }

    /// Returns `true` if the expanded flag has been computed as `true`.
    pub fn is_expanded(&self) -> bool {
        self.expanded == Some(true)
    }

    /// Returns `true` if the node sits deeper than the top level.
    pub fn is_nested(&self) -> bool {
        self.level.is_some_and(|level| level > 1)
    }

    /// Counts this node and all nested children.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }

    /// Finds a node by id in this node's subtree, including itself.
    pub fn find(&self, id: &str) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}
