//! Query parameters and loading policy

use serde::Deserialize;
use serde::Serialize;

use super::OrderBy;

/// How much of the tree is fetched up front.
///
/// Fixed for the lifetime of an engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadMode {
    /// The whole tree in one fetch.
    #[default]
    Sync,
    /// The top level first, one level per expansion.
    Async,
    /// The top level first; the first expansion of a node fetches its whole subtree.
    RootAsync,
}

/// What a single call is asking for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadOperation {
    /// Initial or root-level fetch.
    #[default]
    Query,
    /// Expansion of one node.
    LoadChildren,
}

/// Filter and paging state for one fetch.
///
/// Built by the caller, normalized in place by the engine before dispatch,
/// never persisted.
///
/// # Example
///
/// ```
/// use treeshape_lib::model::QueryParameter;
///
/// let query = QueryParameter::children_of("42").with_page(1, 50);
/// assert_eq!(query.parent_key(), Some("42"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryParameter {
    pub parent_id: Option<String>,
    pub path: Option<String>,
    pub level: Option<i32>,
    /// 1-based page number.
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub order: Option<OrderBy>,
}

impl QueryParameter {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query scoped to the direct children of `parent_id`.
    pub fn children_of(parent_id: impl Into<String>) -> Self {
        Self {
            parent_id: Some(parent_id.into()),
            ..Self::default()
        }
    }

    /// Sets page number and size.
    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = Some(page);
        self.page_size = Some(page_size);
        self
    }

    /// Restricts the fetch to one depth.
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    /// Scopes the fetch to a materialized path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the result ordering.
    pub fn with_order(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }

    /// Returns the parent id, treating an empty string as unset.
    pub fn parent_key(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|id| !id.is_empty())
    }
}
