//! Result converters
//!
//! The engine hands its final page to a [`ResultConverter`], which decides
//! the output shape. Two shapes ship with the crate:
//!
//! - [`NestedConverter`] - roots with `children` populated, for tree APIs
//! - [`FlatConverter`] - depth-first rows linked only by `parent_id`, for
//!   table UIs that rebuild the hierarchy client-side
//!
//! Both derive node state with [`apply_state`] and drop hidden nodes with
//! their subtrees.

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::model::Node;
use crate::model::Page;
use crate::tree::Hierarchy;
use crate::tree::ShapeContext;
use crate::tree::apply_state;

/// Turns a fetched page into the caller's result type.
pub trait ResultConverter: Send + Sync {
    /// The shaped result.
    type Output;

    /// Shapes `page` according to `context`.
    fn to_result(&self, page: Page, context: &ShapeContext) -> Result<Self::Output, Error>;
}

/// Nested tree output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeResult {
    pub total: usize,
    pub roots: Vec<Node>,
}

impl TreeResult {
    /// Finds a node anywhere in the tree.
    pub fn find(&self, id: &str) -> Option<&Node> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    /// Counts every node in the tree.
    pub fn count(&self) -> usize {
        self.roots.iter().map(Node::count).sum()
    }
}

/// Flat table output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableResult {
    pub total: usize,
    pub rows: Vec<Node>,
}

impl TableResult {
    /// Finds a row by id.
    pub fn find(&self, id: &str) -> Option<&Node> {
        self.rows.iter().find(|row| row.id == id)
    }
}

/// Produces a [`TreeResult`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NestedConverter;

impl ResultConverter for NestedConverter {
    type Output = TreeResult;

    fn to_result(&self, page: Page, context: &ShapeContext) -> Result<TreeResult, Error> {
        let total = page.total();
        let mut nodes = page.into_nodes();
        apply_state(&mut nodes, context);

        let hierarchy = Hierarchy::link(&nodes)?;
        let roots = hierarchy.nest(nodes, Node::is_hidden);
        Ok(TreeResult { total, roots })
    }
}

/// Produces a [`TableResult`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatConverter;

impl ResultConverter for FlatConverter {
    type Output = TableResult;

    fn to_result(&self, page: Page, context: &ShapeContext) -> Result<TableResult, Error> {
        let total = page.total();
        let mut nodes = page.into_nodes();
        apply_state(&mut nodes, context);

        let hierarchy = Hierarchy::link(&nodes)?;
        let order = hierarchy.depth_first(&nodes, Node::is_hidden);

        let mut slots: Vec<Option<Node>> = nodes.into_iter().map(Some).collect();
        let rows = order.into_iter().filter_map(|i| slots[i].take()).collect();
        Ok(TableResult { total, rows })
    }
}

/// Output shape chosen at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    #[default]
    Tree,
    Table,
}

/// Result of a [`ShapedConverter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", content = "result")]
pub enum ShapedResult {
    Tree(TreeResult),
    Table(TableResult),
}

/// Converter that picks the nested or flat shape from a [`Shape`] value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShapedConverter {
    pub shape: Shape,
}

impl ShapedConverter {
    /// Creates a converter for `shape`.
    pub fn new(shape: Shape) -> Self {
        Self { shape }
    }
}

impl ResultConverter for ShapedConverter {
    type Output = ShapedResult;

    fn to_result(&self, page: Page, context: &ShapeContext) -> Result<ShapedResult, Error> {
        match self.shape {
            Shape::Tree => NestedConverter.to_result(page, context).map(ShapedResult::Tree),
            Shape::Table => FlatConverter.to_result(page, context).map(ShapedResult::Table),
        }
    }
}
