//! Ordering for node queries.

use serde::Deserialize;
use serde::Serialize;

/// Field name of the sibling ordering key.
pub const SORT_ID: &str = "SortId";

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Ascending order (0-9, A-Z).
    Asc,
    /// Descending order (9-0, Z-A).
    Desc,
}

/// Ordering applied by the query service to fetched nodes.
///
/// Multiple fields can be chained for secondary ordering.
///
/// # Example
///
/// ```
/// use treeshape_lib::model::OrderBy;
///
/// let order = OrderBy::asc("Level").then_asc("SortId");
/// assert_eq!(order.fields().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub(crate) fields: Vec<(String, Direction)>,
}

impl OrderBy {
    /// Creates an ascending order on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            fields: vec![(field.into(), Direction::Asc)],
        }
    }

    /// Creates a descending order on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            fields: vec![(field.into(), Direction::Desc)],
        }
    }

    /// The stable default: ascending by sibling sort key.
    pub fn by_sort_id() -> Self {
        Self::asc(SORT_ID)
    }

    /// Adds a secondary ascending order on a field.
    pub fn then_asc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), Direction::Asc));
        self
    }

    /// Adds a secondary descending order on a field.
    pub fn then_desc(mut self, field: impl Into<String>) -> Self {
        self.fields.push((field.into(), Direction::Desc));
        self
    }

    /// Returns the ordered fields with their directions.
    pub fn fields(&self) -> &[(String, Direction)] {
        &self.fields
    }
}

impl Default for OrderBy {
    fn default() -> Self {
        Self::by_sort_id()
    }
}
