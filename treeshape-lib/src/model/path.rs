//! Materialized path parsing

/// Default separator between ids in a materialized path.
pub const DEFAULT_PATH_SEPARATOR: char = '/';

/// A parsed materialized path.
///
/// Paths list ids from the top-level root down to the node itself, joined by
/// a separator (`/1/4/9/`). Leading, trailing and doubled separators are
/// ignored.
///
/// # Example
///
/// ```
/// use treeshape_lib::model::NodePath;
///
/// let path = NodePath::parse("/1/4/9/", '/');
/// assert_eq!(path.segments(), ["1", "4", "9"]);
/// assert_eq!(path.ancestors_of("9").collect::<Vec<_>>(), ["4", "1"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePath<'a> {
    segments: Vec<&'a str>,
}

impl<'a> NodePath<'a> {
    /// Splits a raw path into its id segments.
    pub fn parse(raw: &'a str, separator: char) -> Self {
        Self {
            segments: raw
                .split(separator)
                .map(str::trim)
                .filter(|segment| !segment.is_empty())
                .collect(),
        }
    }

    /// Returns the ids in root-first order.
    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Returns `true` if the path holds no ids.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Yields ancestor ids nearest-first, skipping `own_id` wherever it appears.
    pub fn ancestors_of<'s>(&'s self, own_id: &'s str) -> impl Iterator<Item = &'a str> + 's {
        self.segments
            .iter()
            .rev()
            .copied()
            .filter(move |segment| *segment != own_id)
    }

    /// Returns `true` if `other` equals this path or lies underneath it.
    pub fn contains(&self, other: &NodePath<'_>) -> bool {
        other.segments.len() >= self.segments.len()
            && self
                .segments
                .iter()
                .zip(other.segments.iter())
                .all(|(a, b)| a == b)
    }
}
