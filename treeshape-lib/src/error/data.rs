//! Data-integrity errors

/// Errors caused by node data that cannot be shaped into a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    /// A node looked up by id does not exist.
    #[error("Node '{id}' not found")]
    NodeNotFound { id: String },

    /// A node needed for a path-scoped fetch has no materialized path.
    #[error("Node '{id}' has no path to scope a subtree fetch by")]
    MissingPath { id: String },

    /// An ancestor that nested nodes depend on could not be resolved.
    #[error("Ancestor '{id}' could not be resolved")]
    MissingAncestor { id: String },

    /// The ParentId links loop back on themselves.
    #[error("Cycle detected in node hierarchy at '{id}'")]
    Cycle { id: String },

    /// The same id appears more than once in one working set.
    #[error("Duplicate node id '{id}'")]
    DuplicateId { id: String },
}

impl DataError {
    /// Creates a node-not-found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NodeNotFound { id: id.into() }
    }

    /// Creates a missing-path error.
    pub fn missing_path(id: impl Into<String>) -> Self {
        Self::MissingPath { id: id.into() }
    }

    /// Creates a missing-ancestor error.
    pub fn missing_ancestor(id: impl Into<String>) -> Self {
        Self::MissingAncestor { id: id.into() }
    }

    /// Creates a cycle error.
    pub fn cycle(id: impl Into<String>) -> Self {
        Self::Cycle { id: id.into() }
    }

    /// Creates a duplicate-id error.
    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }
}
