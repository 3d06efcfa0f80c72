//! Caller-contract violations

use crate::model::LoadMode;
use crate::model::LoadOperation;

/// Errors raised when the caller violates the engine's contract.
///
/// These are never retried and are always reported before the query
/// service is contacted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    /// `LoadChildren` was requested without a parent to expand.
    #[error("LoadChildren requires a non-empty ParentId")]
    MissingParentId,

    /// The load mode does not support the requested operation.
    #[error("{operation:?} is not supported under {mode:?} loading")]
    UnsupportedOperation {
        mode: LoadMode,
        operation: LoadOperation,
    },

    /// The configured maximum page size is zero.
    #[error("Maximum page size must be greater than zero")]
    InvalidPageSize,
}

impl ContractError {
    /// Creates an unsupported operation error.
    pub fn unsupported(mode: LoadMode, operation: LoadOperation) -> Self {
        Self::UnsupportedOperation { mode, operation }
    }
}
