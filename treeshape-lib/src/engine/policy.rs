//! Load-policy routing
//!
//! | Operation    | Sync        | Async          | RootAsync  |
//! |--------------|-------------|----------------|------------|
//! | Query        | `WholeTree` | `RootLevel`    | `RootLevel`|
//! | LoadChildren | rejected    | `DirectChildren` | `Subtree` |

use crate::error::ContractError;
use crate::model::LoadMode;
use crate::model::LoadOperation;
use crate::tree::ShapeContext;

/// The fetch strategy for one `(LoadMode, LoadOperation)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plan {
    /// Every level in one page, ancestors backfilled.
    WholeTree,
    /// The top level only (plus preselected ancestor chains on first load).
    RootLevel,
    /// One level under the expanded node.
    DirectChildren,
    /// Everything under the expanded node, without the node itself.
    Subtree,
}

impl Plan {
    /// Picks the plan for a mode and operation.
    pub fn select(mode: LoadMode, operation: LoadOperation) -> Result<Self, ContractError> {
        match (operation, mode) {
            (LoadOperation::Query, LoadMode::Sync) => Ok(Self::WholeTree),
            (LoadOperation::Query, LoadMode::Async | LoadMode::RootAsync) => Ok(Self::RootLevel),
            (LoadOperation::LoadChildren, LoadMode::Async) => Ok(Self::DirectChildren),
            (LoadOperation::LoadChildren, LoadMode::RootAsync) => Ok(Self::Subtree),
            (LoadOperation::LoadChildren, LoadMode::Sync) => Err(ContractError::unsupported(mode, operation)),
        }
    }

    /// The operation this plan serves.
    pub fn operation(self) -> LoadOperation {
        match self {
            Self::WholeTree | Self::RootLevel => LoadOperation::Query,
            Self::DirectChildren | Self::Subtree => LoadOperation::LoadChildren,
        }
    }

    /// Whether missing ancestors are fetched after the main page.
    pub fn backfills(self) -> bool {
        self.operation() == LoadOperation::Query
    }

    /// Whether the fetched page holds complete subtrees.
    pub fn holds_whole_subtrees(self) -> bool {
        matches!(self, Self::WholeTree | Self::Subtree)
    }

    /// Shape context for converting this plan's page.
    pub fn shape_context(self, mode: LoadMode) -> ShapeContext {
        if self.holds_whole_subtrees() {
            ShapeContext::complete(mode)
        } else {
            ShapeContext::partial(mode)
        }
    }
}
