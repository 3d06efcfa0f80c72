//! Error types

mod contract;
mod data;

pub use contract::*;
pub use data::*;

/// Opaque failure raised by a [`TreeQueryService`](crate::service::TreeQueryService).
///
/// The engine never inspects or wraps these; callers can downcast to recover
/// the collaborator's concrete error type.
pub type ServiceError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by the tree engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The caller broke the engine's contract. Raised before any I/O.
    #[error("Contract violation: {0}")]
    Contract(#[from] ContractError),

    /// The fetched data cannot be shaped into a tree.
    #[error("Data integrity error: {0}")]
    Data(#[from] DataError),

    /// The backing query service failed.
    #[error("Query service error: {0}")]
    Service(#[source] ServiceError),

    /// The caller's cancellation token fired while a fetch was pending.
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Returns `true` if this is a caller-contract violation.
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::Contract(_))
    }

    /// Returns `true` if this error came from the query service.
    pub fn is_service_error(&self) -> bool {
        matches!(self, Self::Service(_))
    }

    /// Returns the collaborator's error, if this is a service failure.
    pub fn service_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Service(inner) => Some(&**inner),
            _ => None,
        }
    }
}
