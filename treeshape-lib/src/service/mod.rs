//! Backing query service contract
//!
//! The engine never touches storage itself. Everything it knows about the
//! hierarchy comes through a [`TreeQueryService`], and every call receives
//! the caller's cancellation token.

mod memory;

pub use memory::*;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::ServiceError;
use crate::model::Node;
use crate::model::Page;
use crate::model::QueryParameter;

/// Fetches nodes for the engine.
///
/// Implementations own filtering, ordering and paging. A fetch filtered by
/// `path` must return the node at that path and every node underneath it.
///
/// # Example
///
/// ```ignore
/// use treeshape_lib::service::{InMemoryTreeService, TreeQueryService};
///
/// let service = InMemoryTreeService::from_nodes(nodes);
/// let page = service.fetch_page(&QueryParameter::children_of("1"), &cancel).await?;
/// ```
#[async_trait]
pub trait TreeQueryService: Send + Sync {
    /// Fetches one filtered, ordered page of nodes.
    async fn fetch_page(
        &self,
        query: &QueryParameter,
        cancel: &CancellationToken,
    ) -> Result<Page, ServiceError>;

    /// Looks up nodes by id. Unknown ids are skipped.
    async fn get_by_ids(&self, ids: &[String], cancel: &CancellationToken) -> Result<Vec<Node>, ServiceError>;

    /// Fetches the direct children of every listed parent.
    async fn get_by_parent_ids(
        &self,
        parent_ids: &[String],
        cancel: &CancellationToken,
    ) -> Result<Vec<Node>, ServiceError>;

    /// Looks up a single node by id.
    ///
    /// Returns `None` if the node doesn't exist.
    async fn get_by_id(&self, id: &str, cancel: &CancellationToken) -> Result<Option<Node>, ServiceError> {
        let mut nodes = self.get_by_ids(&[id.to_string()], cancel).await?;
        Ok(nodes.pop())
    }
}
