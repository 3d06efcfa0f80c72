//! Pagination-bound executor

use std::future::Future;

use log::debug;
use tokio_util::sync::CancellationToken;

use super::Plan;
use crate::error::DataError;
use crate::error::Error;
use crate::error::ServiceError;
use crate::hooks::QueryHooks;
use crate::model::Page;
use crate::model::QueryParameter;
use crate::service::TreeQueryService;

/// Awaits a collaborator call unless the caller cancels first.
pub(crate) async fn guarded<T>(
    cancel: &CancellationToken,
    call: impl Future<Output = Result<T, ServiceError>>,
) -> Result<T, Error> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Cancelled),
        result = call => result.map_err(Error::Service),
    }
}

/// Applies the plan's paging and scoping rules that need no I/O.
pub fn bound_query(query: &mut QueryParameter, plan: Plan, max_page_size: usize) {
    match plan {
        Plan::WholeTree => {
            query.level = None;
            query.page = Some(1);
            query.page_size = Some(max_page_size);
        }
        Plan::RootLevel => {
            query.level.get_or_insert(1);
            query.page = Some(query.page.unwrap_or(1).max(1));
            query.page_size = Some(query.page_size.map_or(max_page_size, |size| size.min(max_page_size).max(1)));
        }
        Plan::DirectChildren | Plan::Subtree => {
            query.page = Some(1);
            query.page_size = Some(max_page_size);
        }
    }
}

/// Fetches the plan's page from the service.
///
/// For [`Plan::Subtree`] the expanded node is looked up first, the query is
/// rescoped to its path, and the node itself is dropped from the result with
/// the total decremented.
pub(crate) async fn execute(
    service: &dyn TreeQueryService,
    hooks: &dyn QueryHooks,
    plan: Plan,
    max_page_size: usize,
    query: &mut QueryParameter,
    cancel: &CancellationToken,
) -> Result<Page, Error> {
    bound_query(query, plan, max_page_size);

    let clicked = match plan {
        Plan::Subtree => {
            let id = query.parent_key().map(str::to_string).unwrap_or_default();
            let node = guarded(cancel, service.get_by_id(&id, cancel))
                .await?
                .ok_or_else(|| DataError::not_found(&id))?;
            let path = node
                .path
                .clone()
                .filter(|path| !path.is_empty())
                .ok_or_else(|| DataError::missing_path(&id))?;
            debug!("Scoping subtree fetch of '{}' to path {} (level {:?})", id, path, node.level);
            query.path = Some(path);
            query.parent_id = None;
            query.level = None;
            Some(id)
        }
        _ => None,
    };

    hooks.before_query(query);
    debug!("Dispatching {:?} fetch: {:?}", plan, query);
    let mut page = guarded(cancel, service.fetch_page(query, cancel)).await?;
    debug!("Fetched {} of {} nodes", page.len(), page.total());

    if let Some(id) = clicked
        && page.remove_by_id(&id).is_some()
    {
        debug!("Excluded expanded node '{}' from its subtree, total now {}", id, page.total());
    }

    Ok(page)
}
