//! Query initializer

use log::trace;

use crate::model::LoadOperation;
use crate::model::OrderBy;
use crate::model::QueryParameter;

/// Normalizes a query before dispatch.
///
/// Defaults the order to `SortId` ascending and always clears `path`, since
/// the hierarchy is rebuilt from parent ids and levels. `parent_id` survives
/// only for `LoadChildren`, where it scopes the fetch.
pub fn init_query(query: &mut QueryParameter, operation: LoadOperation) {
    if query.order.is_none() {
        query.order = Some(OrderBy::by_sort_id());
    }
    query.path = None;
    if operation != LoadOperation::LoadChildren {
        query.parent_id = None;
    }
    trace!("Initialized {:?} query: {:?}", operation, query);
}
