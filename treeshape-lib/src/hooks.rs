//! Caller hooks around the fetch

use crate::model::Page;
use crate::model::QueryParameter;

/// Hooks the engine calls synchronously during a run.
///
/// Both methods default to doing nothing, so implementors override only
/// what they need.
///
/// # Example
///
/// ```
/// use treeshape_lib::hooks::QueryHooks;
/// use treeshape_lib::model::{Page, QueryParameter};
///
/// struct OnlyVisible;
///
/// impl QueryHooks for OnlyVisible {
///     fn after_fetch(&self, page: &mut Page, _query: &QueryParameter) {
///         page.nodes_mut().retain(|node| !node.is_hidden());
///     }
/// }
/// ```
pub trait QueryHooks: Send + Sync {
    /// Adjusts the normalized query right before it is dispatched.
    fn before_query(&self, _query: &mut QueryParameter) {}

    /// Observes or edits the fetched page before it is shaped.
    fn after_fetch(&self, _page: &mut Page, _query: &QueryParameter) {}
}

/// Hooks that do nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl QueryHooks for NoHooks {}
