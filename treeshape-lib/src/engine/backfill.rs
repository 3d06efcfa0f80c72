//! Ancestor backfill and first-load expansion

use std::collections::HashSet;

use log::debug;
use log::trace;
use tokio_util::sync::CancellationToken;

use super::execute::guarded;
use crate::error::DataError;
use crate::error::Error;
use crate::model::Node;
use crate::model::NodePath;
use crate::model::Page;
use crate::service::TreeQueryService;

/// Collects ancestor ids that nested nodes in `page` need but the page lacks.
///
/// Each node deeper than level 1 walks its path upward and stops at the
/// first ancestor already present. A nested node without a path contributes
/// its parent id if that parent is missing. The result is deduplicated and in
/// discovery order.
pub fn missing_ancestors(page: &Page, separator: char) -> Vec<String> {
    let present = page.ids();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut missing = Vec::new();

    for node in page.nodes().iter().filter(|node| node.is_nested()) {
        match node.path.as_deref() {
            Some(raw) => {
                let path = NodePath::parse(raw, separator);
                for ancestor in path.ancestors_of(&node.id) {
                    if present.contains(ancestor) {
                        break;
                    }
                    if seen.insert(ancestor) {
                        missing.push(ancestor.to_string());
                    }
                }
            }
            None => {
                if let Some(parent) = node.parent_key()
                    && !present.contains(parent)
                    && seen.insert(parent)
                {
                    missing.push(parent.to_string());
                }
            }
        }
    }

    missing
}

/// Fetches missing ancestors and appends them to `page`.
///
/// Pages whose nested nodes carry paths are completed with one batch. Nodes
/// without a path only name their parent, so the batch repeats one level up
/// until every nested node has its parent. Returns how many nodes were
/// appended, and makes no call when nothing is missing.
///
/// Fails with [`DataError::MissingAncestor`] when the service cannot return a
/// requested ancestor.
pub async fn backfill(
    service: &dyn TreeQueryService,
    page: &mut Page,
    separator: char,
    cancel: &CancellationToken,
) -> Result<usize, Error> {
    let mut added = 0;
    loop {
        let missing = missing_ancestors(page, separator);
        if missing.is_empty() {
            break;
        }

        trace!("Backfilling ancestors {:?}", missing);
        let fetched = guarded(cancel, service.get_by_ids(&missing, cancel)).await?;
        added += page.extend_unique(fetched);
        require_present(page, &missing)?;
    }

    if added > 0 {
        debug!("Backfilled {} missing ancestors", added);
    }
    Ok(added)
}

/// Fails on the first id in `wanted` that `page` does not hold.
fn require_present(page: &Page, wanted: &[String]) -> Result<(), DataError> {
    let present = page.ids();
    match wanted.iter().find(|id| !present.contains(id.as_str())) {
        Some(id) => Err(DataError::missing_ancestor(id)),
        None => Ok(()),
    }
}

/// Every ancestor id of `node`, nearest first.
fn ancestor_chain(node: &Node, separator: char) -> Vec<String> {
    match node.path.as_deref() {
        Some(raw) => NodePath::parse(raw, separator)
            .ancestors_of(&node.id)
            .map(str::to_string)
            .collect(),
        None => node.parent_key().map(str::to_string).into_iter().collect(),
    }
}

/// Opens the path down to each preselected node.
///
/// Looks up the selected nodes, gathers the union of their ancestor chains,
/// appends any ancestors the page lacks together with their direct children,
/// and marks every ancestor expanded. Returns the number of ancestors marked.
pub async fn expand_preselected(
    service: &dyn TreeQueryService,
    page: &mut Page,
    keys: &[String],
    separator: char,
    cancel: &CancellationToken,
) -> Result<usize, Error> {
    if keys.is_empty() {
        return Ok(0);
    }

    let selected = guarded(cancel, service.get_by_ids(keys, cancel)).await?;

    let mut ancestors: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for node in &selected {
        for id in ancestor_chain(node, separator) {
            if seen.insert(id.clone()) {
                ancestors.push(id);
            }
        }
    }
    if ancestors.is_empty() {
        trace!("Preselected keys {:?} are all top-level", keys);
        return Ok(0);
    }

    let absent: Vec<String> = {
        let present = page.ids();
        ancestors
            .iter()
            .filter(|id| !present.contains(id.as_str()))
            .cloned()
            .collect()
    };
    if !absent.is_empty() {
        let fetched = guarded(cancel, service.get_by_ids(&absent, cancel)).await?;
        page.extend_unique(fetched);
        require_present(page, &absent)?;
    }

    let children = guarded(cancel, service.get_by_parent_ids(&ancestors, cancel)).await?;
    let added_children = page.extend_unique(children);

    let mut marked = 0;
    for node in page.nodes_mut().iter_mut() {
        if seen.contains(&node.id) {
            node.expanded = Some(true);
            marked += 1;
        }
    }

    debug!(
        "Opened {} ancestors of {} preselected nodes ({} children added)",
        marked,
        selected.len(),
        added_children
    );
    Ok(marked)
}
