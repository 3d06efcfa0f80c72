//! Flat-to-tree assembler

use std::collections::HashMap;

use log::trace;
use log::warn;

use crate::error::DataError;
use crate::model::Node;

/// Sibling ordering: ascending `sort_id`, unset last, ties keep input order.
fn sort_rank(node: &Node) -> (bool, i64) {
    (node.sort_id.is_none(), node.sort_id.unwrap_or_default())
}

/// Parent/child links resolved over a flat node set.
///
/// Indices refer to positions in the slice passed to [`Hierarchy::link`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hierarchy {
    roots: Vec<usize>,
    children: Vec<Vec<usize>>,
    orphans: Vec<usize>,
}

impl Hierarchy {
    /// Resolves roots and child lists.
    ///
    /// Roots are the nodes without a parent id. When every node has one (a
    /// subtree slice), the roots are the nodes at the smallest level present,
    /// or, with no levels at all, the nodes whose parent is outside the set.
    ///
    /// A node that cannot be reached from a root fails the set: with
    /// [`DataError::Cycle`] if its parent links loop, otherwise with
    /// [`DataError::MissingAncestor`]. The one exception is a node whose
    /// parent chain passes through a hidden node. Those are never shown, so
    /// they are kept aside as orphans.
    pub fn link(nodes: &[Node]) -> Result<Self, DataError> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if index.insert(node.id.as_str(), i).is_some() {
                return Err(DataError::duplicate(&node.id));
            }
        }

        let mut roots = detect_roots(nodes, &index);
        roots.sort_by_key(|&i| sort_rank(&nodes[i]));

        let mut is_root = vec![false; nodes.len()];
        for &root in &roots {
            is_root[root] = true;
        }

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
        for (i, node) in nodes.iter().enumerate() {
            if is_root[i] {
                continue;
            }
            if let Some(&parent) = node.parent_key().and_then(|p| index.get(p)) {
                children[parent].push(i);
            }
        }
        for list in &mut children {
            list.sort_by_key(|&i| sort_rank(&nodes[i]));
        }

        let mut placed = vec![false; nodes.len()];
        let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            if placed[i] {
                return Err(DataError::cycle(&nodes[i].id));
            }
            placed[i] = true;
            stack.extend(children[i].iter().rev().copied());
        }

        let mut orphans = Vec::new();
        for (i, node) in nodes.iter().enumerate() {
            if placed[i] {
                continue;
            }
            let end = trace_chain(nodes, &index, i)?;
            if !end.hidden {
                return Err(DataError::missing_ancestor(
                    nodes[end.top].parent_key().unwrap_or_default(),
                ));
            }
            orphans.push(i);
            warn!(
                "Node '{}' hangs off a hidden, unattached chain ({:?}) and is left out of the tree",
                node.id, node.parent_id
            );
        }

        trace!(
            "Linked {} nodes: {} roots, {} orphans",
            nodes.len(),
            roots.len(),
            orphans.len()
        );

        Ok(Self {
            roots,
            children,
            orphans,
        })
    }

    /// Root indices, sorted by `sort_id`.
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Child indices of the node at `index`, sorted by `sort_id`.
    pub fn children_of(&self, index: usize) -> &[usize] {
        self.children.get(index).map(Vec::as_slice).unwrap_or_default()
    }

    /// Indices of nodes that could not be attached.
    pub fn orphans(&self) -> &[usize] {
        &self.orphans
    }

    /// Depth-first order of reachable nodes, parents before children.
    ///
    /// A node for which `skip` returns `true` is left out along with its
    /// whole subtree.
    pub fn depth_first(&self, nodes: &[Node], skip: impl Fn(&Node) -> bool) -> Vec<usize> {
        let mut order = Vec::with_capacity(nodes.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            if skip(&nodes[i]) {
                continue;
            }
            order.push(i);
            stack.extend(self.children[i].iter().rev().copied());
        }
        order
    }

    /// Moves every reachable node under its parent and returns the roots.
    ///
    /// Children are attached depth-first before their parent is emitted. A
    /// node for which `skip` returns `true` is dropped with its subtree.
    pub fn nest(&self, nodes: Vec<Node>, skip: impl Fn(&Node) -> bool) -> Vec<Node> {
        let mut slots: Vec<Option<Node>> = nodes.into_iter().map(Some).collect();
        self.roots
            .iter()
            .filter_map(|&root| self.build(root, &mut slots, &skip))
            .collect()
    }

    fn build(&self, index: usize, slots: &mut [Option<Node>], skip: &impl Fn(&Node) -> bool) -> Option<Node> {
        let mut node = slots.get_mut(index)?.take()?;
        if skip(&node) {
            return None;
        }
        node.children = self.children[index]
            .iter()
            .filter_map(|&child| self.build(child, slots, skip))
            .collect();
        Some(node)
    }
}

fn detect_roots(nodes: &[Node], index: &HashMap<&str, usize>) -> Vec<usize> {
    let declared: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.is_root_candidate())
        .map(|(i, _)| i)
        .collect();
    if !declared.is_empty() {
        return declared;
    }

    if let Some(min_level) = nodes.iter().filter_map(|node| node.level).min() {
        return nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.level == Some(min_level))
            .map(|(i, _)| i)
            .collect();
    }

    nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.parent_key().is_none_or(|p| !index.contains_key(p)))
        .map(|(i, _)| i)
        .collect()
}

/// Where an unattached node's parent links run out.
struct ChainEnd {
    /// The last node reached; its parent is not in the set.
    top: usize,
    /// Whether any node on the way is hidden.
    hidden: bool,
}

/// Walks parent links from `start`; fails if they loop.
fn trace_chain(nodes: &[Node], index: &HashMap<&str, usize>, start: usize) -> Result<ChainEnd, DataError> {
    let mut seen = vec![false; nodes.len()];
    let mut hidden = false;
    let mut current = start;
    loop {
        if seen[current] {
            return Err(DataError::cycle(&nodes[current].id));
        }
        seen[current] = true;
        hidden |= nodes[current].is_hidden();
        match nodes[current].parent_key().and_then(|p| index.get(p)) {
            Some(&parent) => current = parent,
            None => return Ok(ChainEnd { top: current, hidden }),
        }
    }
}

/// Builds a nested tree from a flat node set.
///
/// Every node appears exactly once, either as a root or under its parent,
/// with siblings ordered by `sort_id`. A node whose parent is neither in the
/// set nor a root fails the call.
///
/// # Example
///
/// ```
/// use treeshape_lib::model::Node;
/// use treeshape_lib::tree::assemble;
///
/// let roots = assemble(vec![
///     Node::new("2").with_parent("1").with_level(2),
///     Node::new("1").with_level(1),
/// ])
/// .unwrap();
///
/// assert_eq!(roots.len(), 1);
/// assert_eq!(roots[0].children[0].id, "2");
/// ```
pub fn assemble(nodes: Vec<Node>) -> Result<Vec<Node>, DataError> {
    let hierarchy = Hierarchy::link(&nodes)?;
    Ok(hierarchy.nest(nodes, |_| false))
}
